//! Pipeline steps and the daily-run orchestrator.
//!
//! `SCRAPE → VALIDATE → APPLY`, strictly sequential, halting at the first
//! failing step. There is no retry and no rollback beyond what the store's
//! transactional promotion already guarantees; a validation failure parks
//! the snapshot in staging for a human to apply or reject.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

use ladder_core::{
  record::NewSnapshot,
  resolver::Resolver,
  store::{Promotion, StandingsStore},
  validate::validate_snapshot,
};
use ladder_scrape::{PageFetcher, parse_standings};
use thiserror::Error;

use crate::{ServerConfig, guard::RunGuard, notify::{Notifier, NotifyEvent}};

// ─── Step errors ──────────────────────────────────────────────────────────────

/// A failure inside an individual pipeline step.
#[derive(Debug, Error)]
pub enum StepError {
  #[error("no current season")]
  NoCurrentSeason,

  #[error("competition not found: {0:?}")]
  CompetitionNotFound(String),

  #[error(transparent)]
  Fetch(#[from] ladder_scrape::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn store_err<E>(e: E) -> StepError
where
  E: std::error::Error + Send + Sync + 'static,
{
  StepError::Store(Box::new(e))
}

// ─── Scrape step ──────────────────────────────────────────────────────────────

/// What a scrape run staged.
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
  pub records_processed: u32,
  pub warnings:          Vec<String>,
  pub source_degraded:   bool,
}

/// Fetch the source page, parse it, and persist one staging snapshot.
///
/// A fetch failure aborts before any write. Parse shortfalls do not: skipped
/// rows travel as warnings, and a missing "last updated" stamp falls back to
/// the scrape time with provenance marked degraded.
pub async fn run_scrape<S, F>(
  store: &S,
  fetcher: &F,
  config: &ServerConfig,
) -> Result<ScrapeSummary, StepError>
where
  S: StandingsStore,
  F: PageFetcher,
{
  let season = store
    .current_season()
    .await
    .map_err(store_err)?
    .ok_or(StepError::NoCurrentSeason)?;
  let competition = store
    .competition_by_name(config.competition.clone())
    .await
    .map_err(store_err)?
    .ok_or_else(|| StepError::CompetitionNotFound(config.competition.clone()))?;
  let aliases = store.alias_map().await.map_err(store_err)?;
  let resolver = Resolver::new(season.season_id, competition.competition_id, aliases);

  let page = fetcher.fetch(&config.source_url).await?;
  let parsed = parse_standings(&page, &resolver);

  let (source_timestamp, source_degraded) = match parsed.source_timestamp {
    Some(ts) => (ts, false),
    None => {
      // A real parse failure and a legitimately absent stamp look the same
      // here; provenance records the substitution either way.
      tracing::warn!("no source timestamp found; marking snapshot degraded");
      (Utc::now(), true)
    }
  };

  let snapshot = store
    .insert_snapshot(NewSnapshot {
      source_timestamp,
      source_degraded,
      warnings: parsed.warnings,
      records: parsed.records,
    })
    .await
    .map_err(store_err)?;

  tracing::info!(
    records = snapshot.records.len(),
    warnings = snapshot.warnings.len(),
    degraded = snapshot.source_degraded,
    "scrape staged a new snapshot",
  );

  Ok(ScrapeSummary {
    records_processed: snapshot.records.len() as u32,
    warnings:          snapshot.warnings,
    source_degraded:   snapshot.source_degraded,
  })
}

// ─── Validate step ────────────────────────────────────────────────────────────

/// Validate the latest snapshot. Empty list = safe to promote.
pub async fn run_validate<S>(store: &S, expected_teams: u32) -> Result<Vec<String>, StepError>
where
  S: StandingsStore,
{
  let Some(snapshot) = store.latest_snapshot().await.map_err(store_err)? else {
    return Ok(vec!["No staging data found".to_string()]);
  };
  Ok(validate_snapshot(&snapshot, expected_teams))
}

// ─── Apply step ───────────────────────────────────────────────────────────────

pub async fn run_apply<S>(store: &S, config: &ServerConfig) -> Result<Promotion, StepError>
where
  S: StandingsStore,
{
  store.apply_staging(config.apply_mode).await.map_err(store_err)
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStep {
  Scrape,
  Validate,
  Apply,
}

impl fmt::Display for JobStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Scrape => "scrape",
      Self::Validate => "validate",
      Self::Apply => "apply",
    })
  }
}

/// Terminal state of one orchestrated run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
  Completed {
    teams_processed: u32,
  },
  Failed {
    step:   JobStep,
    detail: String,
    /// Validator output when `step` is [`JobStep::Validate`], empty otherwise.
    issues: Vec<String>,
  },
}

/// Run the full pipeline once: scrape, validate, apply.
///
/// Takes the single-flight guard for the current season before scraping; a
/// second run landing while one is in flight fails fast instead of racing
/// on staging or on the promotion delete/insert.
pub async fn run_daily<S, F>(
  store: &S,
  fetcher: &F,
  config: &ServerConfig,
  notifier: &dyn Notifier,
  guard: &RunGuard,
) -> RunOutcome
where
  S: StandingsStore,
  F: PageFetcher,
{
  let season = match store.current_season().await {
    Ok(Some(season)) => season,
    Ok(None) => return fail(notifier, JobStep::Scrape, "no current season".into()),
    Err(e) => return fail(notifier, JobStep::Scrape, e.to_string()),
  };

  let Some(_permit) = guard.try_acquire(season.season_id) else {
    return fail(
      notifier,
      JobStep::Scrape,
      format!("a run is already in progress for season {:?}", season.name),
    );
  };

  tracing::info!(season = %season.name, "daily run started");

  let summary = match run_scrape(store, fetcher, config).await {
    Ok(summary) => summary,
    Err(e) => return fail(notifier, JobStep::Scrape, e.to_string()),
  };

  let issues = match run_validate(store, config.expected_teams).await {
    Ok(issues) => issues,
    Err(e) => return fail(notifier, JobStep::Validate, e.to_string()),
  };
  if !issues.is_empty() {
    notifier.notify(&NotifyEvent::ValidationFailed { issues: issues.clone() });
    return RunOutcome::Failed {
      step:   JobStep::Validate,
      detail: "validation failed - admin intervention required".to_string(),
      issues,
    };
  }

  let promotion = match run_apply(store, config).await {
    Ok(promotion) => promotion,
    Err(e) => return fail(notifier, JobStep::Apply, e.to_string()),
  };

  notifier.notify(&NotifyEvent::RunCompleted {
    teams_processed: promotion.records_applied,
  });
  tracing::info!(
    applied = promotion.records_applied,
    scraped = summary.records_processed,
    "daily run completed",
  );

  RunOutcome::Completed { teams_processed: promotion.records_applied }
}

fn fail(notifier: &dyn Notifier, step: JobStep, detail: String) -> RunOutcome {
  notifier.notify(&NotifyEvent::RunFailed { step, detail: detail.clone() });
  RunOutcome::Failed { step, detail, issues: Vec::new() }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
