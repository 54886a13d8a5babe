//! Admin query surface: one read endpoint showing staging next to live, and
//! one action endpoint for manual apply / reject.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use ladder_core::{record::StandingRecord, store::StandingsStore};
use ladder_scrape::PageFetcher;
use uuid::Uuid;

use crate::{ApiError, AppState};

// ─── Response shapes ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminView {
  pub success: bool,
  pub data:    AdminData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminData {
  pub season:  String,
  pub staging: StagingView,
  pub live:    LiveView,
  pub scraper: ScraperView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingView {
  pub rows:            Vec<StandingRecord>,
  pub count:           usize,
  pub last_updated:    Option<DateTime<Utc>>,
  /// True when staging content diverges from live and a human should look
  /// before the next automatic apply.
  pub needs_review:    bool,
  pub source_degraded: bool,
  pub warnings:        Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveView {
  pub rows:         Vec<StandingRecord>,
  pub count:        usize,
  pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperView {
  pub last_scrape_time:   Option<DateTime<Utc>>,
  pub last_scrape_status: &'static str,
  pub next_scheduled:     String,
}

// ─── Read endpoint ────────────────────────────────────────────────────────────

/// `GET /api/admin/league-table`
pub async fn read<S, F>(
  State(state): State<AppState<S, F>>,
) -> Result<Json<AdminView>, ApiError>
where
  S: StandingsStore,
  F: PageFetcher,
{
  let season = state
    .store
    .current_season()
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound("no current season".to_string()))?;

  let snapshot = state.store.latest_snapshot().await.map_err(store_err)?;
  let live_rows = state
    .store
    .live_records(season.season_id)
    .await
    .map_err(store_err)?;
  let live_updated = state
    .store
    .live_last_updated(season.season_id)
    .await
    .map_err(store_err)?;

  let staging = match &snapshot {
    Some(snap) => StagingView {
      needs_review:    needs_review(&snap.records, &live_rows),
      count:           snap.records.len(),
      rows:            snap.records.clone(),
      last_updated:    Some(snap.scrape_timestamp),
      source_degraded: snap.source_degraded,
      warnings:        snap.warnings.clone(),
    },
    None => StagingView {
      rows:            Vec::new(),
      count:           0,
      last_updated:    None,
      needs_review:    false,
      source_degraded: false,
      warnings:        Vec::new(),
    },
  };

  let scraper = ScraperView {
    last_scrape_time:   snapshot.as_ref().map(|s| s.scrape_timestamp),
    last_scrape_status: match &snapshot {
      Some(s) if s.source_degraded => "degraded",
      Some(_) => "success",
      None => "never",
    },
    next_scheduled: state.config.next_scheduled.clone(),
  };

  Ok(Json(AdminView {
    success: true,
    data:    AdminData {
      season: season.name,
      staging,
      live: LiveView {
        count:        live_rows.len(),
        last_updated: live_updated,
        rows:         live_rows,
      },
      scraper,
    },
  }))
}

/// Whether staging content diverges from live, keyed by team identity.
///
/// Rows are compared per `team_id` so mere reordering of a display list can
/// never flag a review. A team missing from either side, or a points value
/// that differs, does.
fn needs_review(staging: &[StandingRecord], live: &[StandingRecord]) -> bool {
  if staging.is_empty() {
    return false;
  }
  if live.is_empty() {
    return true;
  }
  let live_points: HashMap<Uuid, u32> =
    live.iter().map(|r| (r.team_id, r.points)).collect();
  if staging.len() != live.len() {
    return true;
  }
  staging
    .iter()
    .any(|r| live_points.get(&r.team_id) != Some(&r.points))
}

// ─── Action endpoint ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminAction {
  pub action: String,
}

#[derive(Serialize)]
pub struct ActionResponse {
  pub success: bool,
  pub message: String,
}

/// `POST /api/admin/league-table` with body `{ "action": ... }`.
pub async fn action<S, F>(
  State(state): State<AppState<S, F>>,
  Json(body): Json<AdminAction>,
) -> Result<Json<ActionResponse>, ApiError>
where
  S: StandingsStore,
  F: PageFetcher,
{
  match body.action.as_str() {
    "apply_staging" => {
      let promotion = state
        .store
        .apply_staging(state.config.apply_mode)
        .await
        .map_err(store_err)?;
      tracing::info!(
        applied = promotion.records_applied,
        snapshot = %promotion.snapshot_id,
        "manual apply",
      );
      Ok(Json(ActionResponse {
        success: true,
        message: format!("Applied {} teams to live table", promotion.records_applied),
      }))
    }
    "reject_staging" => {
      let cleared = state.store.reject_staging().await.map_err(store_err)?;
      tracing::info!(snapshots_cleared = cleared, "manual reject");
      Ok(Json(ActionResponse {
        success: true,
        message: "Staging data cleared successfully".to_string(),
      }))
    }
    other => Err(ApiError::BadRequest(format!("invalid action: {other:?}"))),
  }
}

fn store_err<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
