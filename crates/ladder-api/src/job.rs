//! The daily pipeline endpoint, hit by an external cron.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use ladder_core::store::StandingsStore;
use ladder_scrape::PageFetcher;

use crate::{
  AppState,
  pipeline::{RunOutcome, run_daily},
};

/// `GET|POST /api/jobs/daily` — one full scrape → validate → apply run.
///
/// Failures report which step broke so the alert alone tells an operator
/// where to look; validation failures carry the validator's issue list.
pub async fn run<S, F>(State(state): State<AppState<S, F>>) -> impl IntoResponse
where
  S: StandingsStore,
  F: PageFetcher,
{
  let outcome = run_daily(
    &*state.store,
    &*state.fetcher,
    &state.config,
    state.notifier.as_ref(),
    &state.guard,
  )
  .await;

  match outcome {
    RunOutcome::Completed { teams_processed } => (
      StatusCode::OK,
      Json(json!({
        "success": true,
        "message": "Daily scrape completed successfully",
        "teamsProcessed": teams_processed,
        "timestamp": Utc::now(),
      })),
    ),
    RunOutcome::Failed { step, detail, issues } => (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({
        "success": false,
        "step": step,
        "error": detail,
        "issues": issues,
        "timestamp": Utc::now(),
      })),
    ),
  }
}
