//! Manual scrape trigger.

use axum::{Json, extract::State};
use serde::Serialize;

use ladder_core::store::StandingsStore;
use ladder_scrape::PageFetcher;

use crate::{ApiError, AppState, pipeline};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
  pub success:           bool,
  pub message:           String,
  pub records_processed: u32,
  pub warnings:          Vec<String>,
  pub source_degraded:   bool,
}

/// `POST /api/scrape` — run the scrape step alone.
///
/// Stages a snapshot without validating or promoting it; the admin surface
/// shows the result next to the live table.
pub async fn trigger<S, F>(
  State(state): State<AppState<S, F>>,
) -> Result<Json<ScrapeResponse>, ApiError>
where
  S: StandingsStore,
  F: PageFetcher,
{
  let summary = pipeline::run_scrape(&*state.store, &*state.fetcher, &state.config).await?;

  Ok(Json(ScrapeResponse {
    success:           true,
    message:           format!(
      "Scraped {} teams into staging",
      summary.records_processed
    ),
    records_processed: summary.records_processed,
    warnings:          summary.warnings,
    source_degraded:   summary.source_degraded,
  }))
}
