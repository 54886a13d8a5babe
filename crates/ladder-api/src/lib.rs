//! JSON HTTP surface and orchestration for the Ladder standings pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`ladder_core::store::StandingsStore`] and any
//! [`ladder_scrape::PageFetcher`]. Three endpoint groups:
//!
//! | Method     | Path                      | Runs                        |
//! |------------|---------------------------|-----------------------------|
//! | `POST`     | `/api/scrape`             | scrape step only            |
//! | `GET/POST` | `/api/admin/league-table` | admin read / apply / reject |
//! | `GET/POST` | `/api/jobs/daily`         | full orchestrated run       |
//!
//! `GET` on the daily job is kept for external cron schedulers; the schedule
//! time itself lives in deployment configuration, not here.

pub mod admin;
pub mod error;
pub mod guard;
pub mod job;
pub mod notify;
pub mod pipeline;
pub mod scrape;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use ladder_core::store::{ApplyMode, StandingsStore};
use ladder_scrape::PageFetcher;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use guard::RunGuard;
use notify::Notifier;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LADDER_`-prefixed environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,

  /// The external standings page. Fixed per deployment; the pipeline takes
  /// no other inputs.
  pub source_url: String,
  /// Identifying client label sent as the `User-Agent`.
  pub user_agent: String,
  #[serde(default = "default_fetch_timeout_secs")]
  pub fetch_timeout_secs: u64,

  /// Competition whose table the source page carries.
  pub competition: String,
  /// Expected row count for a complete table. Configured rather than derived
  /// from team data; the registered team set can exceed the division.
  pub expected_teams: u32,

  #[serde(default)]
  pub apply_mode: ApplyMode,

  /// Human-readable schedule label reported by the admin surface. The
  /// actual scheduling is an external cron hitting `/api/jobs/daily`.
  #[serde(default = "default_next_scheduled")]
  pub next_scheduled: String,
}

fn default_fetch_timeout_secs() -> u64 { 30 }

fn default_next_scheduled() -> String { "18:00 UTC daily".to_string() }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, F> {
  pub store:    Arc<S>,
  pub fetcher:  Arc<F>,
  pub config:   Arc<ServerConfig>,
  pub notifier: Arc<dyn Notifier>,
  pub guard:    RunGuard,
}

// Manual impl: `Arc` clones regardless of whether S and F do.
impl<S, F> Clone for AppState<S, F> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      fetcher:  Arc::clone(&self.fetcher),
      config:   Arc::clone(&self.config),
      notifier: Arc::clone(&self.notifier),
      guard:    self.guard.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the pipeline server.
pub fn router<S, F>(state: AppState<S, F>) -> Router
where
  S: StandingsStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  F: PageFetcher + Send + Sync + 'static,
{
  Router::new()
    .route("/api/scrape", post(scrape::trigger::<S, F>))
    .route(
      "/api/admin/league-table",
      get(admin::read::<S, F>).post(admin::action::<S, F>),
    )
    .route(
      "/api/jobs/daily",
      get(job::run::<S, F>).post(job::run::<S, F>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
