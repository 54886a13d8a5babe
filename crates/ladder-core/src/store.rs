//! The `StandingsStore` trait and promotion types.
//!
//! The trait is implemented by storage backends (e.g. `ladder-store-sqlite`).
//! Higher layers (`ladder-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  record::{NewSnapshot, StagingSnapshot, StandingRecord},
  season::{Competition, Season, Team},
};

// ─── Promotion types ─────────────────────────────────────────────────────────

/// How the promotion step replaces the live table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
  /// Delete + insert inside one database transaction. A failed insert rolls
  /// the delete back, so the live table is never left empty.
  Transactional,
  /// The historical two-step delete-then-insert. If the insert fails after
  /// the delete commits, the live table for the season is left empty. Kept
  /// only as an explicit opt-in.
  Legacy,
}

impl Default for ApplyMode {
  fn default() -> Self { Self::Transactional }
}

/// The result of a successful promotion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
  pub season_id:       Uuid,
  pub snapshot_id:     Uuid,
  pub records_applied: u32,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the two logical stores (staging, live) plus the reference
/// entities they key against.
///
/// Staging snapshots are append-only: a scrape inserts one, a later scrape
/// supersedes it, and the reject action bulk-clears the whole staging area.
/// Live rows are created and overwritten only by `apply_staging`.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait StandingsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reference entities ────────────────────────────────────────────────

  /// Insert a season. When `is_current` is set, the current flag is cleared
  /// from every other season in the same statement batch, preserving the
  /// single-current-season invariant.
  fn insert_season(
    &self,
    name: String,
    is_current: bool,
  ) -> impl Future<Output = Result<Season, Self::Error>> + Send + '_;

  /// The season flagged current, if any.
  fn current_season(
    &self,
  ) -> impl Future<Output = Result<Option<Season>, Self::Error>> + Send + '_;

  fn insert_competition(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Competition, Self::Error>> + Send + '_;

  fn competition_by_name(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<Competition>, Self::Error>> + Send + '_;

  fn insert_team(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  /// Register an external-name alias for a team. The canonical name itself
  /// must also be registered if the source page uses it.
  fn insert_team_alias(
    &self,
    team_id: Uuid,
    alias: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All `(alias, team_id)` pairs — feeds the
  /// [`Resolver`](crate::resolver::Resolver).
  fn alias_map(
    &self,
  ) -> impl Future<Output = Result<Vec<(String, Uuid)>, Self::Error>> + Send + '_;

  // ── Staging — append-only writes ──────────────────────────────────────

  /// Persist one scrape run as a new snapshot. The store assigns the
  /// `snapshot_id` and the shared `scrape_timestamp`.
  fn insert_snapshot(
    &self,
    input: NewSnapshot,
  ) -> impl Future<Output = Result<StagingSnapshot, Self::Error>> + Send + '_;

  /// The most recent snapshot by `scrape_timestamp`, records included.
  fn latest_snapshot(
    &self,
  ) -> impl Future<Output = Result<Option<StagingSnapshot>, Self::Error>> + Send + '_;

  fn snapshot_count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Live table ────────────────────────────────────────────────────────

  /// Live standings for a season, ordered by position, team names joined in.
  fn live_records(
    &self,
    season_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StandingRecord>, Self::Error>> + Send + '_;

  fn live_last_updated(
    &self,
    season_id: Uuid,
  ) -> impl Future<Output = Result<Option<DateTime<Utc>>, Self::Error>> + Send + '_;

  // ── Promotion ─────────────────────────────────────────────────────────

  /// Replace the current season's live table with the latest staging
  /// snapshot. Fails with `NoCurrentSeason` before touching anything if no
  /// season is flagged current, and with `EmptyStaging` if there is no
  /// snapshot to apply.
  fn apply_staging(
    &self,
    mode: ApplyMode,
  ) -> impl Future<Output = Result<Promotion, Self::Error>> + Send + '_;

  /// Clear the entire staging area — every snapshot, not just the latest.
  /// Returns the number of snapshots removed.
  fn reject_staging(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
