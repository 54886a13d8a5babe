//! Standing records and staging snapshots.
//!
//! A snapshot is one scraped copy of the full standings table. Snapshots are
//! immutable once written: a later run supersedes them, a reject action
//! bulk-clears them, nothing ever updates them in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One team's row in a standings table.
///
/// `team_name` is denormalised onto the record for display and for naming
/// validation issues; the store derives it by joining the teams table and
/// never persists it on standings rows. `goal_difference` in the live table
/// is likewise a database-generated column and is never inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRecord {
  pub season_id:       Uuid,
  pub competition_id:  Uuid,
  pub team_id:         Uuid,
  pub team_name:       String,
  /// Source rank carried through from the scraped page, 1-based.
  pub position:        u32,
  pub points:          u32,
  pub matches_played:  u32,
  pub wins:            u32,
  pub draws:           u32,
  pub losses:          u32,
  pub goals_for:       u32,
  pub goals_against:   u32,
  pub goal_difference: i32,
  /// Up to the last six W/D/L outcome letters, oldest first.
  pub form:            String,
}

/// Input to [`StandingsStore::insert_snapshot`](crate::store::StandingsStore):
/// everything the scraper produced. The store assigns `snapshot_id` and
/// `scrape_timestamp`.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
  /// "Last updated" time reported by the source page, or the scrape time if
  /// none was found (in which case `source_degraded` is set).
  pub source_timestamp: DateTime<Utc>,
  pub source_degraded:  bool,
  /// Per-row skip reasons (unmatched team name, short row, bad number).
  pub warnings:         Vec<String>,
  pub records:          Vec<StandingRecord>,
}

/// A persisted staging snapshot with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingSnapshot {
  pub snapshot_id:      Uuid,
  /// One timestamp shared by every record in the snapshot.
  pub scrape_timestamp: DateTime<Utc>,
  pub source_timestamp: DateTime<Utc>,
  pub source_degraded:  bool,
  pub warnings:         Vec<String>,
  pub records:          Vec<StandingRecord>,
}
