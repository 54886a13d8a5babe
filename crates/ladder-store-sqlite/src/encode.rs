//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, snapshot warnings as a compact JSON array.

use chrono::{DateTime, Utc};
use ladder_core::{record::StandingRecord, season::Season};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Snapshot warnings ───────────────────────────────────────────────────────

pub fn encode_warnings(warnings: &[String]) -> Result<String> {
  Ok(serde_json::to_string(warnings)?)
}

pub fn decode_warnings(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A season row as read straight out of SQLite.
pub struct RawSeason {
  pub season_id:  String,
  pub name:       String,
  pub is_current: bool,
}

impl RawSeason {
  pub fn into_season(self) -> Result<Season> {
    Ok(Season {
      season_id:  decode_uuid(&self.season_id)?,
      name:       self.name,
      is_current: self.is_current,
    })
  }
}

/// A standing row (staging or live) as read out of SQLite, team name joined
/// in from the teams table.
pub struct RawStandingRecord {
  pub season_id:       String,
  pub competition_id:  String,
  pub team_id:         String,
  pub team_name:       String,
  pub position:        u32,
  pub points:          u32,
  pub matches_played:  u32,
  pub wins:            u32,
  pub draws:           u32,
  pub losses:          u32,
  pub goals_for:       u32,
  pub goals_against:   u32,
  pub goal_difference: i32,
  pub form:            String,
}

impl RawStandingRecord {
  pub fn into_record(self) -> Result<StandingRecord> {
    Ok(StandingRecord {
      season_id:       decode_uuid(&self.season_id)?,
      competition_id:  decode_uuid(&self.competition_id)?,
      team_id:         decode_uuid(&self.team_id)?,
      team_name:       self.team_name,
      position:        self.position,
      points:          self.points,
      matches_played:  self.matches_played,
      wins:            self.wins,
      draws:           self.draws,
      losses:          self.losses,
      goals_for:       self.goals_for,
      goals_against:   self.goals_against,
      goal_difference: self.goal_difference,
      form:            self.form,
    })
  }
}
