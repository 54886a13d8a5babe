//! Seasons, competitions and teams — the reference entities the pipeline
//! resolves scraped rows against.
//!
//! These are seeded out of band (admin tooling, migrations); the pipeline
//! itself only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A football season, e.g. "2025/26".
/// Exactly one season is flagged current at any time; the store's write path
/// clears the flag from all others when a new current season is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
  pub season_id:  Uuid,
  pub name:       String,
  pub is_current: bool,
}

/// A competition within a season, e.g. "Highland League".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
  pub competition_id: Uuid,
  pub name:           String,
}

/// A team under its canonical name. External-name aliases live in their own
/// store table and are consumed only by the [`Resolver`](crate::resolver).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
  pub team_id:    Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}
