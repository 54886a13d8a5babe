//! Error type for `ladder-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Promotion requested while no season is flagged current. Raised before
  /// any live-table write.
  #[error("no current season")]
  NoCurrentSeason,

  /// Promotion requested with nothing staged (or an empty snapshot).
  #[error("no staging data to apply")]
  EmptyStaging,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
