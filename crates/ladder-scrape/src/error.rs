//! Error types for `ladder-scrape`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport-level failure reaching the source page.
  #[error("fetch error: {0}")]
  Fetch(#[from] reqwest::Error),

  /// The source answered with a non-success status.
  #[error("source page returned HTTP {0}")]
  Status(u16),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
