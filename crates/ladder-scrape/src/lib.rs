//! Source fetcher and parser for the external standings page.
//!
//! Pipeline:
//!   URL
//!     └─ PageFetcher::fetch()      → raw HTML
//!          └─ parse_standings()    → ParsedTable (records + warnings)
//!               └─ caller persists one StagingSnapshot
//!
//! Fetch failures abort before anything is staged. Parse shortfalls never
//! abort: skipped rows become warnings, a missing "last updated" stamp
//! degrades provenance, and the validator catches the fallout.

pub mod error;
pub mod fetch;
pub mod html;
pub mod parse;

pub use error::{Error, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use parse::{ParsedTable, parse_standings};
