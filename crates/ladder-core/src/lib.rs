//! Core types and trait definitions for the Ladder standings pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies:
//! every other crate in the workspace depends on it, never the reverse.

pub mod record;
pub mod resolver;
pub mod season;
pub mod store;
pub mod validate;
