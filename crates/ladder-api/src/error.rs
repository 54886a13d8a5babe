//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error becomes a `{ "success": false, "error": ... }` body, the
//! shape collaborators already consume.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::StepError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The external standings page could not be fetched.
  #[error("upstream error: {0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StepError> for ApiError {
  fn from(e: StepError) -> Self {
    match e {
      StepError::Fetch(inner) => ApiError::Upstream(inner.to_string()),
      StepError::NoCurrentSeason | StepError::CompetitionNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      StepError::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Upstream(m) => (StatusCode::BAD_GATEWAY, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "success": false, "error": message }))).into_response()
  }
}
