//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use scorer_core::LoadError;
use serde_json::json;
use thiserror::Error;

/// Failures outside the update workflow: auth, routing, and read paths.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error(transparent)]
  Load(#[from] LoadError),
  #[error("store error: {0}")]
  Store(#[from] scorer_compstate::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"scorer\""),
        );
        res
      }
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
      Error::Load(e) => internal(e.to_string()),
      Error::Store(e) => internal(e.to_string()),
    }
  }
}

fn internal(message: String) -> Response {
  tracing::error!(%message, "request failed");
  (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
}
