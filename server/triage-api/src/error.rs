//! API errors and their HTTP mapping.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::types::{ApiErrorBody, RateLimitedBody};

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("Uploaded file is too large. Please upload a smaller log file.")]
  PayloadTooLarge,

  #[error("internal: {0}")]
  Internal(String),

  #[error("rate limited; retry after {retry_after_seconds}s")]
  RateLimited { retry_after_seconds: u64 },
}

impl ApiError {
  pub fn bad_request(msg: impl Into<String>) -> Self {
    Self::BadRequest(msg.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
    }
  }

  /// Attach the request path for the error body.
  pub fn at(self, path: &str) -> ErrorResponse {
    ErrorResponse {
      error: self,
      path: path.to_string(),
    }
  }
}

#[derive(Debug)]
pub struct ErrorResponse {
  pub error: ApiError,
  pub path: String,
}

impl IntoResponse for ErrorResponse {
  fn into_response(self) -> Response {
    let status = self.error.status();

    if let ApiError::RateLimited { retry_after_seconds } = self.error {
      let body = RateLimitedBody {
        error: "RATE_LIMITED",
        message: "Too many requests. Please retry later.",
        retry_after_seconds,
      };
      let mut resp = (status, Json(body)).into_response();
      resp
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_seconds));
      return resp;
    }

    let message = match &self.error {
      // Internal details stay in the logs.
      ApiError::Internal(detail) => {
        tracing::error!(path = %self.path, %detail, "request failed");
        "Unexpected error occurred.".to_string()
      }
      other => other.to_string(),
    };
    let body = ApiErrorBody {
      timestamp: chrono::Utc::now().to_rfc3339(),
      status: status.as_u16(),
      error: status.canonical_reason().unwrap_or("Error").to_string(),
      message,
      path: self.path,
    };
    (status, Json(body)).into_response()
  }
}
