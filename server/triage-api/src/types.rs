//! Request/response types for the triage API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
  #[serde(default)]
  pub log_content: Option<String>,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
  pub timestamp: String,
  pub status: u16,
  pub error: String,
  pub message: String,
  pub path: String,
}

/// Body of a 429 response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedBody {
  pub error: &'static str,
  pub message: &'static str,
  pub retry_after_seconds: u64,
}
