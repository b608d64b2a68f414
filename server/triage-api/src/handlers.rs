//! HTTP handlers for the triage API.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use tracing::{info, info_span};
use triage_engine::AnalysisResult;
use uuid::Uuid;

use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;
use crate::types::AnalyzeRequest;

const ALLOWED_EXTENSIONS: &[&str] = &[".log", ".txt"];

pub async fn health() -> &'static str {
  "ok"
}

/// `POST /api/logs/analyze` with `{"logContent": "..."}`.
pub async fn analyze(
  State(state): State<Arc<AppState>>,
  uri: Uri,
  headers: HeaderMap,
  payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ErrorResponse> {
  let Json(req) = payload.map_err(|e| json_rejection(e).at(uri.path()))?;
  let text = req.log_content.unwrap_or_default();
  if text.trim().is_empty() {
    return Err(ApiError::bad_request("logContent must not be blank").at(uri.path()));
  }
  run_analysis(&state, &headers, text)
    .await
    .map(Json)
    .map_err(|e| e.at(uri.path()))
}

/// `POST /api/logs/analyze/file` with a multipart `file` field (.log or .txt).
pub async fn analyze_file(
  State(state): State<Arc<AppState>>,
  uri: Uri,
  headers: HeaderMap,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ErrorResponse> {
  let path = uri.path().to_string();
  let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()).at(&path))?;
  let text = read_upload(&mut multipart).await.map_err(|e| e.at(&path))?;
  run_analysis(&state, &headers, text)
    .await
    .map(Json)
    .map_err(|e| e.at(&path))
}

async fn read_upload(multipart: &mut Multipart) -> Result<String, ApiError> {
  while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
    if field.name() != Some("file") {
      continue;
    }
    let filename = field.file_name().unwrap_or_default().to_lowercase();
    let bytes = field.bytes().await.map_err(multipart_error)?;
    if bytes.is_empty() {
      return Err(ApiError::bad_request("File is empty."));
    }
    if !ALLOWED_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
      return Err(ApiError::bad_request("Only .log or .txt files are supported."));
    }
    return Ok(String::from_utf8_lossy(&bytes).into_owned());
  }
  Err(ApiError::bad_request("File is empty."))
}

/// Run the pipeline on the blocking pool; the provider call may block for its whole budget.
async fn run_analysis(
  state: &Arc<AppState>,
  headers: &HeaderMap,
  text: String,
) -> Result<AnalysisResult, ApiError> {
  let request_id = headers
    .get("x-request-id")
    .and_then(|v| v.to_str().ok())
    .map(str::to_string)
    .unwrap_or_else(|| Uuid::new_v4().to_string());
  let span = info_span!("analyze", %request_id, bytes = text.len());

  let analyzer = state.analyzer.clone();
  let result = tokio::task::spawn_blocking(move || {
    let _guard = span.enter();
    let r = analyzer.analyze(&text);
    info!(
      severity = %r.severity,
      signatures = r.top_error_signatures.len(),
      ai_used = r.ai_used,
      "analysis complete"
    );
    r
  })
  .await
  .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))?;
  Ok(result)
}

fn json_rejection(e: JsonRejection) -> ApiError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    ApiError::PayloadTooLarge
  } else {
    ApiError::bad_request(e.body_text())
  }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    ApiError::PayloadTooLarge
  } else {
    ApiError::bad_request(e.body_text())
  }
}
