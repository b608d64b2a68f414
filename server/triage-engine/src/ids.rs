//! Correlation / request / trace id extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static ID_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"(?i)(correlationId|correlation_id|requestId|request_id|traceId|trace_id|x-request-id|x-correlation-id)\s*[:=]\s*([a-zA-Z0-9\-]{6,})",
  )
  .expect("id pattern compiles")
});

/// Ids in order of first appearance, deduplicated, at most `max`.
pub fn extract(text: &str, max: usize) -> Vec<String> {
  let mut ids: Vec<String> = Vec::new();
  for caps in ID_RE.captures_iter(text) {
    if ids.len() >= max {
      break;
    }
    let id = &caps[2];
    if !ids.iter().any(|seen| seen == id) {
      ids.push(id.to_string());
    }
  }
  ids
}
