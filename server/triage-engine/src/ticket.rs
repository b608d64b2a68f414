//! Ticket title and body rendering. Pure functions of the analysis state.

use crate::types::{AnalysisResult, IssueCategory, Severity};

/// Title from detected issues. Priority: database, timeout, null reference.
pub fn title(issues: &[IssueCategory], severity: Severity) -> String {
  let topic = if issues.contains(&IssueCategory::Database) {
    "Database connectivity issue"
  } else if issues.contains(&IssueCategory::Timeout) {
    "Timeout / downstream latency"
  } else if issues.contains(&IssueCategory::NullReference) {
    "NullPointerException"
  } else {
    "Application error"
  };
  format!("Incident: {} ({})", topic, severity)
}

/// Ticket body with fixed sections in fixed order.
pub fn body(r: &AnalysisResult) -> String {
  let mut out = String::new();

  out.push_str("Summary:\n");
  out.push_str(&format!("- {}\n\n", r.possible_root_cause.trim()));

  out.push_str("Top error signatures:\n");
  if r.top_error_signatures.is_empty() {
    out.push_str("- (none)\n");
  }
  for s in &r.top_error_signatures {
    out.push_str(&format!("- {} ({} occurrences)", s.exception_type, s.count));
    if !s.message.trim().is_empty() {
      out.push_str(&format!(" | example: {}", s.message));
    }
    out.push('\n');
  }
  out.push('\n');

  if !r.detected_ids.is_empty() {
    out.push_str("Detected IDs:\n");
    for id in &r.detected_ids {
      out.push_str(&format!("- {}\n", id));
    }
    out.push('\n');
  }

  out.push_str("Recommended next steps:\n");
  if r.next_steps.is_empty() {
    out.push_str("- (none)\n");
  }
  for step in &r.next_steps {
    out.push_str(&format!("- {}\n", step));
  }
  out.push('\n');

  out.push_str("Context to request:\n");
  out.push_str("- Timestamp range (+/- 5 min)\n");
  out.push_str("- Request ID / Correlation ID (if available)\n");
  out.push_str("- Environment (prod/stage) and deployment version\n");

  out
}

/// Prepend an AI summary block to a rendered body.
pub fn with_ai_summary(summary: &str, body: &str) -> String {
  format!("AI Summary:\n- {}\n\n{}", summary, body)
}
