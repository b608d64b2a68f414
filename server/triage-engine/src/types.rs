//! Core types for the triage engine (JSON contract + internal models).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity (closed set, serialized uppercase)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
  Low,
  Medium,
  High,
}

impl Severity {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "LOW",
      Self::Medium => "MEDIUM",
      Self::High => "HIGH",
    }
  }
}

impl std::fmt::Display for Severity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Issue categories
// ---------------------------------------------------------------------------

/// Category tag appended by a matching classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
  #[serde(rename = "Database connectivity issue detected")]
  Database,
  #[serde(rename = "NullPointerException detected")]
  NullReference,
  #[serde(rename = "Timeout detected")]
  Timeout,
}

impl IssueCategory {
  pub fn label(self) -> &'static str {
    match self {
      Self::Database => "Database connectivity issue detected",
      Self::NullReference => "NullPointerException detected",
      Self::Timeout => "Timeout detected",
    }
  }
}

impl std::fmt::Display for IssueCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// One distinct exception type seen in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSignature {
  pub exception_type: String,
  /// Trailing text of the first line this type appeared on.
  pub message: String,
  pub count: u32,
}

// ---------------------------------------------------------------------------
// AI insight (transient; only produced by a successful provider call)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
  pub summary: String,
  pub likely_cause: String,
  pub next_steps: Vec<String>,
}

// ---------------------------------------------------------------------------
// Output (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
  pub severity: Severity,
  pub detected_issues: Vec<IssueCategory>,
  pub possible_root_cause: String,
  pub next_steps: Vec<String>,
  pub top_error_signatures: Vec<ErrorSignature>,
  pub detected_ids: Vec<String>,
  pub ticket_title: String,
  pub ticket_body: String,
  pub suggested_grep_queries: Vec<String>,
  pub ai_used: bool,
  pub ai_provider: String,
  pub ai_error: Option<String>,
  pub ai_latency_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for the stdin binary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
    }
  }
}
