//! Insight provider contract and the provider-independent helpers around it.
//!
//! The transport (HTTP, auth, payload framing) lives outside this crate; a
//! provider only has to honor `fetch_insight` and its time budget.

use std::time::Duration;

use thiserror::Error;

use crate::types::AiInsight;

/// Every way enrichment can fail. All of them degrade to the rule-based result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiFailure {
  #[error("ai provider is disabled")]
  Disabled,

  #[error("ai credential is missing")]
  MissingCredential,

  #[error("ai input too large: {len} chars (max {max})")]
  InputTooLarge { len: usize, max: usize },

  #[error("ai call timed out after {}ms", .0.as_millis())]
  Timeout(Duration),

  #[error("ai transport: {0}")]
  Transport(String),

  #[error("ai http {status}: {body}")]
  Http { status: u16, body: String },

  #[error("ai response malformed: {0}")]
  Malformed(String),
}

pub trait InsightProvider: Send + Sync {
  /// Short provider name reported as `aiProvider`.
  fn name(&self) -> &str;

  /// One attempt, bounded by `budget`.
  fn fetch_insight(&self, log: &str, budget: Duration) -> Result<AiInsight, AiFailure>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

impl InsightProvider for DisabledProvider {
  fn name(&self) -> &str {
    "none"
  }

  fn fetch_insight(&self, _log: &str, _budget: Duration) -> Result<AiInsight, AiFailure> {
    Err(AiFailure::Disabled)
  }
}

/// Returns the same insight for every call.
#[derive(Debug, Clone)]
pub struct StaticProvider {
  insight: AiInsight,
}

impl StaticProvider {
  pub fn new(insight: AiInsight) -> Self {
    Self { insight }
  }

  /// Canned database-flavoured insight for demos and smoke tests.
  pub fn sample() -> Self {
    Self::new(AiInsight {
      summary: "AI analysis suggests a database-related incident impacting request processing.".into(),
      likely_cause: "Primary issue appears to be database connectivity instability, causing cascading timeouts and application errors.".into(),
      next_steps: vec![
        "Verify database health and connection pool metrics.".into(),
        "Check if recent deployments affected DB credentials or network rules.".into(),
        "Monitor retry and timeout configuration for dependent services.".into(),
        "Review application logs around the first occurrence timestamp.".into(),
      ],
    })
  }
}

impl InsightProvider for StaticProvider {
  fn name(&self) -> &str {
    "static"
  }

  fn fetch_insight(&self, _log: &str, _budget: Duration) -> Result<AiInsight, AiFailure> {
    Ok(self.insight.clone())
  }
}

const MAX_PARSED_STEPS: usize = 6;
const DEFAULT_SUMMARY: &str = "AI-generated incident summary.";
const DEFAULT_CAUSE: &str = "Likely caused by an application or dependency failure.";
const DEFAULT_STEPS: &[&str] = &[
  "Check the first error occurrence timestamp and inspect ±5 minutes around it.",
  "Confirm recent deployments/changes and service health.",
  "Validate downstream dependencies (DB/HTTP) and timeout/retry settings.",
];

/// Parse model output in the line format
/// `SUMMARY: ...` / `LIKELY_CAUSE: ...` / `NEXT_STEPS:` followed by `- step` lines.
pub fn parse_insight(text: &str) -> AiInsight {
  let mut summary = "";
  let mut cause = "";
  let mut steps: Vec<String> = Vec::new();
  let mut in_steps = false;

  for line in text.lines() {
    let l = line.trim();
    if let Some(rest) = l.strip_prefix("SUMMARY:") {
      summary = rest.trim();
    } else if let Some(rest) = l.strip_prefix("LIKELY_CAUSE:") {
      cause = rest.trim();
    } else if l.starts_with("NEXT_STEPS:") {
      in_steps = true;
    } else if in_steps {
      if let Some(step) = l.strip_prefix('-') {
        let step = step.trim();
        if !step.is_empty() && !steps.iter().any(|s| s == step) {
          steps.push(step.to_string());
        }
      }
    }
  }

  if steps.is_empty() {
    steps = DEFAULT_STEPS.iter().map(|s| s.to_string()).collect();
  }
  steps.truncate(MAX_PARSED_STEPS);

  let summary = if summary.is_empty() { DEFAULT_SUMMARY } else { summary };
  let cause = if cause.is_empty() { DEFAULT_CAUSE } else { cause };
  AiInsight {
    summary: summary.to_string(),
    likely_cause: cause.to_string(),
    next_steps: steps,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_well_formed_output() {
    let text = "\
SUMMARY: Orders API failing on DB connect.
LIKELY_CAUSE: Pool exhausted after deploy.
NEXT_STEPS:
- Check pool size
- Roll back deploy
- Check pool size
-
- Watch latency";
    let i = parse_insight(text);
    assert_eq!(i.summary, "Orders API failing on DB connect.");
    assert_eq!(i.likely_cause, "Pool exhausted after deploy.");
    assert_eq!(i.next_steps, vec!["Check pool size", "Roll back deploy", "Watch latency"]);
  }

  #[test]
  fn garbage_falls_back_to_defaults() {
    let i = parse_insight("I am a language model and here is a poem.");
    assert_eq!(i.summary, DEFAULT_SUMMARY);
    assert_eq!(i.likely_cause, DEFAULT_CAUSE);
    assert_eq!(i.next_steps.len(), 3);
  }

  #[test]
  fn steps_are_capped() {
    let mut text = String::from("NEXT_STEPS:\n");
    for n in 0..10 {
      text.push_str(&format!("- step {}\n", n));
    }
    assert_eq!(parse_insight(&text).next_steps.len(), MAX_PARSED_STEPS);
  }

  #[test]
  fn dashes_before_next_steps_are_ignored() {
    let i = parse_insight("- stray\nNEXT_STEPS:\n- real");
    assert_eq!(i.next_steps, vec!["real"]);
  }

  #[test]
  fn disabled_provider_always_fails() {
    let err = DisabledProvider
      .fetch_insight("x", Duration::from_secs(1))
      .unwrap_err();
    assert_eq!(err, AiFailure::Disabled);
    assert_eq!(err.to_string(), "ai provider is disabled");
  }
}
