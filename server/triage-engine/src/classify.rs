//! Priority-ordered keyword rules: severity, root cause, issues, next steps.
//!
//! Rules run in fixed order over the lowercased text. Every matching rule
//! appends its category and its steps; severity and root cause are only
//! written by the first rule that matches.

use crate::types::{IssueCategory, Severity};

struct Rule {
  category: IssueCategory,
  /// Any keyword (lowercase) present in the text triggers the rule.
  keywords: &'static [&'static str],
  severity: Severity,
  root_cause: &'static str,
  steps: &'static [&'static str],
}

const RULES: &[Rule] = &[
  Rule {
    category: IssueCategory::Database,
    keywords: &[
      "connection refused",
      "could not open connection",
      "sqltransientconnectionexception",
    ],
    severity: Severity::High,
    root_cause: "Database is unreachable, credentials/network issue, or connection pool exhausted.",
    steps: &[
      "Check DB availability (host/port), credentials, and network rules.",
      "Review connection pool metrics/timeouts and recent deployment changes.",
    ],
  },
  Rule {
    category: IssueCategory::NullReference,
    keywords: &["nullpointerexception"],
    severity: Severity::High,
    root_cause: "Unexpected null value or missing null-check in the execution path.",
    steps: &[
      "Locate the first application stack trace line (your package) and identify the failing method.",
      "Check recent changes around the failing code path.",
      "Add null-checks / validation and improve logging around inputs.",
    ],
  },
  Rule {
    category: IssueCategory::Timeout,
    keywords: &["timeout", "timed out"],
    severity: Severity::Medium,
    root_cause: "Downstream service is slow/unreachable or timeout values are too low.",
    steps: &[
      "Identify the dependency (HTTP/DB) causing the timeout from logs.",
      "Check latency spikes and retry behavior; consider increasing timeouts if appropriate.",
    ],
  },
];

const FALLBACK_ROOT_CAUSE: &str = "No known critical patterns detected in the provided log snippet.";
const FALLBACK_STEPS: &[&str] = &[
  "Provide a longer log window around the error (±50 lines) including stack trace.",
  "Share timestamp, request id/correlation id, and environment info if available.",
];

/// Outcome of rule classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
  pub severity: Severity,
  pub issues: Vec<IssueCategory>,
  pub root_cause: String,
  pub next_steps: Vec<String>,
}

/// Classify the full log text. Total over any input, including empty.
pub fn classify(text: &str) -> Classification {
  let lower = text.to_lowercase();

  let mut severity: Option<Severity> = None;
  let mut root_cause: Option<&'static str> = None;
  let mut issues = Vec::new();
  let mut next_steps = Vec::new();

  for rule in RULES {
    if !rule.keywords.iter().any(|k| lower.contains(k)) {
      continue;
    }
    issues.push(rule.category);
    severity.get_or_insert(rule.severity);
    root_cause.get_or_insert(rule.root_cause);
    next_steps.extend(rule.steps.iter().map(|s| s.to_string()));
  }

  if issues.is_empty() {
    return Classification {
      severity: Severity::Low,
      issues,
      root_cause: FALLBACK_ROOT_CAUSE.to_string(),
      next_steps: FALLBACK_STEPS.iter().map(|s| s.to_string()).collect(),
    };
  }

  Classification {
    severity: severity.unwrap_or(Severity::Low),
    issues,
    root_cause: root_cause.unwrap_or(FALLBACK_ROOT_CAUSE).to_string(),
    next_steps,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_is_low_with_generic_guidance() {
    let c = classify("");
    assert_eq!(c.severity, Severity::Low);
    assert!(c.issues.is_empty());
    assert_eq!(c.root_cause, FALLBACK_ROOT_CAUSE);
    assert_eq!(c.next_steps.len(), 2);
  }

  #[test]
  fn connection_refused_any_case_is_high_database() {
    for text in ["Connection refused", "CONNECTION REFUSED", "connection Refused by host"] {
      let c = classify(text);
      assert_eq!(c.severity, Severity::High, "{}", text);
      assert_eq!(c.issues, vec![IssueCategory::Database]);
    }
  }

  #[test]
  fn database_wins_over_timeout_but_both_are_tagged() {
    let c = classify("read timed out\nConnection refused");
    assert_eq!(c.severity, Severity::High);
    assert_eq!(c.issues, vec![IssueCategory::Database, IssueCategory::Timeout]);
    assert!(c.root_cause.starts_with("Database is unreachable"));
    // 2 database steps + 2 timeout steps, in rule order.
    assert_eq!(c.next_steps.len(), 4);
    assert!(c.next_steps[0].starts_with("Check DB availability"));
    assert!(c.next_steps[2].starts_with("Identify the dependency"));
  }

  #[test]
  fn null_reference_sets_high_and_three_steps() {
    let c = classify("java.lang.NullPointerException at Service.process");
    assert_eq!(c.severity, Severity::High);
    assert_eq!(c.issues, vec![IssueCategory::NullReference]);
    assert_eq!(c.next_steps.len(), 3);
  }

  #[test]
  fn timeout_alone_is_medium() {
    let c = classify("GET /orders timed out after 30s");
    assert_eq!(c.severity, Severity::Medium);
    assert_eq!(c.issues, vec![IssueCategory::Timeout]);
    assert!(c.root_cause.starts_with("Downstream service"));
  }

  #[test]
  fn all_three_rules_accumulate_steps() {
    let c = classify("SQLTransientConnectionException\nNullPointerException\nSocketTimeout");
    assert_eq!(c.severity, Severity::High);
    assert_eq!(c.issues.len(), 3);
    assert_eq!(c.next_steps.len(), 7);
  }
}
