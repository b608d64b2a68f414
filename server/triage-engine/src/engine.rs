//! Pipeline entry point: rules first, then best-effort enrichment.

use std::sync::Arc;

use crate::ai::{DisabledProvider, InsightProvider};
use crate::classify;
use crate::config::Config;
use crate::enrich;
use crate::ids;
use crate::signature;
use crate::timestamp;
use crate::types::*;

/// Runs the full triage pipeline. Stateless across calls; share freely.
#[derive(Clone)]
pub struct Analyzer {
  config: Config,
  provider: Arc<dyn InsightProvider>,
}

impl Analyzer {
  pub fn new(config: Config, provider: Arc<dyn InsightProvider>) -> Self {
    Self { config, provider }
  }

  /// Rule-based only; every enrichment attempt reports the provider as disabled.
  pub fn with_defaults() -> Self {
    Self::new(Config::default(), Arc::new(DisabledProvider))
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Analyze raw log text. Total: empty text is classified like any other input.
  pub fn analyze(&self, text: &str) -> AnalysisResult {
    let base = baseline(text, &self.config);
    enrich::enrich(base, text, self.provider.as_ref(), &self.config)
  }
}

/// The pure rule-based result, fully rendered, with no AI involvement.
pub fn baseline(text: &str, config: &Config) -> AnalysisResult {
  let top_error_signatures = signature::extract(text);
  let c = classify::classify(text);
  let detected_ids = ids::extract(text, config.max_detected_ids);
  let hint = timestamp::find_first(text);

  let mut r = AnalysisResult {
    severity: c.severity,
    detected_issues: c.issues,
    possible_root_cause: c.root_cause,
    next_steps: enrich::merge_steps(c.next_steps, Vec::new(), config.max_next_steps),
    top_error_signatures,
    detected_ids,
    ticket_title: String::new(),
    ticket_body: String::new(),
    suggested_grep_queries: Vec::new(),
    ai_used: false,
    ai_provider: DisabledProvider.name().to_string(),
    ai_error: None,
    ai_latency_ms: None,
  };
  enrich::render(&mut r, hint.as_ref(), config);
  r
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai::StaticProvider;

  #[test]
  fn null_pointer_example() {
    let r = Analyzer::with_defaults().analyze("java.lang.NullPointerException at Service.process");
    assert_eq!(r.severity, Severity::High);
    assert_eq!(r.detected_issues, vec![IssueCategory::NullReference]);
    assert_eq!(
      r.top_error_signatures,
      vec![ErrorSignature {
        exception_type: "NullPointerException".into(),
        message: "at Service.process".into(),
        count: 1,
      }]
    );
    assert!(r.ticket_title.contains("NullPointerException"));
    assert_eq!(r.suggested_grep_queries[0], "grep -n \"ERROR\" app.log");
    assert_eq!(r.suggested_grep_queries[1], "grep -n \"WARN\" app.log");
    assert_eq!(
      r.suggested_grep_queries[2],
      "grep -n \"NullPointerException\" app.log"
    );
  }

  #[test]
  fn empty_text_is_low_and_fully_rendered() {
    let r = Analyzer::with_defaults().analyze("");
    assert_eq!(r.severity, Severity::Low);
    assert!(!r.next_steps.is_empty());
    assert_eq!(r.ticket_title, "Incident: Application error (LOW)");
    assert!(r.ticket_body.contains("Top error signatures:\n- (none)"));
    assert_eq!(r.suggested_grep_queries.len(), 4);
    assert!(!r.ai_used);
  }

  #[test]
  fn baseline_caps_next_steps() {
    let r = baseline("connection refused\nNullPointerException\ntimeout", &Config::default());
    assert_eq!(r.next_steps.len(), 5);
  }

  #[test]
  fn ids_flow_into_body_and_grep() {
    let text = "ERROR traceId=trace-9a8b7c failed\n2025-06-01T14:05:30 WARN retry";
    let r = baseline(text, &Config::default());
    assert_eq!(r.detected_ids, vec!["trace-9a8b7c"]);
    assert!(r.ticket_body.contains("Detected IDs:\n- trace-9a8b7c\n"));
    assert!(r
      .suggested_grep_queries
      .contains(&"grep -n \"ERROR\" app.log | grep \"trace-9a8b7c\"".to_string()));
    assert_eq!(
      r.suggested_grep_queries.last().map(String::as_str),
      Some("grep -n \"2025-06-01\" app.log | head -n 200")
    );
  }

  #[test]
  fn analyzer_with_static_provider_marks_ai_used() {
    let analyzer = Analyzer::new(Config::default(), Arc::new(StaticProvider::sample()));
    let r = analyzer.analyze("Connection refused");
    assert!(r.ai_used);
    assert_eq!(r.ai_provider, "static");
    assert!(r.next_steps.len() <= 5);
    assert!(r.ticket_body.starts_with("AI Summary:\n"));
  }
}
