//! Best-effort AI enrichment on top of the rule-based result.
//!
//! `enrich` makes at most one provider call; `merge` is the pure half that
//! folds the outcome into the baseline. Provider failures never escape:
//! they are recorded in `ai_error` and the baseline is returned fully rendered.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::ai::{AiFailure, InsightProvider};
use crate::config::Config;
use crate::grep;
use crate::ticket;
use crate::timestamp::TimestampHint;
use crate::types::{AiInsight, AnalysisResult};

/// What one provider attempt produced.
#[derive(Debug, Clone)]
pub struct AiOutcome {
  pub provider: String,
  pub result: Result<AiInsight, AiFailure>,
  pub elapsed: Duration,
}

/// Call the provider once under the configured budget and merge the outcome.
pub fn enrich(
  baseline: AnalysisResult,
  text: &str,
  provider: &dyn InsightProvider,
  config: &Config,
) -> AnalysisResult {
  let outcome = attempt(text, provider, config);
  let hint = crate::timestamp::find_first(text);
  merge(baseline, outcome, hint.as_ref(), config)
}

fn attempt(text: &str, provider: &dyn InsightProvider, config: &Config) -> AiOutcome {
  let provider_name = provider.name().to_string();
  let len = text.chars().count();
  if len > config.ai_max_input_chars {
    return AiOutcome {
      provider: provider_name,
      result: Err(AiFailure::InputTooLarge {
        len,
        max: config.ai_max_input_chars,
      }),
      elapsed: Duration::ZERO,
    };
  }

  let budget = config.ai_timeout;
  let started = Instant::now();
  let mut result = provider.fetch_insight(text, budget);
  let elapsed = started.elapsed();

  // A late answer is discarded even if the provider ignored its budget.
  if result.is_ok() && elapsed > budget {
    result = Err(AiFailure::Timeout(budget));
  }

  AiOutcome {
    provider: provider_name,
    result,
    elapsed,
  }
}

/// Fold a provider outcome into the baseline and re-render derived fields.
pub fn merge(
  mut r: AnalysisResult,
  outcome: AiOutcome,
  hint: Option<&TimestampHint>,
  config: &Config,
) -> AnalysisResult {
  r.ai_provider = outcome.provider;

  let insight = match outcome.result {
    Ok(insight) => insight,
    Err(failure) => {
      warn!(provider = %r.ai_provider, error = %failure, "ai enrichment failed; using rule-based result");
      r.ai_used = false;
      r.ai_error = Some(failure.to_string());
      r.ai_latency_ms = None;
      render(&mut r, hint, config);
      return r;
    }
  };

  let cause = insight.likely_cause.trim();
  if !cause.is_empty() {
    r.possible_root_cause = cause.to_string();
  }

  r.next_steps = merge_steps(
    std::mem::take(&mut r.next_steps),
    insight.next_steps,
    config.max_next_steps,
  );

  render(&mut r, hint, config);

  let summary = insight.summary.trim();
  if !summary.is_empty() {
    r.ticket_body = ticket::with_ai_summary(summary, &r.ticket_body);
  }

  let latency_ms = outcome.elapsed.as_millis() as u64;
  r.ai_used = true;
  r.ai_error = None;
  r.ai_latency_ms = Some(latency_ms);
  debug!(provider = %r.ai_provider, latency_ms, "ai enrichment merged");
  r
}

/// Baseline steps first, then AI steps; exact duplicates dropped; capped at `max`.
pub fn merge_steps(baseline: Vec<String>, ai: Vec<String>, max: usize) -> Vec<String> {
  let mut out: Vec<String> = Vec::with_capacity(max);
  for step in baseline.into_iter().chain(ai) {
    if out.len() >= max {
      break;
    }
    if !out.contains(&step) {
      out.push(step);
    }
  }
  out
}

/// Recompute title, body and grep queries from the current state.
pub(crate) fn render(r: &mut AnalysisResult, hint: Option<&TimestampHint>, config: &Config) {
  r.ticket_title = ticket::title(&r.detected_issues, r.severity);
  r.ticket_body = ticket::body(r);
  r.suggested_grep_queries = grep::build(
    &r.top_error_signatures,
    &r.detected_ids,
    hint,
    &config.grep_target,
  );
}
