//! Engine and rate-limit configuration with sane defaults.

use std::str::FromStr;
use std::time::Duration;

use crate::error::EngineError;

/// Tunables for the analysis pipeline and AI enrichment.
#[derive(Debug, Clone)]
pub struct Config {
  /// Time budget handed to the insight provider.
  pub ai_timeout: Duration,
  /// Inputs longer than this (in chars) skip the provider call.
  pub ai_max_input_chars: usize,
  /// Cap on next steps after merging AI steps.
  pub max_next_steps: usize,
  /// Cap on extracted correlation/request/trace ids.
  pub max_detected_ids: usize,
  /// File name used in suggested grep commands.
  pub grep_target: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      ai_timeout: Duration::from_secs(25),
      ai_max_input_chars: 10_000,
      max_next_steps: 5,
      max_detected_ids: 3,
      grep_target: "app.log".to_string(),
    }
  }
}

impl Config {
  /// Defaults overridden by `TRIAGE_AI_TIMEOUT_SECS` and `TRIAGE_AI_MAX_INPUT_CHARS`.
  pub fn from_env() -> Result<Self, EngineError> {
    let mut cfg = Self::default();
    if let Some(secs) = env_parse::<u64>("TRIAGE_AI_TIMEOUT_SECS")? {
      if secs == 0 {
        return Err(EngineError::config("TRIAGE_AI_TIMEOUT_SECS", "must be > 0"));
      }
      cfg.ai_timeout = Duration::from_secs(secs);
    }
    if let Some(max) = env_parse::<usize>("TRIAGE_AI_MAX_INPUT_CHARS")? {
      cfg.ai_max_input_chars = max;
    }
    Ok(cfg)
  }
}

/// Capacity and refill rate for one route class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLimit {
  /// Bucket capacity; also the number of tokens refilled per minute.
  pub per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
  pub enabled: bool,
  pub analyze: RouteLimit,
  pub analyze_file: RouteLimit,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      analyze: RouteLimit { per_minute: 30 },
      analyze_file: RouteLimit { per_minute: 10 },
    }
  }
}

impl RateLimitConfig {
  /// Defaults overridden by `RATE_LIMIT_ENABLED`, `RATE_LIMIT_ANALYZE_PER_MINUTE`
  /// and `RATE_LIMIT_ANALYZE_FILE_PER_MINUTE`.
  pub fn from_env() -> Result<Self, EngineError> {
    let mut cfg = Self::default();
    if let Some(enabled) = env_parse::<bool>("RATE_LIMIT_ENABLED")? {
      cfg.enabled = enabled;
    }
    if let Some(n) = env_parse::<u32>("RATE_LIMIT_ANALYZE_PER_MINUTE")? {
      cfg.analyze = route_limit("RATE_LIMIT_ANALYZE_PER_MINUTE", n)?;
    }
    if let Some(n) = env_parse::<u32>("RATE_LIMIT_ANALYZE_FILE_PER_MINUTE")? {
      cfg.analyze_file = route_limit("RATE_LIMIT_ANALYZE_FILE_PER_MINUTE", n)?;
    }
    Ok(cfg)
  }
}

fn route_limit(key: &str, per_minute: u32) -> Result<RouteLimit, EngineError> {
  if per_minute == 0 {
    return Err(EngineError::config(key, "must be > 0"));
  }
  Ok(RouteLimit { per_minute })
}

/// Read and parse an env var. Unset or blank is `None`; unparsable is an error.
pub fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, EngineError> {
  match std::env::var(key) {
    Ok(raw) if !raw.trim().is_empty() => raw
      .trim()
      .parse::<T>()
      .map(Some)
      .map_err(|_| EngineError::config(key, &format!("cannot parse {:?}", raw))),
    _ => Ok(None),
  }
}
