//! Structured error types for the triage engine.
//!
//! The analysis pipeline itself is total; only configuration loading and the
//! binary's I/O can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("config: {key}: {reason}")]
  Config { key: String, reason: String },

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn config(key: &str, reason: &str) -> Self {
    Self::Config {
      key: key.to_string(),
      reason: reason.to_string(),
    }
  }
}
