//! Shared handler state.

use triage_engine::{Analyzer, RateLimiter};

pub struct AppState {
  pub analyzer: Analyzer,
  pub limiter: RateLimiter,
}
