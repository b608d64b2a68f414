//! Token-bucket admission control keyed by (client, route class).
//!
//! Buckets are created full on first sight and refilled continuously in
//! proportion to elapsed time. The table is never pruned: it grows with the
//! number of distinct clients seen over the process lifetime.

use std::time::Instant;

use dashmap::DashMap;
use tracing::debug;

use crate::config::{RateLimitConfig, RouteLimit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
  Analyze,
  AnalyzeFile,
}

impl RouteClass {
  /// Routes carrying a file-path marker get the upload limit.
  pub fn from_path(path: &str) -> Self {
    if path.contains("/file") {
      Self::AnalyzeFile
    } else {
      Self::Analyze
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Analyze => "analyze",
      Self::AnalyzeFile => "analyze-file",
    }
  }
}

/// Who is asking. All unidentifiable callers share the `unknown` identity
/// and therefore one bucket per route class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
  pub const UNKNOWN: &'static str = "unknown";

  /// First `X-Forwarded-For` entry if non-blank, else the peer address, else `unknown`.
  pub fn resolve(forwarded_for: Option<&str>, peer: Option<&str>) -> Self {
    let forwarded = forwarded_for
      .and_then(|v| v.split(',').next())
      .map(str::trim)
      .filter(|v| !v.is_empty());
    let peer = peer.map(str::trim).filter(|v| !v.is_empty());
    let id = forwarded.or(peer).unwrap_or(Self::UNKNOWN);
    Self(id.to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Result of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
  Allowed { remaining: u64 },
  Denied { retry_after_secs: u64 },
}

impl Admission {
  pub fn is_allowed(self) -> bool {
    matches!(self, Self::Allowed { .. })
  }
}

#[derive(Debug, Clone)]
struct RateBucket {
  capacity: f64,
  tokens: f64,
  last_refill: Instant,
}

impl RateBucket {
  fn full(limit: RouteLimit, now: Instant) -> Self {
    let capacity = f64::from(limit.per_minute);
    Self {
      capacity,
      tokens: capacity,
      last_refill: now,
    }
  }

  fn refill(&mut self, now: Instant) {
    let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
    if elapsed > 0.0 {
      // The full capacity is regained over one minute.
      self.tokens = (self.tokens + elapsed * self.capacity / 60.0).min(self.capacity);
      self.last_refill = now;
    }
  }

  fn try_consume(&mut self) -> Admission {
    if self.tokens >= 1.0 {
      self.tokens -= 1.0;
      return Admission::Allowed {
        remaining: self.tokens.floor() as u64,
      };
    }
    let wait = (1.0 - self.tokens) * 60.0 / self.capacity;
    Admission::Denied {
      retry_after_secs: (wait.ceil() as u64).max(1),
    }
  }
}

// TODO: evict idle (client, route) buckets with a TTL sweep; the map only grows today.
pub struct RateLimiter {
  config: RateLimitConfig,
  buckets: DashMap<(ClientIdentity, RouteClass), RateBucket>,
}

impl RateLimiter {
  pub fn new(config: RateLimitConfig) -> Self {
    Self {
      config,
      buckets: DashMap::new(),
    }
  }

  pub fn enabled(&self) -> bool {
    self.config.enabled
  }

  pub fn limit_for(&self, route: RouteClass) -> RouteLimit {
    match route {
      RouteClass::Analyze => self.config.analyze,
      RouteClass::AnalyzeFile => self.config.analyze_file,
    }
  }

  pub fn check(&self, client: &ClientIdentity, route: RouteClass) -> Admission {
    self.check_at(client, route, Instant::now())
  }

  /// Refill then consume, as one step under the key's shard lock.
  pub fn check_at(&self, client: &ClientIdentity, route: RouteClass, now: Instant) -> Admission {
    let limit = self.limit_for(route);
    let mut bucket = self
      .buckets
      .entry((client.clone(), route))
      .or_insert_with(|| RateBucket::full(limit, now));
    bucket.refill(now);
    let admission = bucket.try_consume();
    drop(bucket);

    if let Admission::Denied { retry_after_secs } = admission {
      debug!(client = client.as_str(), route = route.as_str(), retry_after_secs, "rate limited");
    }
    admission
  }

  /// Number of (client, route) buckets created so far.
  pub fn tracked_keys(&self) -> usize {
    self.buckets.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  fn limiter(analyze: u32, file: u32) -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
      enabled: true,
      analyze: RouteLimit { per_minute: analyze },
      analyze_file: RouteLimit { per_minute: file },
    })
  }

  fn client(s: &str) -> ClientIdentity {
    ClientIdentity::resolve(None, Some(s))
  }

  #[test]
  fn route_class_from_path() {
    assert_eq!(RouteClass::from_path("/api/logs/analyze"), RouteClass::Analyze);
    assert_eq!(RouteClass::from_path("/api/logs/analyze/file"), RouteClass::AnalyzeFile);
  }

  #[test]
  fn identity_prefers_forwarded_for() {
    let id = ClientIdentity::resolve(Some(" 203.0.113.7 , 10.0.0.1"), Some("10.0.0.2"));
    assert_eq!(id.as_str(), "203.0.113.7");
    let id = ClientIdentity::resolve(Some("   "), Some("10.0.0.2"));
    assert_eq!(id.as_str(), "10.0.0.2");
    let id = ClientIdentity::resolve(None, None);
    assert_eq!(id.as_str(), ClientIdentity::UNKNOWN);
  }

  #[test]
  fn k_plus_first_request_is_denied() {
    let rl = limiter(3, 1);
    let now = Instant::now();
    let a = client("1.1.1.1");
    assert_eq!(rl.check_at(&a, RouteClass::Analyze, now), Admission::Allowed { remaining: 2 });
    assert_eq!(rl.check_at(&a, RouteClass::Analyze, now), Admission::Allowed { remaining: 1 });
    assert_eq!(rl.check_at(&a, RouteClass::Analyze, now), Admission::Allowed { remaining: 0 });
    // 3 per minute => one token every 20s.
    assert_eq!(
      rl.check_at(&a, RouteClass::Analyze, now),
      Admission::Denied { retry_after_secs: 20 }
    );
  }

  #[test]
  fn other_client_and_other_route_are_independent() {
    let rl = limiter(1, 1);
    let now = Instant::now();
    let a = client("1.1.1.1");
    let b = client("2.2.2.2");
    assert!(rl.check_at(&a, RouteClass::Analyze, now).is_allowed());
    assert!(!rl.check_at(&a, RouteClass::Analyze, now).is_allowed());
    assert!(rl.check_at(&b, RouteClass::Analyze, now).is_allowed());
    assert!(rl.check_at(&a, RouteClass::AnalyzeFile, now).is_allowed());
    assert_eq!(rl.tracked_keys(), 3);
  }

  #[test]
  fn refill_is_continuous_and_capped() {
    let rl = limiter(60, 10);
    let a = client("1.1.1.1");
    let t0 = Instant::now();
    for _ in 0..60 {
      assert!(rl.check_at(&a, RouteClass::Analyze, t0).is_allowed());
    }
    assert!(!rl.check_at(&a, RouteClass::Analyze, t0).is_allowed());

    // 60/min => one token per second, no waiting for a full-minute reset.
    let t1 = t0 + Duration::from_secs(1);
    assert_eq!(rl.check_at(&a, RouteClass::Analyze, t1), Admission::Allowed { remaining: 0 });

    // Long idle refills only up to capacity.
    let t2 = t1 + Duration::from_secs(3600);
    assert_eq!(rl.check_at(&a, RouteClass::Analyze, t2), Admission::Allowed { remaining: 59 });
  }

  #[test]
  fn retry_after_is_at_least_one_second() {
    let rl = limiter(600, 10);
    let a = client("1.1.1.1");
    let t0 = Instant::now();
    for _ in 0..600 {
      rl.check_at(&a, RouteClass::Analyze, t0);
    }
    // 10 tokens/s => 0.1s to the next token, reported as 1s.
    assert_eq!(
      rl.check_at(&a, RouteClass::Analyze, t0),
      Admission::Denied { retry_after_secs: 1 }
    );
  }

  #[test]
  fn file_route_uses_its_own_limit() {
    let rl = limiter(30, 2);
    let a = client("1.1.1.1");
    let now = Instant::now();
    assert!(rl.check_at(&a, RouteClass::AnalyzeFile, now).is_allowed());
    assert!(rl.check_at(&a, RouteClass::AnalyzeFile, now).is_allowed());
    assert_eq!(
      rl.check_at(&a, RouteClass::AnalyzeFile, now),
      Admission::Denied { retry_after_secs: 30 }
    );
  }
}
