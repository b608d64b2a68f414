//! Log Triage Engine — deterministic, rule-based triage with optional AI enrichment.
//!
//! Turns a raw log excerpt into error signatures, a severity, a likely root
//! cause, next steps, grep commands and a ticket. An `InsightProvider` may
//! add a best-effort AI insight on top. A token-bucket `RateLimiter` gates
//! callers per (client, route class).
//!
//! No DB, no network; provider transports live outside this crate.

pub mod ai;
pub mod classify;
pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod grep;
pub mod ids;
pub mod ratelimit;
pub mod signature;
pub mod ticket;
pub mod timestamp;
pub mod types;

pub use ai::{AiFailure, DisabledProvider, InsightProvider, StaticProvider};
pub use config::{Config, RateLimitConfig, RouteLimit};
pub use engine::Analyzer;
pub use error::EngineError;
pub use ratelimit::{Admission, ClientIdentity, RateLimiter, RouteClass};
pub use types::{AiInsight, AnalysisResult, ErrorSignature, IssueCategory, Severity};
