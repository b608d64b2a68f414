//! Binary entrypoint for the triage API.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use triage_api::{AppState, HuggingFaceProvider, ServerConfig};
use triage_engine::{Analyzer, Config, DisabledProvider, InsightProvider, RateLimitConfig, RateLimiter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let server = ServerConfig::from_env()?;
  let engine = Config::from_env()?;
  let limits = RateLimitConfig::from_env()?;

  let provider: Arc<dyn InsightProvider> = if server.ai_enabled {
    Arc::new(HuggingFaceProvider::new(server.hf.clone()))
  } else {
    Arc::new(DisabledProvider)
  };
  info!(
    provider = provider.name(),
    ai_timeout_secs = engine.ai_timeout.as_secs(),
    rate_limit_enabled = limits.enabled,
    analyze_per_minute = limits.analyze.per_minute,
    analyze_file_per_minute = limits.analyze_file.per_minute,
    "starting triage-api"
  );

  let state = Arc::new(AppState {
    analyzer: Analyzer::new(engine, provider),
    limiter: RateLimiter::new(limits),
  });
  let app = triage_api::router(state, server.max_upload_bytes);

  let addr = SocketAddr::from(([127, 0, 0, 1], server.port));
  info!("triage-api listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

  Ok(())
}
