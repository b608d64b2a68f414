//! Rate-limit middleware in front of the analyze routes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use triage_engine::{Admission, ClientIdentity, RouteClass};

use crate::error::ApiError;
use crate::state::AppState;

const LIMITED_PREFIX: &str = "/api/logs/analyze";

pub async fn rate_limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
  let path = req.uri().path().to_string();
  if !state.limiter.enabled() || !path.starts_with(LIMITED_PREFIX) {
    return next.run(req).await;
  }

  let forwarded = req
    .headers()
    .get("x-forwarded-for")
    .and_then(|v| v.to_str().ok());
  let peer = req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ci| ci.0.ip().to_string());
  let client = ClientIdentity::resolve(forwarded, peer.as_deref());

  match state.limiter.check(&client, RouteClass::from_path(&path)) {
    Admission::Allowed { remaining } => {
      let mut resp = next.run(req).await;
      resp
        .headers_mut()
        .insert("x-rate-limit-remaining", HeaderValue::from(remaining));
      resp
    }
    Admission::Denied { retry_after_secs } => ApiError::RateLimited {
      retry_after_seconds: retry_after_secs,
    }
    .at(&path)
    .into_response(),
  }
}
