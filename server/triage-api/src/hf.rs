//! HuggingFace router transport for the insight provider contract.
//!
//! OpenAI-compatible chat completion; the model is asked for the
//! SUMMARY / LIKELY_CAUSE / NEXT_STEPS line format that `parse_insight` reads.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use triage_engine::ai::{parse_insight, AiFailure, InsightProvider};
use triage_engine::AiInsight;

use crate::config::HfConfig;

const PROMPT_LOG_CHARS: usize = 6000;
const ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
  config: HfConfig,
}

impl HuggingFaceProvider {
  pub fn new(config: HfConfig) -> Self {
    Self { config }
  }

  fn endpoint_url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage>,
  temperature: f32,
  max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
  role: &'static str,
  content: String,
}

impl InsightProvider for HuggingFaceProvider {
  fn name(&self) -> &str {
    "huggingface"
  }

  fn fetch_insight(&self, log: &str, budget: Duration) -> Result<AiInsight, AiFailure> {
    let token = match self.config.token.as_deref() {
      Some(t) if !t.trim().is_empty() => t,
      _ => return Err(AiFailure::MissingCredential),
    };

    let body = ChatRequest {
      model: &self.config.model,
      messages: vec![ChatMessage {
        role: "user",
        content: build_prompt(log),
      }],
      temperature: 0.2,
      max_tokens: 320,
    };

    // Built per call: the blocking client must not be created or dropped on an async thread.
    let client = reqwest::blocking::Client::builder()
      .timeout(budget)
      .build()
      .map_err(|e| AiFailure::Transport(e.to_string()))?;

    let resp = client
      .post(self.endpoint_url())
      .bearer_auth(token)
      .json(&body)
      .send()
      .map_err(|e| transport_failure(e, budget))?;

    let status = resp.status();
    let text = resp.text().map_err(|e| transport_failure(e, budget))?;
    if !status.is_success() {
      return Err(AiFailure::Http {
        status: status.as_u16(),
        body: compact(&text),
      });
    }

    let content = extract_content(&text)?;
    Ok(parse_insight(&content))
  }
}

fn transport_failure(e: reqwest::Error, budget: Duration) -> AiFailure {
  if e.is_timeout() {
    AiFailure::Timeout(budget)
  } else {
    AiFailure::Transport(e.to_string())
  }
}

/// Pull `choices[0].message.content` out of a chat completion response.
fn extract_content(raw: &str) -> Result<String, AiFailure> {
  let root: Value =
    serde_json::from_str(raw).map_err(|e| AiFailure::Malformed(format!("invalid json: {}", e)))?;

  if let Some(err) = root.get("error") {
    return Err(AiFailure::Malformed(format!("provider error: {}", compact(&err.to_string()))));
  }

  let first = root
    .get("choices")
    .and_then(Value::as_array)
    .and_then(|c| c.first())
    .ok_or_else(|| AiFailure::Malformed("response has no choices".into()))?;

  Ok(
    first
      .pointer("/message/content")
      .and_then(Value::as_str)
      .unwrap_or_default()
      .to_string(),
  )
}

fn build_prompt(log: &str) -> String {
  let snippet: String = log.chars().take(PROMPT_LOG_CHARS).collect();
  format!(
    "You are a Production Support Engineer.

Analyze the following log snippet and return ONLY in the exact format below.
Do NOT add explanations, markdown, or any text outside this format.

FORMAT:
SUMMARY: <1-2 sentences>
LIKELY_CAUSE: <1 sentence>
NEXT_STEPS:
- <step 1>
- <step 2>
- <step 3>
- <step 4>
- <step 5>

RULES:
- Do NOT invent fake names (e.g., \"method A\", \"ClassX\") if they do not appear in the log.
- If real class or method names are missing, speak generically (e.g., \"a null reference in application code\").
- Be concise, practical, and production-focused.
- Always return exactly 5 NEXT_STEPS.

LOG:
{}
",
    snippet
  )
}

/// Collapse whitespace and bound the length for error strings.
fn compact(s: &str) -> String {
  let joined = s.split_whitespace().collect::<Vec<_>>().join(" ");
  joined.chars().take(ERROR_BODY_CHARS).collect()
}
