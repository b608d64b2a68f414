//! Server configuration from the environment.

use triage_engine::config::env_parse;
use triage_engine::EngineError;

#[derive(Debug, Clone)]
pub struct HfConfig {
  /// `HF_TOKEN`; absent means every enrichment fails with MissingCredential.
  pub token: Option<String>,
  pub model: String,
  pub base_url: String,
}

impl Default for HfConfig {
  fn default() -> Self {
    Self {
      token: None,
      model: "meta-llama/Meta-Llama-3-8B-Instruct".to_string(),
      base_url: "https://router.huggingface.co/v1".to_string(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub port: u16,
  pub max_upload_bytes: usize,
  pub ai_enabled: bool,
  pub hf: HfConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      port: 8080,
      max_upload_bytes: 2 * 1024 * 1024,
      ai_enabled: true,
      hf: HfConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> Result<Self, EngineError> {
    let mut cfg = Self::default();
    if let Some(port) = env_parse::<u16>("PORT")? {
      cfg.port = port;
    }
    if let Some(max) = env_parse::<usize>("MAX_UPLOAD_BYTES")? {
      cfg.max_upload_bytes = max;
    }
    if let Some(enabled) = env_parse::<bool>("TRIAGE_AI_ENABLED")? {
      cfg.ai_enabled = enabled;
    }
    cfg.hf.token = env_parse::<String>("HF_TOKEN")?;
    if let Some(model) = env_parse::<String>("HF_ROUTER_MODEL")? {
      cfg.hf.model = model;
    }
    if let Some(url) = env_parse::<String>("HF_BASE_URL")? {
      cfg.hf.base_url = url;
    }
    Ok(cfg)
  }
}
