//! Configuration for triagemd.
//!
//! Read from the process environment, matching the service's deployment
//! contract (PORT, OPENROUTER_API_KEY). Missing variables fall back to
//! defaults; unparseable numerics warn and keep the default.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer credential. Absent means the capability is unconfigured and
    /// every classification fails fast without a network call.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model requested from the completion API
    #[serde(default = "default_model")]
    pub model: String,

    /// Hard wall-clock bound for one completion call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    8
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Assemble configuration from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("TRIAGEM_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Invalid PORT '{}', keeping {}", port, config.port),
            }
        }
        if let Ok(key) = env::var("OPENROUTER_API_KEY") {
            if !key.is_empty() {
                config.llm.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("OPENROUTER_URL") {
            config.llm.api_url = url;
        }
        if let Ok(model) = env::var("OPENROUTER_MODEL") {
            config.llm.model = model;
        }
        if let Ok(timeout) = env::var("TRIAGEM_LLM_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.llm.timeout_secs = secs,
                Err(_) => warn!(
                    "Invalid TRIAGEM_LLM_TIMEOUT_SECS '{}', keeping {}",
                    timeout, config.llm.timeout_secs
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 8);
        assert!(config.llm.api_key.is_none());
        assert_eq!(
            config.llm.api_url,
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
