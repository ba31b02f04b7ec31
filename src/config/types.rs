//! Configuration type definitions for ScanBrief
//!
//! All sections deserialize with `#[serde(default)]`, so a partial config file
//! fills the rest from defaults. Credentials are wrapped in [`SecretString`]
//! as soon as they are read.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use crate::providers::DEFAULT_MODEL_KEY;

/// Main configuration struct for ScanBrief
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider credentials and endpoint overrides
    pub providers: ProvidersConfig,
    /// Request policy and default model
    pub analysis: AnalysisConfig,
    /// HTTP gateway configuration
    pub gateway: GatewayConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Provider sections keyed by family id (`openai`, `github`, ...).
///
/// Keys outside the family registry are kept but never read; `config check`
/// reports them.
pub type ProvidersConfig = HashMap<String, ProviderConfig>;

/// Generic provider configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key for authentication
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    /// Custom API base URL
    pub api_base: Option<String>,
    /// Override for the serialized-data length limit
    pub max_input_chars: Option<usize>,
}

/// Blank strings count as "not configured".
fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(SecretString::from))
}

// ============================================================================
// Analysis Configuration
// ============================================================================

/// Request policy values and the default model key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Model key used when the caller supplies none
    pub default_model: String,
    /// Sampling temperature for models that accept it
    pub temperature: f32,
    /// Nucleus sampling for models that accept it
    pub top_p: f32,
    /// `max_tokens` budget for standard models
    pub max_tokens: u32,
    /// `max_completion_tokens` budget for reasoning models
    pub max_completion_tokens: u32,
    /// Deadline for standard models, in seconds
    pub timeout_secs: u64,
    /// Deadline for reasoning models, in seconds
    pub reasoning_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL_KEY.to_string(),
            temperature: 0.1,
            top_p: 1.0,
            max_tokens: 4000,
            max_completion_tokens: 16000,
            timeout_secs: 120,
            reasoning_timeout_secs: 300,
        }
    }
}

// ============================================================================
// Gateway Configuration
// ============================================================================

/// Gateway server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable text
    Pretty,
    /// Compact text with targets; the default
    #[default]
    Component,
    /// JSON lines
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Append logs to this file instead of stderr
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Component,
            level: "info".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.default_model, "gpt-4o");
        assert_eq!(config.gateway.port, 3001);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"analysis": {"max_tokens": 2000}}"#).unwrap();
        assert_eq!(config.analysis.max_tokens, 2000);
        assert_eq!(config.analysis.max_completion_tokens, 16000);
        assert_eq!(config.gateway.host, "0.0.0.0");
    }

    #[test]
    fn test_api_key_wrapped_and_hidden() {
        let config: Config =
            serde_json::from_str(r#"{"providers": {"openai": {"api_key": "sk-hidden-value"}}}"#)
                .unwrap();
        let key = config.providers["openai"].api_key.as_ref().unwrap();
        assert_eq!(key.expose_secret(), "sk-hidden-value");
        assert!(!format!("{:?}", config).contains("sk-hidden-value"));
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let config: Config =
            serde_json::from_str(r#"{"providers": {"github": {"api_key": "  "}}}"#).unwrap();
        assert!(config.providers["github"].api_key.is_none());
    }

    #[test]
    fn test_providers_keyed_by_id() {
        let config: Config = serde_json::from_str(
            r#"{"providers": {"github": {"max_input_chars": 5000}, "other": {}}}"#,
        )
        .unwrap();
        assert_eq!(config.providers["github"].max_input_chars, Some(5000));
        assert!(config.providers.contains_key("other"));
        assert!(!config.providers.contains_key("openai"));
    }
}
