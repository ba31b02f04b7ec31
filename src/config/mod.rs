//! Configuration management for ScanBrief
//!
//! Configuration is loaded from `~/.scanbrief/config.json` with environment
//! variable overrides and handed to the rest of the process as a plain value.

mod types;
pub mod validate;

pub use types::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use crate::error::Result;
use crate::providers::{
    family_spec, ProviderEndpoints, ProviderFamily, RequestPolicy, FAMILY_REGISTRY, MODEL_TABLE,
};

impl Config {
    /// Returns the ScanBrief configuration directory path (~/.scanbrief)
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".scanbrief")
    }

    /// Returns the path to the config file (~/.scanbrief/config.json)
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default path with environment overrides.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load configuration from a specific path with environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// Variables follow `SCANBRIEF_SECTION_KEY`. The conventional provider
    /// variables (`OPENAI_API_KEY`, `GITHUB_TOKEN`, `OPENAI_MODEL`,
    /// `GITHUB_MODEL`, `PORT`) are honored with lower priority.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()))
        };

        // Providers: one set of variables per registered family
        for spec in FAMILY_REGISTRY {
            let prefix = format!("SCANBRIEF_PROVIDERS_{}", spec.family.id().to_uppercase());
            let key_var = format!("{}_API_KEY", prefix);
            let base_var = format!("{}_API_BASE", prefix);
            let limit_var = format!("{}_MAX_INPUT_CHARS", prefix);

            if let Some(val) = first(&[key_var.as_str(), spec.credential_env]) {
                self.provider_mut(spec.family).api_key = Some(SecretString::from(val));
            }
            if let Some(val) = first(&[base_var.as_str()]) {
                self.provider_mut(spec.family).api_base = Some(val);
            }
            if let Some(v) = first(&[limit_var.as_str()]).and_then(|v| v.parse().ok()) {
                self.provider_mut(spec.family).max_input_chars = Some(v);
            }
        }

        // Analysis
        if let Some(val) = first(&["SCANBRIEF_ANALYSIS_DEFAULT_MODEL", "OPENAI_MODEL"]) {
            self.analysis.default_model = val;
        } else if let Some(val) = first(&["GITHUB_MODEL"]) {
            self.analysis.default_model = github_model_key(&val);
        }
        if let Some(v) = first(&["SCANBRIEF_ANALYSIS_TEMPERATURE"]).and_then(|v| v.parse().ok()) {
            self.analysis.temperature = v;
        }
        if let Some(v) = first(&["SCANBRIEF_ANALYSIS_MAX_TOKENS"]).and_then(|v| v.parse().ok()) {
            self.analysis.max_tokens = v;
        }
        if let Some(v) =
            first(&["SCANBRIEF_ANALYSIS_MAX_COMPLETION_TOKENS"]).and_then(|v| v.parse().ok())
        {
            self.analysis.max_completion_tokens = v;
        }
        if let Some(v) = first(&["SCANBRIEF_ANALYSIS_TIMEOUT_SECS"]).and_then(|v| v.parse().ok()) {
            self.analysis.timeout_secs = v;
        }
        if let Some(v) =
            first(&["SCANBRIEF_ANALYSIS_REASONING_TIMEOUT_SECS"]).and_then(|v| v.parse().ok())
        {
            self.analysis.reasoning_timeout_secs = v;
        }

        // Gateway
        if let Some(val) = first(&["SCANBRIEF_GATEWAY_HOST"]) {
            self.gateway.host = val;
        }
        if let Some(v) = first(&["SCANBRIEF_GATEWAY_PORT", "PORT"]).and_then(|v| v.parse().ok()) {
            self.gateway.port = v;
        }

        // Logging
        if let Some(val) = first(&["SCANBRIEF_LOGGING_LEVEL"]) {
            self.logging.level = val;
        }
        if let Some(v) = first(&["SCANBRIEF_LOGGING_FORMAT"])
            .and_then(|v| serde_json::from_value(serde_json::Value::String(v)).ok())
        {
            self.logging.format = v;
        }
    }

    /// Provider section for `family`, if the config has one.
    pub fn provider(&self, family: ProviderFamily) -> Option<&ProviderConfig> {
        self.providers.get(family.id())
    }

    /// Provider section for `family`, created empty when absent.
    pub fn provider_mut(&mut self, family: ProviderFamily) -> &mut ProviderConfig {
        self.providers.entry(family.id().to_string()).or_default()
    }

    /// Configured credential for `family`, if any.
    pub fn credential(&self, family: ProviderFamily) -> Option<&SecretString> {
        self.provider(family).and_then(|p| p.api_key.as_ref())
    }

    /// Serialized-data length limit for `family`.
    pub fn max_input_chars(&self, family: ProviderFamily) -> usize {
        self.provider(family)
            .and_then(|p| p.max_input_chars)
            .unwrap_or(family_spec(family).default_max_input_chars)
    }

    /// Base URLs with config overrides applied.
    pub fn endpoints(&self) -> ProviderEndpoints {
        FAMILY_REGISTRY
            .iter()
            .fold(ProviderEndpoints::default(), |endpoints, spec| {
                match self
                    .provider(spec.family)
                    .and_then(|p| p.api_base.as_deref())
                    .filter(|b| !b.trim().is_empty())
                {
                    Some(base) => endpoints.with_base(spec.family, base),
                    None => endpoints,
                }
            })
    }

    /// Request policy derived from the analysis section.
    pub fn request_policy(&self) -> RequestPolicy {
        RequestPolicy {
            temperature: self.analysis.temperature,
            top_p: self.analysis.top_p,
            max_tokens: self.analysis.max_tokens,
            max_completion_tokens: self.analysis.max_completion_tokens,
            timeout: Duration::from_secs(self.analysis.timeout_secs),
            reasoning_timeout: Duration::from_secs(self.analysis.reasoning_timeout_secs),
        }
    }
}

/// Map the legacy `GITHUB_MODEL` value onto a GitHub-family key.
///
/// The variable names a GitHub Models model, so `gpt-4o-mini` means
/// `github/gpt-4o-mini` and a wire name such as `openai/gpt-4o-mini` means the
/// row that sends it. Values with no GitHub row are kept as given and fail
/// catalog validation like any other unknown key.
fn github_model_key(value: &str) -> String {
    let value = value.trim();
    let prefixed = format!("github/{}", value);
    MODEL_TABLE
        .iter()
        .filter(|m| m.family == ProviderFamily::GitHub)
        .find(|m| m.key == value || m.key == prefixed || m.wire_name == value)
        .map(|m| m.key.to_string())
        .unwrap_or_else(|| value.to_string())
}
