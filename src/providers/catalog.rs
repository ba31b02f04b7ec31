//! Model capability table and resolution.
//!
//! This module centralizes provider family metadata and the mapping from a
//! caller-facing model key to the wire name and capability flags that shape
//! the request. Adding a model is one row in [`MODEL_TABLE`]; nothing else
//! branches on model identity.

use crate::analysis::prompt::{ASSESSMENT_TEMPLATE, SUMMARY_TEMPLATE};
use crate::analysis::translate::ErrorContext;
use crate::error::{AnalysisError, ErrorKind, Result, ScanbriefError};

use super::types::{Capabilities, LogicalModel, ProviderFamily};

/// Metadata describing a provider endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilySpec {
    pub family: ProviderFamily,
    /// Human-readable name used in messages
    pub display_name: &'static str,
    /// Base URL used when config does not override it
    pub default_api_base: &'static str,
    /// Path appended to the base URL
    pub chat_path: &'static str,
    /// Environment variable conventionally holding the credential
    pub credential_env: &'static str,
    /// Serialized data beyond this many characters is truncated
    pub default_max_input_chars: usize,
    /// Analysis template with one `{data}` placeholder
    pub template: &'static str,
    /// Instruction sent as the system-role message
    pub system_instruction: &'static str,
}

const OPENAI_FAMILY: FamilySpec = FamilySpec {
    family: ProviderFamily::OpenAi,
    display_name: "OpenAI",
    default_api_base: "https://api.openai.com/v1",
    chat_path: "/chat/completions",
    credential_env: "OPENAI_API_KEY",
    default_max_input_chars: 200_000,
    template: ASSESSMENT_TEMPLATE,
    system_instruction: "You are an expert cybersecurity analyst specializing in Censys host \
        data analysis. Provide detailed, evidence-based security insights with specific \
        examples from the data.",
};

const GITHUB_FAMILY: FamilySpec = FamilySpec {
    family: ProviderFamily::GitHub,
    display_name: "GitHub Models",
    default_api_base: "https://models.github.ai/inference",
    chat_path: "/chat/completions",
    credential_env: "GITHUB_TOKEN",
    default_max_input_chars: 20_000,
    template: SUMMARY_TEMPLATE,
    system_instruction:
        "You are an expert cybersecurity analyst specializing in Censys host data analysis.",
};

/// Provider families, one row each.
pub const FAMILY_REGISTRY: &[FamilySpec] = &[OPENAI_FAMILY, GITHUB_FAMILY];

const fn openai(key: &'static str, capabilities: Capabilities) -> LogicalModel {
    LogicalModel {
        key,
        wire_name: key,
        family: ProviderFamily::OpenAi,
        capabilities,
    }
}

const fn github(
    key: &'static str,
    wire_name: &'static str,
    capabilities: Capabilities,
) -> LogicalModel {
    LogicalModel {
        key,
        wire_name,
        family: ProviderFamily::GitHub,
        capabilities,
    }
}

/// Every model callers may request.
pub const MODEL_TABLE: &[LogicalModel] = &[
    // OpenAI chat models
    openai("gpt-4o", Capabilities::CHAT),
    openai("gpt-4o-mini", Capabilities::CHAT),
    openai("gpt-4-turbo", Capabilities::CHAT),
    openai("gpt-4", Capabilities::CHAT),
    openai("gpt-3.5-turbo", Capabilities::CHAT),
    // OpenAI reasoning models
    openai("o1-preview", Capabilities::REASONING),
    openai("o1-mini", Capabilities::REASONING),
    openai("gpt-5", Capabilities::REASONING),
    openai("gpt-5-mini", Capabilities::REASONING),
    openai("gpt-5-nano", Capabilities::REASONING),
    // GitHub Models: OpenAI re-hosted
    github("github/gpt-4o", "openai/gpt-4o", Capabilities::CHAT),
    github("github/gpt-4o-mini", "openai/gpt-4o-mini", Capabilities::CHAT),
    github("github/gpt-3.5-turbo", "openai/gpt-3.5-turbo", Capabilities::CHAT),
    github("github/o1-mini", "openai/o1-mini", Capabilities::REASONING),
    // GitHub Models: Meta Llama
    github(
        "Meta-Llama-3.1-8B-Instruct",
        "meta/llama-3.1-8b-instruct",
        Capabilities::CHAT,
    ),
    github(
        "Meta-Llama-3.1-70B-Instruct",
        "meta/llama-3.1-70b-instruct",
        Capabilities::CHAT,
    ),
    github(
        "Llama-3.2-11B-Vision-Instruct",
        "meta/llama-3.2-11b-vision-instruct",
        Capabilities::CHAT,
    ),
    // GitHub Models: Mistral
    github(
        "Mistral-Large-2407",
        "mistral/mistral-large-2407",
        Capabilities::CHAT,
    ),
    github(
        "Mistral-Nemo-Instruct-2407",
        "mistral/mistral-nemo-instruct-2407",
        Capabilities::CHAT,
    ),
    github("Ministral-3B", "mistral/ministral-3b", Capabilities::CHAT),
    // GitHub Models: Cohere
    github(
        "Cohere-command-r-plus",
        "cohere/command-r-plus",
        Capabilities::CHAT,
    ),
    github("Cohere-command-r", "cohere/command-r", Capabilities::CHAT),
];

/// Default logical key when neither config nor caller picks one.
pub const DEFAULT_MODEL_KEY: &str = "gpt-4o";

/// Look up the metadata row for `family`.
pub fn family_spec(family: ProviderFamily) -> &'static FamilySpec {
    match family {
        ProviderFamily::OpenAi => &OPENAI_FAMILY,
        ProviderFamily::GitHub => &GITHUB_FAMILY,
    }
}

/// Read-only model table plus the default key, built once at startup.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: &'static [LogicalModel],
    default_key: String,
}

impl ModelCatalog {
    /// Catalog over [`MODEL_TABLE`] with `default_key` substituted for absent keys.
    pub fn new(default_key: &str) -> Result<Self> {
        Self::with_models(MODEL_TABLE, default_key)
    }

    /// Catalog over an explicit table.
    ///
    /// Fails on duplicate keys, empty wire names, or a default key the table
    /// does not contain.
    pub fn with_models(models: &'static [LogicalModel], default_key: &str) -> Result<Self> {
        for (i, model) in models.iter().enumerate() {
            if model.wire_name.trim().is_empty() {
                return Err(ScanbriefError::Config(format!(
                    "model '{}' has an empty wire name",
                    model.key
                )));
            }
            if models[..i].iter().any(|other| other.key == model.key) {
                return Err(ScanbriefError::Config(format!(
                    "duplicate model key '{}'",
                    model.key
                )));
            }
        }

        if !models.iter().any(|m| m.key == default_key) {
            return Err(ScanbriefError::Config(format!(
                "default model '{}' is not a known model key",
                default_key
            )));
        }

        Ok(Self {
            models,
            default_key: default_key.to_string(),
        })
    }

    /// Resolve a caller-supplied key.
    ///
    /// `None` or a blank key resolves to the default. Any other unknown key
    /// fails with `UnsupportedModel`; there is no fallback.
    pub fn resolve(&self, key: Option<&str>) -> std::result::Result<&LogicalModel, AnalysisError> {
        let key = match key.map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => self.default_key.as_str(),
        };

        self.models.iter().find(|m| m.key == key).ok_or_else(|| {
            let known = self.keys();
            AnalysisError::new(
                ErrorKind::UnsupportedModel,
                &ErrorContext {
                    model_key: Some(key),
                    known_models: &known,
                    ..Default::default()
                },
            )
        })
    }

    /// All model keys in table order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.key).collect()
    }

    pub fn models(&self) -> &'static [LogicalModel] {
        self.models
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }
}
