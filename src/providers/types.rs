//! Provider types for ScanBrief
//!
//! This module defines the capability vocabulary shared by the catalog, the
//! request normalizer and the invoker, plus the `ProviderInvoker` trait that
//! performs the single outbound call.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;

use crate::error::AnalysisError;

/// Provider endpoint families reachable by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    /// OpenAI Chat Completions
    OpenAi,
    /// GitHub Models inference endpoint (OpenAI-compatible)
    GitHub,
}

impl ProviderFamily {
    /// Config key / provider id.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderFamily::OpenAi => "openai",
            ProviderFamily::GitHub => "github",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which token-budget field a model family accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenLimitKind {
    /// `max_tokens`: visible output only
    Standard,
    /// `max_completion_tokens`: hidden reasoning plus visible output
    CompletionConstrained,
}

impl TokenLimitKind {
    /// JSON field name carrying the budget on the wire.
    pub fn field_name(&self) -> &'static str {
        match self {
            TokenLimitKind::Standard => "max_tokens",
            TokenLimitKind::CompletionConstrained => "max_completion_tokens",
        }
    }
}

/// Flags that fully determine the payload shape for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub uses_system_role: bool,
    pub token_limit_kind: TokenLimitKind,
    pub supports_sampling_params: bool,
}

impl Capabilities {
    /// Chat models: system message, `max_tokens`, temperature/top_p.
    pub const CHAT: Capabilities = Capabilities {
        uses_system_role: true,
        token_limit_kind: TokenLimitKind::Standard,
        supports_sampling_params: true,
    };

    /// Reasoning models: user message only, `max_completion_tokens`, no sampling.
    pub const REASONING: Capabilities = Capabilities {
        uses_system_role: false,
        token_limit_kind: TokenLimitKind::CompletionConstrained,
        supports_sampling_params: false,
    };
}

/// A model choice exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogicalModel {
    /// Caller-facing key
    pub key: &'static str,
    /// Name sent to the provider
    pub wire_name: &'static str,
    /// Endpoint family serving this model
    pub family: ProviderFamily,
    pub capabilities: Capabilities,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: Role::System,
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }
}

/// Sampling parameters, present only for models that accept them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
}

/// Token budget and the field it travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimit {
    pub kind: TokenLimitKind,
    pub value: u32,
}

/// Everything the invoker needs for one outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCallPayload {
    pub family: ProviderFamily,
    pub model_wire_name: String,
    pub messages: Vec<ChatMessage>,
    pub sampling: Option<SamplingParams>,
    pub token_limit: TokenLimit,
    /// Wall-clock budget for the whole exchange
    pub timeout: Duration,
}

/// Performs exactly one outbound chat-completion call.
///
/// Implementations never retry; every failure comes back classified.
#[async_trait]
pub trait ProviderInvoker: Send + Sync {
    /// Send `payload` authenticated with `credential` and return the generated text.
    async fn invoke(
        &self,
        payload: &ProviderCallPayload,
        credential: &SecretString,
    ) -> std::result::Result<String, AnalysisError>;
}
