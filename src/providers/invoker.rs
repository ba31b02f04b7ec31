//! Chat-completion invoker
//!
//! This module implements the `ProviderInvoker` trait over HTTP for every
//! provider family. Both families speak the Chat Completions wire format, so
//! one invoker serves them; only the endpoint URL differs.
//!
//! # Example
//!
//! ```rust,ignore
//! use scanbrief::providers::{HttpInvoker, ProviderEndpoints, ProviderInvoker};
//!
//! async fn example(payload: scanbrief::providers::ProviderCallPayload) {
//!     let invoker = HttpInvoker::new(ProviderEndpoints::default()).unwrap();
//!     let credential = secrecy::SecretString::from("sk-xxx".to_string());
//!     let text = invoker.invoke(&payload, &credential).await.unwrap();
//!     println!("{}", text);
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::translate::ErrorContext;
use crate::error::{AnalysisError, ErrorKind, Result};
use crate::utils::redact::redact;

use super::catalog::{family_spec, FAMILY_REGISTRY};
use super::types::{ChatMessage, ProviderCallPayload, ProviderFamily, ProviderInvoker, TokenLimitKind};
use super::classify_status;

/// Connection establishment budget, separate from the per-call deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest slice of an unexpected response body written to the debug log.
const LOGGED_BODY_CHARS: usize = 512;

// ============================================================================
// Wire Request Types
// ============================================================================

/// Chat Completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

impl<'a> From<&'a ProviderCallPayload> for ChatCompletionRequest<'a> {
    fn from(payload: &'a ProviderCallPayload) -> Self {
        let limit = payload.token_limit;
        let (max_tokens, max_completion_tokens) = match limit.kind {
            TokenLimitKind::Standard => (Some(limit.value), None),
            TokenLimitKind::CompletionConstrained => (None, Some(limit.value)),
        };

        Self {
            model: &payload.model_wire_name,
            messages: &payload.messages,
            max_tokens,
            max_completion_tokens,
            temperature: payload.sampling.map(|s| s.temperature),
            top_p: payload.sampling.map(|s| s.top_p),
        }
    }
}

// ============================================================================
// Wire Response Types
// ============================================================================

/// Chat Completions response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Provider error envelope: `{"error": {"message": ..., "type": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pull the generated text out of a 2xx body.
///
/// Exactly one choice with non-blank content is required.
fn extract_text(body: &str) -> Option<String> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).ok()?;
    let [choice] = parsed.choices.as_slice() else {
        return None;
    };
    let content = choice.message.as_ref()?.content.as_ref()?;
    if content.trim().is_empty() {
        None
    } else {
        Some(content.clone())
    }
}

/// Provider's own error wording, falling back to the raw body.
fn extract_provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error.message)
        .unwrap_or_else(|| body.trim().to_string())
}

/// First [`LOGGED_BODY_CHARS`] characters of `body`, marked when cut.
fn log_excerpt(body: &str) -> String {
    match body.char_indices().nth(LOGGED_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Base URLs per provider family, seeded from [`FAMILY_REGISTRY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    bases: HashMap<ProviderFamily, String>,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            bases: FAMILY_REGISTRY
                .iter()
                .map(|spec| (spec.family, spec.default_api_base.to_string()))
                .collect(),
        }
    }
}

impl ProviderEndpoints {
    /// Replace the base URL for `family`.
    pub fn with_base(mut self, family: ProviderFamily, base: impl Into<String>) -> Self {
        self.bases.insert(family, base.into());
        self
    }

    /// Base URL for `family`.
    pub fn base(&self, family: ProviderFamily) -> &str {
        self.bases
            .get(&family)
            .map(String::as_str)
            .unwrap_or(family_spec(family).default_api_base)
    }

    /// Full chat-completions URL for `family`.
    pub fn chat_url(&self, family: ProviderFamily) -> String {
        format!(
            "{}{}",
            self.base(family).trim_end_matches('/'),
            family_spec(family).chat_path
        )
    }
}

// ============================================================================
// HTTP Invoker
// ============================================================================

/// HTTP implementation of [`ProviderInvoker`].
pub struct HttpInvoker {
    endpoints: ProviderEndpoints,
    client: Client,
}

impl HttpInvoker {
    /// Create an invoker with its own HTTP client.
    pub fn new(endpoints: ProviderEndpoints) -> Result<Self> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self::with_client(endpoints, client))
    }

    /// Create an invoker around an existing client.
    pub fn with_client(endpoints: ProviderEndpoints, client: Client) -> Self {
        Self { endpoints, client }
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }
}

#[async_trait]
impl ProviderInvoker for HttpInvoker {
    async fn invoke(
        &self,
        payload: &ProviderCallPayload,
        credential: &SecretString,
    ) -> std::result::Result<String, AnalysisError> {
        let spec = family_spec(payload.family);
        let url = self.endpoints.chat_url(payload.family);
        let request = ChatCompletionRequest::from(payload);
        let ctx = ErrorContext {
            wire_name: Some(&payload.model_wire_name),
            provider: Some(spec.display_name),
            credential_env: Some(spec.credential_env),
            ..Default::default()
        };

        debug!(
            provider = %payload.family,
            model = %payload.model_wire_name,
            token_field = payload.token_limit.kind.field_name(),
            timeout_secs = payload.timeout.as_secs(),
            "Sending chat completion request"
        );

        let exchange = async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(credential.expose_secret())
                .json(&request)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<(StatusCode, String), reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(payload.timeout, exchange).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) if e.is_timeout() => {
                warn!(provider = %payload.family, "Provider request timed out");
                return Err(AnalysisError::new(ErrorKind::Timeout, &ctx));
            }
            Ok(Err(e)) => {
                let message = redact(&e.to_string(), credential.expose_secret());
                warn!(provider = %payload.family, error = %message, "Provider request failed");
                return Err(AnalysisError::new(
                    ErrorKind::NetworkError,
                    &ErrorContext {
                        provider_message: Some(&message),
                        ..ctx
                    },
                ));
            }
            Err(_) => {
                warn!(
                    provider = %payload.family,
                    timeout_secs = payload.timeout.as_secs(),
                    "Provider request exceeded deadline"
                );
                return Err(AnalysisError::new(ErrorKind::Timeout, &ctx));
            }
        };

        if !status.is_success() {
            let message = redact(&extract_provider_message(&body), credential.expose_secret());
            let kind = classify_status(status.as_u16());
            warn!(
                provider = %payload.family,
                status = status.as_u16(),
                kind = %kind,
                detail = %message,
                "Provider returned an error"
            );
            return Err(AnalysisError::new(
                kind,
                &ErrorContext {
                    provider_status: Some(status.as_u16()),
                    provider_message: Some(&message),
                    ..ctx
                },
            ));
        }

        match extract_text(&body) {
            Some(text) => {
                info!(provider = %payload.family, chars = text.len(), "Provider response received");
                Ok(text)
            }
            None => {
                warn!(provider = %payload.family, "Unexpected provider response shape");
                debug!(
                    provider = %payload.family,
                    body_len = body.len(),
                    body = %log_excerpt(&redact(&body, credential.expose_secret())),
                    "Unexpected provider response body"
                );
                Err(AnalysisError::new(
                    ErrorKind::MalformedResponse,
                    &ErrorContext {
                        provider_status: Some(status.as_u16()),
                        ..ctx
                    },
                ))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
