//! Canonical user-facing messages for each [`ErrorKind`].
//!
//! One template per kind; the context only fills in names and the provider's
//! own wording. The same failure therefore always reads the same to the
//! caller.

use crate::error::ErrorKind;

/// Values a message template may reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext<'a> {
    /// Logical key the caller asked for (or the substituted default)
    pub model_key: Option<&'a str>,
    /// Name sent to the provider
    pub wire_name: Option<&'a str>,
    /// Provider display name, e.g. "OpenAI"
    pub provider: Option<&'a str>,
    /// Environment variable holding the provider credential
    pub credential_env: Option<&'a str>,
    /// Keys present in the capability table
    pub known_models: &'a [&'a str],
    /// HTTP status reported by the provider
    pub provider_status: Option<u16>,
    /// Provider's own error message, already redacted
    pub provider_message: Option<&'a str>,
}

/// Render the canonical message for `kind`.
pub fn translate(kind: ErrorKind, ctx: &ErrorContext<'_>) -> String {
    let provider = ctx.provider.unwrap_or("provider");
    let model = ctx.wire_name.or(ctx.model_key).unwrap_or("unknown");

    match kind {
        ErrorKind::UnsupportedModel => format!(
            "Unsupported model: {}. Available models: {}",
            ctx.model_key.unwrap_or("unknown"),
            ctx.known_models.join(", ")
        ),
        ErrorKind::TemplateError => {
            "Analysis template is missing its {data} placeholder.".to_string()
        }
        ErrorKind::MissingCredential => format!(
            "{} API credential is not configured. Please set {} in your environment.",
            provider,
            ctx.credential_env.unwrap_or("the provider API key")
        ),
        ErrorKind::Unauthorized => format!(
            "Invalid {} API credential. Please check your {} and ensure it has not expired.",
            provider,
            ctx.credential_env.unwrap_or("API key")
        ),
        ErrorKind::Forbidden => {
            let message = ctx.provider_message.unwrap_or("no details provided");
            let mut text = format!(
                "Access denied: {}. Please ensure your {} credential has the required permissions.",
                message, provider
            );
            if mentions_token_policy(message) {
                text.push_str(
                    " Fine-grained tokens need access to the models API and an organization                      that allows them; a classic token avoids both restrictions.",
                );
            }
            text
        }
        ErrorKind::RateLimited => match ctx.provider_message {
            Some(message) if mentions_quota(message) => format!(
                "{} API quota exceeded: {}. Please check your account billing.",
                provider, message
            ),
            Some(message) => format!(
                "Rate limit exceeded: {}. Please try again later.",
                message
            ),
            None => "Rate limit exceeded. Please try again later.".to_string(),
        },
        ErrorKind::ModelNotFound => format!(
            "Model \"{}\" not found. Please check the model name.",
            model
        ),
        ErrorKind::MalformedResponse => format!("Invalid response format from {} API.", provider),
        ErrorKind::Timeout => "Request timeout. The analysis is taking too long to complete. \
             Please try with a smaller dataset or try again later."
            .to_string(),
        ErrorKind::ProviderError => format!(
            "{} API error ({}): {}",
            provider,
            ctx.provider_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown status".to_string()),
            ctx.provider_message.unwrap_or("Unknown error")
        ),
        ErrorKind::NetworkError => format!(
            "Network error: {}",
            ctx.provider_message.unwrap_or("connection failed")
        ),
    }
}

/// Billing exhaustion is reported as a 429 but retrying will not help.
fn mentions_quota(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("quota") || lower.contains("billing")
}

/// Token-type restrictions surfaced as a 403.
fn mentions_token_policy(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("fine-grained") || lower.contains("organization")
}
