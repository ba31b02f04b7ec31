//! Request normalization.
//!
//! Turns a built prompt and a resolved model into a provider call payload.
//! Message framing, sampling parameters, token budget and deadline all follow
//! from the model's capability flags and the configured [`RequestPolicy`].

use std::time::Duration;

use crate::analysis::prompt::BuiltPrompt;

use super::catalog::family_spec;
use super::types::{
    ChatMessage, LogicalModel, ProviderCallPayload, SamplingParams, TokenLimit, TokenLimitKind,
};

/// Policy constants applied to every payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestPolicy {
    /// Sampling temperature (low for reproducible findings)
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Output budget for `max_tokens` models
    pub max_tokens: u32,
    /// Reasoning plus output budget for `max_completion_tokens` models
    pub max_completion_tokens: u32,
    /// Deadline for standard models
    pub timeout: Duration,
    /// Deadline for completion-constrained (reasoning) models
    pub reasoning_timeout: Duration,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 1.0,
            max_tokens: 4000,
            max_completion_tokens: 16000,
            timeout: Duration::from_secs(120),
            reasoning_timeout: Duration::from_secs(300),
        }
    }
}

/// Build the call payload for `model`. Pure; performs no I/O.
pub fn normalize(
    prompt: &BuiltPrompt,
    model: &LogicalModel,
    policy: &RequestPolicy,
) -> ProviderCallPayload {
    let caps = model.capabilities;

    let messages = if caps.uses_system_role {
        vec![
            ChatMessage::system(family_spec(model.family).system_instruction),
            ChatMessage::user(&prompt.text),
        ]
    } else {
        vec![ChatMessage::user(&prompt.text)]
    };

    let (token_value, timeout) = match caps.token_limit_kind {
        TokenLimitKind::Standard => (policy.max_tokens, policy.timeout),
        TokenLimitKind::CompletionConstrained => {
            (policy.max_completion_tokens, policy.reasoning_timeout)
        }
    };

    let sampling = caps.supports_sampling_params.then_some(SamplingParams {
        temperature: policy.temperature,
        top_p: policy.top_p,
    });

    ProviderCallPayload {
        family: model.family,
        model_wire_name: model.wire_name.to_string(),
        messages,
        sampling,
        token_limit: TokenLimit {
            kind: caps.token_limit_kind,
            value: token_value,
        },
        timeout,
    }
}
