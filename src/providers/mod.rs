//! Providers module - model catalog, request shaping and the outbound call
//!
//! The catalog maps a caller-facing key to a [`LogicalModel`]; the normalizer
//! turns a prompt plus that model into a [`ProviderCallPayload`]; an
//! implementation of [`ProviderInvoker`] sends it.
//!
//! # Example
//!
//! ```rust,ignore
//! use scanbrief::providers::{normalize, ModelCatalog, RequestPolicy};
//!
//! let catalog = ModelCatalog::new("gpt-4o")?;
//! let model = catalog.resolve(Some("o1-mini"))?;
//! let payload = normalize(&prompt, model, &RequestPolicy::default());
//! assert_eq!(payload.messages.len(), 1);
//! ```

pub mod catalog;
pub mod invoker;
pub mod normalize;
mod types;

use crate::error::ErrorKind;

pub use catalog::{
    family_spec, FamilySpec, ModelCatalog, DEFAULT_MODEL_KEY, FAMILY_REGISTRY, MODEL_TABLE,
};
pub use invoker::{HttpInvoker, ProviderEndpoints};
pub use normalize::{normalize, RequestPolicy};
pub use types::{
    Capabilities, ChatMessage, LogicalModel, ProviderCallPayload, ProviderFamily,
    ProviderInvoker, Role, SamplingParams, TokenLimit, TokenLimitKind,
};

/// Map a provider HTTP status to an [`ErrorKind`].
///
/// This centralizes the mapping so every family reports failures the same way.
pub fn classify_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::ModelNotFound,
        429 => ErrorKind::RateLimited,
        _ => ErrorKind::ProviderError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_401() {
        assert_eq!(classify_status(401), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_classify_status_403() {
        assert_eq!(classify_status(403), ErrorKind::Forbidden);
    }

    #[test]
    fn test_classify_status_404() {
        assert_eq!(classify_status(404), ErrorKind::ModelNotFound);
    }

    #[test]
    fn test_classify_status_429() {
        assert_eq!(classify_status(429), ErrorKind::RateLimited);
    }

    #[test]
    fn test_classify_status_catch_all() {
        for status in [400, 402, 418, 500, 502, 503] {
            assert_eq!(classify_status(status), ErrorKind::ProviderError);
        }
    }
}
