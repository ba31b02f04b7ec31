//! Credential scrubbing for provider-supplied text.
//!
//! Providers sometimes quote the submitted key back in their error bodies.
//! Anything that ends up in an [`crate::error::AnalysisError`] or a log line
//! passes through [`redact`] first.

/// Placeholder substituted for every occurrence of the credential.
pub const REDACTED: &str = "[REDACTED]";

/// Keys shorter than this are not scrubbed; they would match ordinary words.
const MIN_SECRET_LEN: usize = 8;

/// Replace every occurrence of `secret` in `text` with [`REDACTED`].
pub fn redact(text: &str, secret: &str) -> String {
    let secret = secret.trim();
    if secret.len() < MIN_SECRET_LEN {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}
