//! Secret redaction for every piece of text that leaves the process.
//!
//! A single [`Redactor`] is built from the configured token and shared by the
//! process runner, the logger and the console output manager.

use std::borrow::Cow;
use std::sync::Arc;

/// Placeholder substituted for the secret
pub const PLACEHOLDER: &str = "xxGH_TOKENxx";

/// Replaces every occurrence of a configured secret with [`PLACEHOLDER`]
#[derive(Clone, Default)]
pub struct Redactor {
    secret: Option<Arc<str>>,
}

impl Redactor {
    /// Create a redactor for an optional secret. An empty secret is treated as absent.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }

    /// Redactor that never rewrites anything
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether a secret is configured
    pub fn is_active(&self) -> bool {
        self.secret.is_some()
    }

    /// Return `text` with every occurrence of the secret replaced
    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.secret.as_deref() {
            Some(secret) if text.contains(secret) => Cow::Owned(text.replace(secret, PLACEHOLDER)),
            _ => Cow::Borrowed(text),
        }
    }

    /// Redact raw process output
    pub fn redact_bytes(&self, bytes: &[u8]) -> String {
        self.redact(&String::from_utf8_lossy(bytes)).into_owned()
    }
}

// The secret itself must not show up in debug output either.
impl std::fmt::Debug for Redactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redactor")
            .field("active", &self.is_active())
            .finish()
    }
}
