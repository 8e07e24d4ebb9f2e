//! Operator credential.

use secrecy::{ExposeSecret, SecretString};

/// An opaque bearer token that grants write access to the gist.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wrap a raw token. Surrounding whitespace is dropped.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self(SecretString::from(token.trim().to_owned()))
    }

    /// Whether the token is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// The raw token, for the `Authorization` header and session storage.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

impl From<SecretString> for Credential {
    fn from(secret: SecretString) -> Self {
        Self::new(secret.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = Credential::new("ghp_supersecrettoken");
        let debug_output = format!("{credential:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ghp_supersecrettoken"));
    }

    #[test]
    fn test_credential_trims_whitespace() {
        let credential = Credential::new("  ghp_abc\n");
        assert_eq!(credential.expose(), "ghp_abc");
        assert!(Credential::new(" \n").is_blank());
    }
}
