//! Bearer token issued by the shop API at login.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Bearer token sent with every authenticated request.
///
/// Wraps a [`SecretString`] so the value never appears in `Debug` output or
/// logs. It still serializes, because the credential store has to persist it.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Reveal the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl Serialize for AuthToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for AuthToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let token = AuthToken::new("eyJhbGciOi.secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_serde_keeps_raw_value() {
        let token = AuthToken::new("abc123");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"abc123\"");

        let back: AuthToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back.expose(), "abc123");
    }
}
