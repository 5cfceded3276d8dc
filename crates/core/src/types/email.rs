//! Login email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a login email was refused before any request was made.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    #[error("enter an email address")]
    Empty,
    #[error("address is longer than {max} characters")]
    TooLong { max: usize },
    #[error("address needs a single @ between a name and a domain")]
    Malformed,
    #[error("address contains a space")]
    Whitespace,
}

/// An email address as typed into the login form.
///
/// Surrounding whitespace is trimmed; the address is otherwise kept as
/// entered since the shop API owns matching rules.
///
/// ```
/// use meteor_shop_core::Email;
///
/// assert_eq!(Email::parse("  buyer@example.com\n").unwrap().as_str(), "buyer@example.com");
/// assert!(Email::parse("a@b@c").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate login form input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] naming the first problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();

        match trimmed.len() {
            0 => return Err(EmailError::Empty),
            n if n > Self::MAX_LENGTH => {
                return Err(EmailError::TooLong {
                    max: Self::MAX_LENGTH,
                });
            }
            _ => {}
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        match trimmed.split_once('@') {
            Some((name, domain)) if !name.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_login_addresses() {
        assert!(Email::parse("user+tag@example.co.th").is_ok());
        assert!(Email::parse("a@b").is_ok());
        assert_eq!(
            Email::parse("  user@example.com \t").unwrap().as_str(),
            "user@example.com"
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("a b@c"), Err(EmailError::Whitespace));
        for bad in ["no-at", "a@b@c", "@shop.th", "user@"] {
            assert_eq!(Email::parse(bad), Err(EmailError::Malformed), "{bad}");
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong { max: 254 }));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email: Email = "user@example.com".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"user@example.com\""
        );
    }
}
