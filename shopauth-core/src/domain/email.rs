use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,
    #[error("Invalid email address")]
    Invalid,
}

/// A validated, lowercase-normalized email address.
///
/// Normalization happens at construction so that lookups and uniqueness
/// checks never depend on the casing the client happened to send.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = EmailError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let normalized = value.expose_secret().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }
        if !EMAIL_REGEX.is_match(&normalized) {
            return Err(EmailError::Invalid);
        }

        Ok(Self(Secret::from(normalized)))
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
