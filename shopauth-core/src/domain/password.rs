use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum PasswordError {
    #[error("Password cannot be empty")]
    Empty,
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    TooShort,
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("Password must contain at least one digit")]
    MissingDigit,
    #[error("Password must contain at least one symbol")]
    MissingSymbol,
}

/// A plaintext password that has passed the strength policy.
///
/// Only registration and password reset construct this type; login
/// verifies raw candidates so that a wrong guess is never rejected for
/// being weak before it reaches the hash comparison.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let password = value.expose_secret();

        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(PasswordError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(PasswordError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordError::MissingDigit);
        }
        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(PasswordError::MissingSymbol);
        }

        Ok(Self(value))
    }
}

/// An adaptive one-way hash of a password, in PHC string format.
#[derive(Debug, Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    pub fn new(phc_string: Secret<String>) -> Self {
        Self(phc_string)
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn parse(input: &str) -> Result<Password, PasswordError> {
        Password::try_from(Secret::from(input.to_string()))
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(parse("Abcdef1!").is_ok());
        assert!(parse("correct-Horse-7-battery").is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(parse("").unwrap_err(), PasswordError::Empty);
    }

    #[test]
    fn test_too_short_rejected() {
        assert_eq!(parse("Ab1!").unwrap_err(), PasswordError::TooShort);
    }

    #[test]
    fn test_missing_character_classes_rejected() {
        assert_eq!(parse("abcdef1!").unwrap_err(), PasswordError::MissingUppercase);
        assert_eq!(parse("ABCDEF1!").unwrap_err(), PasswordError::MissingLowercase);
        assert_eq!(parse("Abcdefg!").unwrap_err(), PasswordError::MissingDigit);
        assert_eq!(parse("Abcdefg1").unwrap_err(), PasswordError::MissingSymbol);
    }

    #[quickcheck]
    fn prop_digitless_passwords_rejected(suffix: String) -> bool {
        let candidate: String = suffix.chars().filter(|c| !c.is_ascii_digit()).collect();
        parse(&candidate).is_err()
    }

    #[quickcheck]
    fn prop_suffix_never_weakens_a_strong_password(suffix: String) -> bool {
        let candidate = format!("Abcdef1!{suffix}");
        parse(&candidate).is_ok()
    }
}
