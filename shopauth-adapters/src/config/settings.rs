use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use crate::config::constants::{RESET_TOKEN_TTL_SECONDS, SESSION_TOKEN_TTL_SECONDS};
use crate::crypto::token_cipher::CIPHER_KEY_LEN;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("{0} must be {CIPHER_KEY_LEN} bytes of hex")]
    InvalidCipherKey(&'static str),
    #[error("{0} must not be empty")]
    MissingSecret(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub postgres: PostgresSettings,
    pub auth: AuthSettings,
    pub email_client: EmailClientSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub session: TokenSettings,
    pub reset: TokenSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    pub signing_secret: Secret<String>,
    /// 32-byte AES key, hex-encoded.
    pub cipher_key: Secret<String>,
    pub ttl_seconds: Option<i64>,
}

impl TokenSettings {
    pub fn ttl_or(&self, default: i64) -> i64 {
        self.ttl_seconds.unwrap_or(default)
    }

    pub fn cipher_key_bytes(&self, field: &'static str) -> Result<Vec<u8>, SettingsError> {
        let bytes = hex::decode(self.cipher_key.expose_secret())
            .map_err(|_| SettingsError::InvalidCipherKey(field))?;
        if bytes.len() != CIPHER_KEY_LEN {
            return Err(SettingsError::InvalidCipherKey(field));
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_millis: u64,
}

impl Settings {
    /// Load configuration from the optional JSON file and environment
    /// overrides, then validate key material.
    ///
    /// Validation failures here abort process boot - a bad cipher key
    /// must never surface as a per-request error.
    pub fn load() -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/shopauth").required(false))
            .add_source(config::Environment::with_prefix("SHOPAUTH").separator("__"))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()
    }

    fn validate(self) -> Result<Self, SettingsError> {
        self.auth
            .session
            .cipher_key_bytes("auth.session.cipher_key")?;
        self.auth.reset.cipher_key_bytes("auth.reset.cipher_key")?;

        if self.auth.session.signing_secret.expose_secret().is_empty() {
            return Err(SettingsError::MissingSecret("auth.session.signing_secret"));
        }
        if self.auth.reset.signing_secret.expose_secret().is_empty() {
            return Err(SettingsError::MissingSecret("auth.reset.signing_secret"));
        }

        Ok(self)
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        self.auth.session.ttl_or(SESSION_TOKEN_TTL_SECONDS)
    }

    pub fn reset_ttl_seconds(&self) -> i64 {
        self.auth.reset.ttl_or(RESET_TOKEN_TTL_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_settings(cipher_key: &str, signing_secret: &str) -> TokenSettings {
        TokenSettings {
            signing_secret: Secret::from(signing_secret.to_string()),
            cipher_key: Secret::from(cipher_key.to_string()),
            ttl_seconds: None,
        }
    }

    fn settings(session: TokenSettings, reset: TokenSettings) -> Settings {
        Settings {
            application: ApplicationSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            postgres: PostgresSettings {
                url: Secret::from("postgres://localhost/shopauth".to_string()),
            },
            auth: AuthSettings { session, reset },
            email_client: EmailClientSettings {
                base_url: "https://api.postmarkapp.com/".to_string(),
                sender: "no-reply@shop.example".to_string(),
                auth_token: Secret::from("token".to_string()),
                timeout_millis: 200,
            },
        }
    }

    const GOOD_KEY: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn test_valid_settings_pass() {
        let settings = settings(
            token_settings(GOOD_KEY, "session secret"),
            token_settings(GOOD_KEY, "reset secret"),
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_short_cipher_key_fails() {
        let settings = settings(
            token_settings("0102", "session secret"),
            token_settings(GOOD_KEY, "reset secret"),
        );
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidCipherKey("auth.session.cipher_key"))
        ));
    }

    #[test]
    fn test_non_hex_cipher_key_fails() {
        let settings = settings(
            token_settings(GOOD_KEY, "session secret"),
            token_settings("zz-not-hex", "reset secret"),
        );
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidCipherKey("auth.reset.cipher_key"))
        ));
    }

    #[test]
    fn test_empty_signing_secret_fails() {
        let settings = settings(
            token_settings(GOOD_KEY, ""),
            token_settings(GOOD_KEY, "reset secret"),
        );
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MissingSecret("auth.session.signing_secret"))
        ));
    }

    #[test]
    fn test_ttl_defaults_apply() {
        let settings = settings(
            token_settings(GOOD_KEY, "session secret"),
            token_settings(GOOD_KEY, "reset secret"),
        );
        assert_eq!(settings.session_ttl_seconds(), SESSION_TOKEN_TTL_SECONDS);
        assert_eq!(settings.reset_ttl_seconds(), RESET_TOKEN_TTL_SECONDS);
    }
}
