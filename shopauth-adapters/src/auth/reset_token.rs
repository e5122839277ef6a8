use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use shopauth_core::{ResetClaims, ResetTokenError, ResetTokenService, Role};
use uuid::Uuid;

use crate::crypto::token_cipher::{Envelope, TokenCipher, TokenCipherError};

#[derive(Debug, Deserialize)]
struct RawResetClaims {
    id: Option<Uuid>,
    role: Option<Role>,
    iat: Option<i64>,
    exp: i64,
}

/// The reset-token pipeline: same envelope construction as session
/// tokens, but keyed and signed separately and much shorter-lived.
///
/// Verification failures are deliberately flattened - the reset surface
/// never tells a caller whether a token was tampered with or merely
/// expired.
#[derive(Clone)]
pub struct ResetTokenManager {
    signing_secret: Secret<String>,
    cipher: TokenCipher,
    ttl_seconds: i64,
}

impl ResetTokenManager {
    pub fn new(
        signing_secret: Secret<String>,
        cipher_key: &[u8],
        ttl_seconds: i64,
    ) -> Result<Self, TokenCipherError> {
        Ok(Self {
            signing_secret,
            cipher: TokenCipher::new(cipher_key)?,
            ttl_seconds,
        })
    }

    fn secret_bytes(&self) -> &[u8] {
        self.signing_secret.expose_secret().as_bytes()
    }
}

impl ResetTokenService for ResetTokenManager {
    fn issue(&self, account_id: Uuid, role: Role) -> Result<String, ResetTokenError> {
        let iat = Utc::now().timestamp();
        let claims = ResetClaims {
            id: account_id,
            role,
            iat,
            exp: iat + self.ttl_seconds,
        };

        let signed = encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_bytes()),
        )
        .map_err(|e| ResetTokenError::UnexpectedError(e.to_string()))?;

        let envelope = self
            .cipher
            .encrypt(&signed)
            .map_err(|e| ResetTokenError::UnexpectedError(e.to_string()))?;
        let json = serde_json::to_string(&envelope)
            .map_err(|e| ResetTokenError::UnexpectedError(e.to_string()))?;

        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn verify(&self, token: &str) -> Result<ResetClaims, ResetTokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| ResetTokenError::InvalidOrExpired)?;
        let envelope: Envelope =
            serde_json::from_slice(&raw).map_err(|_| ResetTokenError::InvalidOrExpired)?;
        let signed = self
            .cipher
            .decrypt(&envelope)
            .map_err(|_| ResetTokenError::InvalidOrExpired)?;

        let data = decode::<RawResetClaims>(
            &signed,
            &DecodingKey::from_secret(self.secret_bytes()),
            &Validation::default(),
        )
        .map_err(|error| {
            tracing::debug!(%error, "reset token rejected");
            ResetTokenError::InvalidOrExpired
        })?;

        let raw = data.claims;
        let (Some(id), Some(role), Some(iat)) = (raw.id, raw.role, raw.iat) else {
            return Err(ResetTokenError::InvalidOrExpired);
        };

        Ok(ResetClaims {
            id,
            role,
            iat,
            exp: raw.exp,
        })
    }
}
