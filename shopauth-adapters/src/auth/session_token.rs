use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use shopauth_core::{
    Role, SessionClaims, SessionIdentity, SessionTokenError, SessionTokenService, TokenUser,
};

use crate::config::constants::{SESSION_COOKIE_NAME, SESSION_TOKEN_MAX_AGE_SECONDS};
use crate::crypto::token_cipher::{Envelope, TokenCipher, TokenCipherError};

/// Claims as decoded from the wire, before the mandatory fields have
/// been checked.
#[derive(Debug, Deserialize)]
struct RawSessionClaims {
    role: Option<Role>,
    user: Option<TokenUser>,
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    iat: Option<i64>,
    exp: i64,
}

/// Issues and verifies session tokens: HS256-signed claims wrapped in
/// AES-256-GCM, shipped as base64url of the JSON envelope.
#[derive(Clone)]
pub struct SessionTokenManager {
    signing_secret: Secret<String>,
    cipher: TokenCipher,
    ttl_seconds: i64,
}

impl SessionTokenManager {
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

impl SessionTokenService for SessionTokenManager {
    fn issue(&self, identity: &SessionIdentity) -> Result<String, SessionTokenError> {
        let iat = Utc::now().timestamp();
        let claims = SessionClaims {
            role: identity.role,
            user: TokenUser {
                id: identity.id,
                email: identity.email.expose().to_string(),
            },
            session_id: identity.session_id.as_str().to_string(),
            iat,
            exp: iat + self.ttl_seconds,
        };

        let signed = encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_bytes()),
        )
        .map_err(|e| SessionTokenError::UnexpectedError(e.to_string()))?;

        let envelope = self
            .cipher
            .encrypt(&signed)
            .map_err(|e| SessionTokenError::UnexpectedError(e.to_string()))?;
        let json = serde_json::to_string(&envelope)
            .map_err(|e| SessionTokenError::UnexpectedError(e.to_string()))?;

        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        // Authentication of the envelope comes first; no claim is
        // trusted until the tag has verified.
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| SessionTokenError::Tampered)?;
        let envelope: Envelope =
            serde_json::from_slice(&raw).map_err(|_| SessionTokenError::Tampered)?;
        let signed = self
            .cipher
            .decrypt(&envelope)
            .map_err(|_| SessionTokenError::Tampered)?;

        let data = decode::<RawSessionClaims>(
            &signed,
            &DecodingKey::from_secret(self.secret_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionTokenError::Expired,
            ErrorKind::InvalidSignature => SessionTokenError::InvalidSignature,
            _ => SessionTokenError::MalformedClaims,
        })?;

        let raw = data.claims;
        let (Some(role), Some(user), Some(session_id), Some(iat)) =
            (raw.role, raw.user, raw.session_id, raw.iat)
        else {
            return Err(SessionTokenError::MalformedClaims);
        };

        // Absolute-lifetime ceiling, independent of the signed exp.
        if Utc::now().timestamp() - iat > SESSION_TOKEN_MAX_AGE_SECONDS {
            return Err(SessionTokenError::Expired);
        }

        Ok(SessionClaims {
            role,
            user,
            session_id,
            iat,
            exp: raw.exp,
        })
    }
}

/// Build the browser-facing session cookie. Header clients ignore this
/// and present the token as a bearer credential instead.
pub fn create_session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

pub fn create_removal_cookie() -> Cookie<'static> {
    let mut cookie = create_session_cookie(String::new());
    cookie.make_removal();
    cookie
}
