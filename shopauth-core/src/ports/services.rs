use async_trait::async_trait;
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    email::Email,
    password::{Password, PasswordHash},
    role::Role,
    session::SessionId,
};

// EmailClient port trait
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

// PasswordHasher port trait and errors
#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Adaptive one-way hashing of plaintext passwords.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Verify a raw candidate against a stored hash.
    ///
    /// Returns `false` on mismatch, empty input, or a malformed stored
    /// hash - never an error, so callers cannot tell those apart.
    async fn verify(&self, candidate: &Secret<String>, stored: &PasswordHash) -> bool;
}

/// The normalized identity attached to a request after verification,
/// and the input to session token issuance.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub id: Uuid,
    pub role: Role,
    pub email: Email,
    pub session_id: SessionId,
}

/// Minimal user descriptor carried inside session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Uuid,
    pub email: String,
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub role: Role,
    pub user: TokenUser,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("Token failed authentication")]
    Tampered,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Token claims are malformed")]
    MalformedClaims,
    #[error("Unexpected token error: {0}")]
    UnexpectedError(String),
}

/// Issues and verifies the bearer credential: signed claims wrapped in
/// authenticated encryption. A pure transform - persistence of the
/// session id happens before `issue` is called.
pub trait SessionTokenService: Send + Sync {
    fn issue(&self, identity: &SessionIdentity) -> Result<String, SessionTokenError>;
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError>;
}

/// Claims carried inside a password-reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub id: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum ResetTokenError {
    #[error("Invalid or expired reset token")]
    InvalidOrExpired,
    #[error("Unexpected reset token error: {0}")]
    UnexpectedError(String),
}

/// The shorter-lived, separately-keyed token pipeline used to authorize
/// a one-time password change without an active session.
pub trait ResetTokenService: Send + Sync {
    fn issue(&self, account_id: Uuid, role: Role) -> Result<String, ResetTokenError>;
    fn verify(&self, token: &str) -> Result<ResetClaims, ResetTokenError>;
}
