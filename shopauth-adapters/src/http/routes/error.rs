use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shopauth_application::{
    CompleteResetError, LoginError, LogoutError, RegisterError, RequestResetError,
    VerifySessionError,
};
use shopauth_core::{EmailError, PasswordError, SessionTokenError};
use thiserror::Error;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The single boundary between the internal error taxonomy and what a
/// caller is allowed to learn. Token failures of every internal kind
/// flatten to one 401 so the edge never discloses which check failed;
/// the distinction survives only in the logs.
#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    WeakPassword(String),

    #[error("Account already exists")]
    AccountAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked. Try again later")]
    AccountLocked { retry_after_seconds: i64 },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid or expired reset token")]
    InvalidOrExpiredResetToken,

    #[error("New password must differ from the current password")]
    SamePassword,

    #[error("Unexpected error")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message, retry_after) = match self {
            error @ (AuthApiError::InvalidInput(_)
            | AuthApiError::WeakPassword(_)
            | AuthApiError::InvalidOrExpiredResetToken
            | AuthApiError::SamePassword) => (StatusCode::BAD_REQUEST, error.to_string(), None),

            error @ AuthApiError::AccountAlreadyExists => {
                (StatusCode::CONFLICT, error.to_string(), None)
            }

            error @ (AuthApiError::InvalidCredentials | AuthApiError::AuthenticationFailed) => {
                (StatusCode::UNAUTHORIZED, error.to_string(), None)
            }

            AuthApiError::AccountLocked {
                retry_after_seconds,
            } => (
                StatusCode::LOCKED,
                "Account locked. Try again later".to_string(),
                Some(retry_after_seconds),
            ),

            AuthApiError::UnexpectedError(detail) => {
                tracing::error!(%detail, "request failed unexpectedly");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });
        let mut response = (status_code, body).into_response();

        if let Some(seconds) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<EmailError> for AuthApiError {
    fn from(error: EmailError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordError> for AuthApiError {
    fn from(error: PasswordError) -> Self {
        match error {
            PasswordError::Empty => AuthApiError::InvalidInput(error.to_string()),
            other => AuthApiError::WeakPassword(other.to_string()),
        }
    }
}

impl From<RegisterError> for AuthApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::AccountAlreadyExists => AuthApiError::AccountAlreadyExists,
            RegisterError::Hasher(e) => AuthApiError::UnexpectedError(e.to_string()),
            RegisterError::StoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
            LoginError::AccountLocked { retry_after } => AuthApiError::AccountLocked {
                retry_after_seconds: retry_after.num_seconds().max(0),
            },
            LoginError::StoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::StoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<VerifySessionError> for AuthApiError {
    fn from(error: VerifySessionError) -> Self {
        match error {
            VerifySessionError::StoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            other => {
                // The internal distinction is for diagnostics only.
                tracing::debug!(error = %other, "authentication failed");
                AuthApiError::AuthenticationFailed
            }
        }
    }
}

impl From<SessionTokenError> for AuthApiError {
    fn from(error: SessionTokenError) -> Self {
        // Only issuance reaches this path; verification failures arrive
        // wrapped in VerifySessionError.
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<RequestResetError> for AuthApiError {
    fn from(error: RequestResetError) -> Self {
        match error {
            RequestResetError::StoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<CompleteResetError> for AuthApiError {
    fn from(error: CompleteResetError) -> Self {
        match error {
            CompleteResetError::InvalidOrExpiredToken => AuthApiError::InvalidOrExpiredResetToken,
            CompleteResetError::SamePassword => AuthApiError::SamePassword,
            CompleteResetError::Hasher(e) => AuthApiError::UnexpectedError(e.to_string()),
            CompleteResetError::StoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}
