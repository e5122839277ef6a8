use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use shopauth_application::CompletePasswordResetUseCase;
use shopauth_core::{AccountStore, EmailClient, Password, PasswordHasher};

use super::error::AuthApiError;
use crate::http::AppState;

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}

/// Consumes the one-shot reset token carried as a URL path segment.
#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<S, H, E>(
    State(state): State<AppState<S, H, E>>,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let password = Password::try_from(request.password)?;

    let use_case = CompletePasswordResetUseCase::new(
        state.stores.clone(),
        state.reset_tokens.clone(),
        state.hasher.clone(),
    );
    use_case.execute(&token, password).await?;

    Ok((
        StatusCode::OK,
        Json(ResetPasswordResponse {
            message: "Password has been reset. Please log in again.".to_string(),
        }),
    ))
}
