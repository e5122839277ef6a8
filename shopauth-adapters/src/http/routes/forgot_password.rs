use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use shopauth_application::RequestPasswordResetUseCase;
use shopauth_core::{AccountStore, Email, EmailClient, PasswordHasher};

use super::error::AuthApiError;
use crate::http::AppState;

/// The one response every reset request gets, registered or not.
const RESET_ACK_MESSAGE: &str =
    "If that email address is registered, a password reset link has been sent.";

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
}

#[tracing::instrument(name = "Forgot password", skip_all, fields(role = %state.role))]
pub async fn forgot_password<S, H, E>(
    State(state): State<AppState<S, H, E>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case = RequestPasswordResetUseCase::new(
        state.stores.clone(),
        state.reset_tokens.clone(),
        state.email_client.clone(),
    );
    use_case.execute(state.role, &email).await?;

    Ok((
        StatusCode::OK,
        Json(ForgotPasswordResponse {
            message: RESET_ACK_MESSAGE.to_string(),
        }),
    ))
}
