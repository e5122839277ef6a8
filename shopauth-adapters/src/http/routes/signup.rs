use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use shopauth_application::RegisterUseCase;
use shopauth_core::{AccountStore, Email, EmailClient, Password, PasswordHasher};

use super::error::AuthApiError;
use crate::http::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Secret<String>,
    pub name: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
}

#[tracing::instrument(name = "Signup", skip_all, fields(role = %state.role))]
pub async fn signup<S, H, E>(
    State(state): State<AppState<S, H, E>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AuthApiError::InvalidInput("Name cannot be empty".to_string()));
    }

    let use_case = RegisterUseCase::new(state.stores.clone(), state.hasher.clone());
    use_case.execute(state.role, email, name, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Account created successfully!".to_string(),
        }),
    ))
}
