use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use shopauth_application::LoginUseCase;
use shopauth_core::{AccountStore, Email, EmailClient, PasswordHasher, SessionTokenService};
use uuid::Uuid;

use super::error::AuthApiError;
use crate::auth::session_token::create_session_cookie;
use crate::http::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
}

#[tracing::instrument(name = "Login", skip_all, fields(role = %state.role))]
pub async fn login<S, H, E>(
    State(state): State<AppState<S, H, E>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    if request.password.expose_secret().is_empty() {
        return Err(AuthApiError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let use_case = LoginUseCase::new(state.stores.clone(), state.hasher.clone(), state.lockout);
    let identity = use_case
        .execute(state.role, email, request.password)
        .await?;

    // The fresh session id is already persisted; issuance is a pure
    // transform over it.
    let token = state.session_tokens.issue(&identity)?;
    let jar = jar.add(create_session_cookie(token.clone()));

    let body = LoginResponse {
        user: LoginUser {
            id: identity.id,
            email: identity.email.expose().to_string(),
        },
        token,
    };

    Ok((jar, (StatusCode::OK, Json(body))))
}
