use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use shopauth_application::LogoutUseCase;
use shopauth_core::{AccountStore, EmailClient, PasswordHasher};

use super::{authenticate, error::AuthApiError};
use crate::auth::session_token::create_removal_cookie;
use crate::http::AppState;

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<S, H, E>(
    State(state): State<AppState<S, H, E>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let identity = authenticate(&state, &headers).await?;

    LogoutUseCase::new(state.stores.clone())
        .execute(&identity)
        .await?;

    let jar = jar.add(create_removal_cookie());

    Ok((
        jar,
        (
            StatusCode::OK,
            Json(LogoutResponse {
                message: "Logged out".to_string(),
            }),
        ),
    ))
}
