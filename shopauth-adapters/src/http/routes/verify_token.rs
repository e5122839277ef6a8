use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use shopauth_core::{AccountStore, EmailClient, PasswordHasher, Role};
use uuid::Uuid;

use super::{authenticate, error::AuthApiError};
use crate::http::AppState;

#[derive(Debug, Serialize)]
pub struct VerifiedIdentity {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
}

/// The inbound-middleware surface: decrypt, verify, reload the account
/// and echo the normalized identity back to the caller.
#[tracing::instrument(name = "Verify token", skip_all)]
pub async fn verify_token<S, H, E>(
    State(state): State<AppState<S, H, E>>,
    headers: HeaderMap,
) -> Result<Json<VerifiedIdentity>, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let identity = authenticate(&state, &headers).await?;

    Ok(Json(VerifiedIdentity {
        id: identity.id,
        role: identity.role,
        email: identity.email.expose().to_string(),
    }))
}
