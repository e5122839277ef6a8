pub mod error;
pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod reset_password;
pub mod signup;
pub mod verify_token;

pub use error::{AuthApiError, ErrorResponse};
pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use reset_password::reset_password;
pub use signup::signup;
pub use verify_token::verify_token;

use axum::http::HeaderMap;
use shopauth_application::VerifySessionUseCase;
use shopauth_core::{AccountStore, EmailClient, PasswordHasher, SessionIdentity};

use crate::auth::extract::extract_session_token;
use crate::config::constants::SESSION_COOKIE_NAME;
use crate::http::AppState;

/// Resolve the inbound request to an authenticated identity, or fail
/// with the uniform 401.
pub(crate) async fn authenticate<S, H, E>(
    state: &AppState<S, H, E>,
    headers: &HeaderMap,
) -> Result<SessionIdentity, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let token = extract_session_token(headers, SESSION_COOKIE_NAME).ok_or_else(|| {
        tracing::debug!("request carried no session credential");
        AuthApiError::AuthenticationFailed
    })?;

    let use_case = VerifySessionUseCase::new(state.stores.clone(), state.session_tokens.clone());
    Ok(use_case.execute(&token).await?)
}
