pub mod routes;

use shopauth_core::{
    AccountStore, AccountStores, EmailClient, LockoutPolicy, PasswordHasher, Role,
};

use crate::auth::{reset_token::ResetTokenManager, session_token::SessionTokenManager};

/// Request state for one role's route set.
///
/// The same handlers are mounted twice - once for shoppers and once for
/// administrators - differing only in `role`. Both mounts share the
/// full store pair because token verification dispatches on the role
/// embedded in the claims, not on the surface the token arrived at.
#[derive(Clone)]
pub struct AppState<S, H, E>
where
    S: Clone,
    H: Clone,
    E: Clone,
{
    pub role: Role,
    pub stores: AccountStores<S>,
    pub hasher: H,
    pub email_client: E,
    pub session_tokens: SessionTokenManager,
    pub reset_tokens: ResetTokenManager,
    pub lockout: LockoutPolicy,
}

impl<S, H, E> AppState<S, H, E>
where
    S: AccountStore + Clone,
    H: PasswordHasher + Clone,
    E: EmailClient + Clone,
{
    /// The same state, re-scoped to another role surface.
    pub fn with_role(&self, role: Role) -> Self {
        let mut state = self.clone();
        state.role = role;
        state
    }
}
