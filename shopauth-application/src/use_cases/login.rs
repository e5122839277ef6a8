use chrono::{Duration, Utc};
use secrecy::Secret;
use shopauth_core::{
    AccountStore, AccountStoreError, AccountStores, Email, LockoutDecision, LockoutPolicy,
    PasswordHasher, Role, SessionIdentity,
};

/// Error types specific to the login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Wrong password or unknown account - deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is locked")]
    AccountLocked { retry_after: Duration },
    #[error("Account store error: {0}")]
    StoreError(AccountStoreError),
}

/// Login use case - lockout gate, credential check, session rotation.
pub struct LoginUseCase<S, H>
where
    S: AccountStore,
    H: PasswordHasher,
{
    stores: AccountStores<S>,
    hasher: H,
    policy: LockoutPolicy,
}

impl<S, H> LoginUseCase<S, H>
where
    S: AccountStore,
    H: PasswordHasher,
{
    pub fn new(stores: AccountStores<S>, hasher: H, policy: LockoutPolicy) -> Self {
        Self {
            stores,
            hasher,
            policy,
        }
    }

    /// Execute the login use case
    ///
    /// An active lock refuses the attempt before the password hash is
    /// consulted. The attempt that trips the lock reports the lock
    /// rather than plain invalid credentials.
    ///
    /// # Returns
    /// The identity to issue a session token for, carrying the freshly
    /// rotated session id (already persisted).
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, candidate))]
    pub async fn execute(
        &self,
        role: Role,
        email: Email,
        candidate: Secret<String>,
    ) -> Result<SessionIdentity, LoginError> {
        let store = self.stores.for_role(role);
        let now = Utc::now();

        let mut account = match store.find_by_email(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => return Err(LoginError::InvalidCredentials),
            Err(other) => return Err(LoginError::StoreError(other)),
        };

        if let Some(retry_after) = account.lock_remaining(now) {
            return Err(LoginError::AccountLocked { retry_after });
        }
        account.clear_expired_lock(now);

        if !self.hasher.verify(&candidate, account.password_hash()).await {
            let decision = account.record_failed_attempt(&self.policy, now);
            store
                .save(&account)
                .await
                .map_err(LoginError::StoreError)?;

            return Err(match decision {
                LockoutDecision::Locked { retry_after } => {
                    tracing::info!(attempts = account.login_attempts(), "account locked");
                    LoginError::AccountLocked { retry_after }
                }
                LockoutDecision::Counted { .. } => LoginError::InvalidCredentials,
            });
        }

        let session_id = account.record_successful_login(now);
        store
            .save(&account)
            .await
            .map_err(LoginError::StoreError)?;

        Ok(SessionIdentity {
            id: account.id(),
            role: account.role(),
            email: account.email().clone(),
            session_id,
        })
    }
}
