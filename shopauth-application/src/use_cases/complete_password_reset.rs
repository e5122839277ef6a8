use chrono::Utc;
use shopauth_core::{
    AccountStore, AccountStoreError, AccountStores, Password, PasswordHasher, PasswordHasherError,
    ResetTokenService,
};

/// Error types specific to completing a password reset
#[derive(Debug, thiserror::Error)]
pub enum CompleteResetError {
    /// Tamper, expiry, and unknown-account failures are deliberately
    /// indistinguishable on the reset surface.
    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,
    #[error("New password must differ from the current password")]
    SamePassword,
    #[error(transparent)]
    Hasher(#[from] PasswordHasherError),
    #[error("Account store error: {0}")]
    StoreError(AccountStoreError),
}

/// Reset-completion use case - verifies the reset token, stores the new
/// hash, and rotates the session id so every outstanding session token
/// for the account dies with the old password.
pub struct CompletePasswordResetUseCase<S, R, H>
where
    S: AccountStore,
    R: ResetTokenService,
    H: PasswordHasher,
{
    stores: AccountStores<S>,
    reset_tokens: R,
    hasher: H,
}

impl<S, R, H> CompletePasswordResetUseCase<S, R, H>
where
    S: AccountStore,
    R: ResetTokenService,
    H: PasswordHasher,
{
    pub fn new(stores: AccountStores<S>, reset_tokens: R, hasher: H) -> Self {
        Self {
            stores,
            reset_tokens,
            hasher,
        }
    }

    /// Execute the reset-completion use case
    #[tracing::instrument(name = "CompletePasswordResetUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<(), CompleteResetError> {
        let claims = self.reset_tokens.verify(token).map_err(|error| {
            tracing::debug!(%error, "reset token rejected");
            CompleteResetError::InvalidOrExpiredToken
        })?;

        let store = self.stores.for_role(claims.role);
        let mut account = match store.find_by_id(claims.id).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                return Err(CompleteResetError::InvalidOrExpiredToken)
            }
            Err(other) => return Err(CompleteResetError::StoreError(other)),
        };

        if self
            .hasher
            .verify(new_password.as_ref(), account.password_hash())
            .await
        {
            return Err(CompleteResetError::SamePassword);
        }

        let new_hash = self.hasher.hash(&new_password).await?;
        account.apply_password_reset(new_hash, Utc::now());

        store
            .save(&account)
            .await
            .map_err(CompleteResetError::StoreError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        email, mock_stores, password, secret, MockPasswordHasher, MockResetTokenService,
    };
    use crate::use_cases::{login::LoginUseCase, register::RegisterUseCase};
    use shopauth_core::{LockoutPolicy, Role, ResetTokenService as _};

    async fn fixture() -> (
        AccountStores<crate::test_support::MockAccountStore>,
        String,
    ) {
        let stores = mock_stores();
        RegisterUseCase::new(stores.clone(), MockPasswordHasher)
            .execute(
                Role::User,
                email("a@x.com"),
                "Shopper".to_string(),
                password("Abcdef1!"),
            )
            .await
            .unwrap();

        let account = stores
            .for_role(Role::User)
            .find_by_email(&email("a@x.com"))
            .await
            .unwrap();
        let token = MockResetTokenService::default()
            .issue(account.id(), Role::User)
            .unwrap();

        (stores, token)
    }

    #[tokio::test]
    async fn test_reset_with_same_password_is_rejected() {
        let (stores, token) = fixture().await;

        let use_case = CompletePasswordResetUseCase::new(
            stores,
            MockResetTokenService::default(),
            MockPasswordHasher,
        );

        let result = use_case.execute(&token, password("Abcdef1!")).await;
        assert!(matches!(result, Err(CompleteResetError::SamePassword)));
    }

    #[tokio::test]
    async fn test_reset_changes_password_and_rotates_session() {
        let (stores, token) = fixture().await;

        let old_identity =
            LoginUseCase::new(stores.clone(), MockPasswordHasher, LockoutPolicy::default())
                .execute(Role::User, email("a@x.com"), secret("Abcdef1!"))
                .await
                .unwrap();

        CompletePasswordResetUseCase::new(
            stores.clone(),
            MockResetTokenService::default(),
            MockPasswordHasher,
        )
        .execute(&token, password("Ghijkl2?"))
        .await
        .unwrap();

        let account = stores
            .for_role(Role::User)
            .find_by_email(&email("a@x.com"))
            .await
            .unwrap();
        assert_ne!(account.session_id(), Some(&old_identity.session_id));
        assert!(account.password_changed_at().is_some());

        // Old password no longer logs in, new one does.
        let login = LoginUseCase::new(stores.clone(), MockPasswordHasher, LockoutPolicy::default());
        assert!(login
            .execute(Role::User, email("a@x.com"), secret("Abcdef1!"))
            .await
            .is_err());
        assert!(login
            .execute(Role::User, email("a@x.com"), secret("Ghijkl2?"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_rejected_token_is_flattened() {
        let (stores, token) = fixture().await;

        let use_case = CompletePasswordResetUseCase::new(
            stores,
            MockResetTokenService { reject_all: true },
            MockPasswordHasher,
        );

        let result = use_case.execute(&token, password("Ghijkl2?")).await;
        assert!(matches!(
            result,
            Err(CompleteResetError::InvalidOrExpiredToken)
        ));
    }
}
