use shopauth_core::{AccountStore, AccountStoreError, AccountStores, SessionIdentity};

/// Error types specific to the logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Account store error: {0}")]
    StoreError(AccountStoreError),
}

/// Logout use case - clears the account's active session id, which
/// invalidates every outstanding token without a token blocklist.
pub struct LogoutUseCase<S>
where
    S: AccountStore,
{
    stores: AccountStores<S>,
}

impl<S> LogoutUseCase<S>
where
    S: AccountStore,
{
    pub fn new(stores: AccountStores<S>) -> Self {
        Self { stores }
    }

    /// Execute the logout use case
    ///
    /// Logout of an already-deleted account succeeds: there is no
    /// session left to revoke.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, identity: &SessionIdentity) -> Result<(), LogoutError> {
        let store = self.stores.for_role(identity.role);

        let mut account = match store.find_by_id(identity.id).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => return Ok(()),
            Err(other) => return Err(LogoutError::StoreError(other)),
        };

        account.clear_session();
        store
            .save(&account)
            .await
            .map_err(LogoutError::StoreError)?;

        Ok(())
    }
}
