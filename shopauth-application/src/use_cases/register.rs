use shopauth_core::{
    Account, AccountStore, AccountStoreError, AccountStores, Email, Password, PasswordHasher,
    PasswordHasherError, Role,
};

/// Error types specific to the registration use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Account already exists")]
    AccountAlreadyExists,
    #[error(transparent)]
    Hasher(#[from] PasswordHasherError),
    #[error("Account store error: {0}")]
    StoreError(AccountStoreError),
}

impl From<AccountStoreError> for RegisterError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::AccountAlreadyExists => RegisterError::AccountAlreadyExists,
            other => RegisterError::StoreError(other),
        }
    }
}

/// Registration use case - creates an account with a hashed credential
pub struct RegisterUseCase<S, H>
where
    S: AccountStore,
    H: PasswordHasher,
{
    stores: AccountStores<S>,
    hasher: H,
}

impl<S, H> RegisterUseCase<S, H>
where
    S: AccountStore,
    H: PasswordHasher,
{
    pub fn new(stores: AccountStores<S>, hasher: H) -> Self {
        Self { stores, hasher }
    }

    /// Execute the registration use case
    ///
    /// The password has already passed the strength policy by virtue of
    /// being a [`Password`]; only then is adaptive-hash cost spent.
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        role: Role,
        email: Email,
        name: String,
        password: Password,
    ) -> Result<(), RegisterError> {
        let password_hash = self.hasher.hash(&password).await?;
        let account = Account::new(email, name, password_hash, role);

        self.stores.for_role(role).add_account(account).await?;

        Ok(())
    }
}
