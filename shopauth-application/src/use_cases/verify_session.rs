use shopauth_core::{
    AccountStore, AccountStoreError, AccountStores, SessionIdentity, SessionTokenError,
    SessionTokenService,
};

/// Error types specific to session verification
#[derive(Debug, thiserror::Error)]
pub enum VerifySessionError {
    #[error(transparent)]
    Token(#[from] SessionTokenError),
    #[error("Account not found")]
    AccountNotFound,
    /// The embedded session id no longer matches the account's current
    /// one: the user logged out, reset their password, or the token was
    /// replayed after a legitimate rotation.
    #[error("Session has been revoked")]
    SessionRevoked,
    #[error("Account store error: {0}")]
    StoreError(AccountStoreError),
}

/// Session verification use case - the inbound-request side of the
/// token pipeline: cryptographic verification, account reload, and the
/// session-id comparison that makes revocation immediate.
pub struct VerifySessionUseCase<S, T>
where
    S: AccountStore,
    T: SessionTokenService,
{
    stores: AccountStores<S>,
    tokens: T,
}

impl<S, T> VerifySessionUseCase<S, T>
where
    S: AccountStore,
    T: SessionTokenService,
{
    pub fn new(stores: AccountStores<S>, tokens: T) -> Self {
        Self { stores, tokens }
    }

    /// Execute session verification
    ///
    /// # Returns
    /// The normalized identity to attach to the request context.
    #[tracing::instrument(name = "VerifySessionUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &str) -> Result<SessionIdentity, VerifySessionError> {
        let claims = self.tokens.verify(token)?;

        let store = self.stores.for_role(claims.role);
        let account = match store.find_by_id(claims.user.id).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                return Err(VerifySessionError::AccountNotFound)
            }
            Err(other) => return Err(VerifySessionError::StoreError(other)),
        };

        let current = account
            .session_id()
            .filter(|current| current.as_str() == claims.session_id)
            .ok_or(VerifySessionError::SessionRevoked)?;

        Ok(SessionIdentity {
            id: account.id(),
            role: account.role(),
            email: account.email().clone(),
            session_id: current.clone(),
        })
    }
}
