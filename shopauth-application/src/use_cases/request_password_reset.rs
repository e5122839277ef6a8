use shopauth_core::{
    AccountStore, AccountStoreError, AccountStores, Email, EmailClient, ResetTokenService, Role,
};

const RESET_EMAIL_SUBJECT: &str = "Reset your password";

/// Error types specific to the reset-request use case
#[derive(Debug, thiserror::Error)]
pub enum RequestResetError {
    #[error("Account store error: {0}")]
    StoreError(AccountStoreError),
}

/// Reset-request use case.
///
/// The outcome is identical whether or not the account exists; a
/// missing account, a minting failure, and a failed send all resolve to
/// the same success so callers cannot probe for registered emails.
pub struct RequestPasswordResetUseCase<S, R, E>
where
    S: AccountStore,
    R: ResetTokenService,
    E: EmailClient,
{
    stores: AccountStores<S>,
    reset_tokens: R,
    email_client: E,
}

impl<S, R, E> RequestPasswordResetUseCase<S, R, E>
where
    S: AccountStore,
    R: ResetTokenService,
    E: EmailClient,
{
    pub fn new(stores: AccountStores<S>, reset_tokens: R, email_client: E) -> Self {
        Self {
            stores,
            reset_tokens,
            email_client,
        }
    }

    /// Execute the reset-request use case
    #[tracing::instrument(name = "RequestPasswordResetUseCase::execute", skip(self))]
    pub async fn execute(&self, role: Role, email: &Email) -> Result<(), RequestResetError> {
        let account = match self.stores.for_role(role).find_by_email(email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                tracing::debug!("password reset requested for unknown account");
                return Ok(());
            }
            Err(other) => return Err(RequestResetError::StoreError(other)),
        };

        let token = match self.reset_tokens.issue(account.id(), role) {
            Ok(token) => token,
            Err(error) => {
                tracing::warn!(%error, "failed to mint password reset token");
                return Ok(());
            }
        };

        let content = format!(
            "We received a request to reset the password for your account.\n\
             Follow the link below to choose a new password:\n\
             /reset-password/{token}\n\
             The link expires in 60 minutes. If you did not request a reset,\n\
             you can safely ignore this email."
        );

        // Fire-and-forget: delivery failures are an email-provider
        // concern, not a reason to change the response.
        if let Err(error) = self
            .email_client
            .send_email(email, RESET_EMAIL_SUBJECT, &content)
            .await
        {
            tracing::warn!(%error, "failed to send password reset email");
        }

        Ok(())
    }
}
