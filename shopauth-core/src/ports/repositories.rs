use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{account::Account, email::Email, role::Role};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Account already exists")]
    AccountAlreadyExists,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountAlreadyExists, Self::AccountAlreadyExists) => true,
            (Self::AccountNotFound, Self::AccountNotFound) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Persistence port for account records of a single role.
///
/// Mutations are read-modify-write: callers load an [`Account`], drive
/// its domain methods, and hand the result back to `save`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountStoreError>;
    async fn save(&self, account: &Account) -> Result<(), AccountStoreError>;
}

/// One store per role, selected by the role tag carried in requests and
/// token claims. Keeps role dispatch in one place instead of scattering
/// role switches across every handler.
#[derive(Debug, Clone)]
pub struct AccountStores<S> {
    users: S,
    admins: S,
}

impl<S: AccountStore> AccountStores<S> {
    pub fn new(users: S, admins: S) -> Self {
        Self { users, admins }
    }

    pub fn for_role(&self, role: Role) -> &S {
        match role {
            Role::User => &self.users,
            Role::Admin => &self.admins,
        }
    }
}
