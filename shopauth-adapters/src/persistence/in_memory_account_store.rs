use std::sync::Arc;

use dashmap::DashMap;
use shopauth_core::{Account, AccountStore, AccountStoreError, Email};
use uuid::Uuid;

/// In-memory account store for tests and local development.
///
/// Mutations are read-modify-write, the same contract as the Postgres
/// store.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<DashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError> {
        if self
            .accounts
            .iter()
            .any(|entry| entry.value().email() == account.email())
        {
            return Err(AccountStoreError::AccountAlreadyExists);
        }
        self.accounts.insert(account.id(), account);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError> {
        self.accounts
            .iter()
            .find(|entry| entry.value().email() == email)
            .map(|entry| entry.value().clone())
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountStoreError> {
        self.accounts
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn save(&self, account: &Account) -> Result<(), AccountStoreError> {
        if !self.accounts.contains_key(&account.id()) {
            return Err(AccountStoreError::AccountNotFound);
        }
        self.accounts.insert(account.id(), account.clone());
        Ok(())
    }
}
