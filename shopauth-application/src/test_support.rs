//! Shared port mocks for use case tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, Secret};
use shopauth_core::{
    Account, AccountStore, AccountStoreError, AccountStores, Email, EmailClient, Password,
    PasswordHash, PasswordHasher, PasswordHasherError, ResetClaims, ResetTokenError,
    ResetTokenService, Role,
};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MockAccountStore {
    accounts: Arc<Mutex<HashMap<Uuid, Account>>>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait::async_trait]
impl AccountStore for MockAccountStore {
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email() == account.email()) {
            return Err(AccountStoreError::AccountAlreadyExists);
        }
        accounts.insert(account.id(), account);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email() == email)
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountStoreError> {
        self.accounts
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn save(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if !accounts.contains_key(&account.id()) {
            return Err(AccountStoreError::AccountNotFound);
        }
        accounts.insert(account.id(), account.clone());
        Ok(())
    }
}

pub fn mock_stores() -> AccountStores<MockAccountStore> {
    AccountStores::new(MockAccountStore::new(), MockAccountStore::new())
}

/// Reversible stand-in for the adaptive hasher, fast enough for tests.
#[derive(Clone, Default)]
pub struct MockPasswordHasher;

#[async_trait::async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let phc = format!("mock${}", password.as_ref().expose_secret());
        Ok(PasswordHash::new(Secret::from(phc)))
    }

    async fn verify(&self, candidate: &Secret<String>, stored: &PasswordHash) -> bool {
        stored.expose() == format!("mock${}", candidate.expose_secret())
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

#[derive(Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.expose().to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}

/// Transparent reset token encoding plus a switch to force verification
/// failures.
#[derive(Clone, Default)]
pub struct MockResetTokenService {
    pub reject_all: bool,
}

impl ResetTokenService for MockResetTokenService {
    fn issue(&self, account_id: Uuid, role: Role) -> Result<String, ResetTokenError> {
        Ok(format!("reset.{account_id}.{role}"))
    }

    fn verify(&self, token: &str) -> Result<ResetClaims, ResetTokenError> {
        if self.reject_all {
            return Err(ResetTokenError::InvalidOrExpired);
        }

        let mut parts = token.split('.');
        let (Some("reset"), Some(id), Some(role)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ResetTokenError::InvalidOrExpired);
        };

        let id = Uuid::parse_str(id).map_err(|_| ResetTokenError::InvalidOrExpired)?;
        let role = Role::parse(role).ok_or(ResetTokenError::InvalidOrExpired)?;

        Ok(ResetClaims {
            id,
            role,
            iat: 0,
            exp: i64::MAX,
        })
    }
}

pub fn email(address: &str) -> Email {
    Email::try_from(Secret::from(address.to_string())).unwrap()
}

pub fn password(plaintext: &str) -> Password {
    Password::try_from(Secret::from(plaintext.to_string())).unwrap()
}

pub fn secret(plaintext: &str) -> Secret<String> {
    Secret::from(plaintext.to_string())
}
