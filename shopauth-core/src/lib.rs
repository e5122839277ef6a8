pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, LockoutDecision},
    email::{Email, EmailError},
    lockout::LockoutPolicy,
    password::{Password, PasswordError, PasswordHash},
    role::Role,
    session::SessionId,
};

pub use ports::{
    repositories::{AccountStore, AccountStoreError, AccountStores},
    services::{
        EmailClient, PasswordHasher, PasswordHasherError, ResetClaims, ResetTokenError,
        ResetTokenService, SessionClaims, SessionIdentity, SessionTokenError, SessionTokenService,
        TokenUser,
    },
};
