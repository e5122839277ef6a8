pub mod auth;
pub mod config;
pub mod crypto;
pub mod email;
pub mod http;
pub mod persistence;

pub use auth::{
    password_hasher::Argon2PasswordHasher,
    reset_token::ResetTokenManager,
    session_token::{create_removal_cookie, create_session_cookie, SessionTokenManager},
};
pub use config::settings::{Settings, SettingsError};
pub use email::{mock_email_client::MockEmailClient, postmark_email_client::PostmarkEmailClient};
pub use http::AppState;
pub use persistence::{
    in_memory_account_store::InMemoryAccountStore, postgres_account_store::PostgresAccountStore,
};
