pub mod auth_service;
pub mod helpers;
pub mod telemetry;

pub use auth_service::AuthService;
pub use helpers::{account_stores, configure_postgresql, get_postgres_pool};
pub use telemetry::init_tracing;
