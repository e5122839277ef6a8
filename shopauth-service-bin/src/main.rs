use std::time::Duration;

use color_eyre::eyre::WrapErr;
use reqwest::Client as HttpClient;
use secrecy::Secret;
use shopauth_adapters::{
    AppState, Argon2PasswordHasher, PostmarkEmailClient, ResetTokenManager, SessionTokenManager,
    Settings,
};
use shopauth_core::{Email, LockoutPolicy, Role};
use shopauth_service_lib::{account_stores, configure_postgresql, init_tracing, AuthService};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    init_tracing();

    // Fail fast: absent or malformed key material aborts boot here,
    // never as a per-request 500.
    let settings = Settings::load().wrap_err("configuration is invalid")?;

    let pg_pool = configure_postgresql(&settings)
        .await
        .wrap_err("failed to create Postgres connection pool")?;
    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .wrap_err("failed to run migrations")?;

    let stores = account_stores(pg_pool);

    let http_client = HttpClient::builder()
        .timeout(Duration::from_millis(settings.email_client.timeout_millis))
        .build()?;
    let email_client = PostmarkEmailClient::new(
        settings.email_client.base_url.clone(),
        Email::try_from(Secret::from(settings.email_client.sender.clone()))
            .wrap_err("email_client.sender is not a valid address")?,
        settings.email_client.auth_token.clone(),
        http_client,
    );

    let session_tokens = SessionTokenManager::new(
        settings.auth.session.signing_secret.clone(),
        &settings
            .auth
            .session
            .cipher_key_bytes("auth.session.cipher_key")?,
        settings.session_ttl_seconds(),
    )?;
    let reset_tokens = ResetTokenManager::new(
        settings.auth.reset.signing_secret.clone(),
        &settings.auth.reset.cipher_key_bytes("auth.reset.cipher_key")?,
        settings.reset_ttl_seconds(),
    )?;

    let state = AppState {
        role: Role::User,
        stores,
        hasher: Argon2PasswordHasher,
        email_client,
        session_tokens,
        reset_tokens,
        lockout: LockoutPolicy::default(),
    };

    let listener = tokio::net::TcpListener::bind((
        settings.application.host.as_str(),
        settings.application.port,
    ))
    .await
    .wrap_err("failed to bind listener")?;

    AuthService::new(state).run_standalone(listener, None).await?;

    Ok(())
}
