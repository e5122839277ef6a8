use argon2::password_hash::{rand_core, PasswordHasher as _, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use secrecy::{ExposeSecret, Secret};
use shopauth_core::{Password, PasswordHash, PasswordHasher, PasswordHasherError};

use crate::config::constants::{ARGON2_ITERATIONS, ARGON2_MEMORY_KIB, ARGON2_PARALLELISM};

/// Argon2id hasher with the cost parameters from `config::constants`.
///
/// Hashing and verification are CPU-heavy on purpose, so both run on
/// the blocking pool rather than stalling the request executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

fn argon2() -> Result<Argon2<'static>, String> {
    let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, None)
        .map_err(|e| e.to_string())?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let password = password.as_ref().clone();
        let current_span = tracing::Span::current();

        let result = tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let salt = SaltString::generate(rand_core::OsRng);
                argon2()?
                    .hash_password(password.expose_secret().as_bytes(), &salt)
                    .map(|hash| PasswordHash::new(Secret::from(hash.to_string())))
                    .map_err(|e| e.to_string())
            })
        })
        .await
        .map_err(|e| PasswordHasherError::HashingFailed(e.to_string()))?;

        result.map_err(PasswordHasherError::HashingFailed)
    }

    #[tracing::instrument(name = "Verifying password hash", skip_all)]
    async fn verify(&self, candidate: &Secret<String>, stored: &PasswordHash) -> bool {
        if candidate.expose_secret().is_empty() {
            return false;
        }

        let candidate = candidate.clone();
        let stored = stored.expose().to_string();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let Ok(expected) = argon2::PasswordHash::new(&stored) else {
                    return false;
                };
                let Ok(hasher) = argon2() else {
                    return false;
                };
                hasher
                    .verify_password(candidate.expose_secret().as_bytes(), &expected)
                    .is_ok()
            })
        })
        .await
        .unwrap_or(false)
    }
}
