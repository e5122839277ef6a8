use chrono::{DateTime, Utc};
use secrecy::Secret;
use shopauth_core::{
    Account, AccountStore, AccountStoreError, Email, PasswordHash, Role, SessionId,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Pool, Postgres, Row};
use uuid::Uuid;

/// Account store backed by a single `accounts` table with a role
/// column. Each instance serves one role; lookups always filter on it.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
    role: Role,
}

impl PostgresAccountStore {
    pub fn new(pool: Pool<Postgres>, role: Role) -> Self {
        PostgresAccountStore { pool, role }
    }
}

fn unexpected(e: sqlx::Error) -> AccountStoreError {
    AccountStoreError::UnexpectedError(e.to_string())
}

fn account_from_row(row: &PgRow) -> Result<Account, AccountStoreError> {
    let email: String = row.try_get("email").map_err(unexpected)?;
    let email = Email::try_from(Secret::from(email))
        .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

    let role: String = row.try_get("role").map_err(unexpected)?;
    let role = Role::parse(&role)
        .ok_or_else(|| AccountStoreError::UnexpectedError(format!("unknown role tag: {role}")))?;

    let password_hash: String = row.try_get("password_hash").map_err(unexpected)?;
    let session_id: Option<String> = row.try_get("session_id").map_err(unexpected)?;
    let login_attempts: i32 = row.try_get("login_attempts").map_err(unexpected)?;

    Ok(Account::hydrate(
        row.try_get::<Uuid, _>("id").map_err(unexpected)?,
        email,
        row.try_get("name").map_err(unexpected)?,
        PasswordHash::new(Secret::from(password_hash)),
        role,
        session_id.map(SessionId::from),
        row.try_get::<Option<DateTime<Utc>>, _>("last_login")
            .map_err(unexpected)?,
        login_attempts.max(0) as u32,
        row.try_get::<Option<DateTime<Utc>>, _>("lock_until")
            .map_err(unexpected)?,
        row.try_get::<Option<DateTime<Utc>>, _>("password_changed_at")
            .map_err(unexpected)?,
    ))
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError> {
        let query = sqlx::query(
            r#"
                INSERT INTO accounts
                    (id, email, name, password_hash, role, session_id,
                     last_login, login_attempts, lock_until, password_changed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.id())
        .bind(account.email().expose())
        .bind(account.name())
        .bind(account.password_hash().expose())
        .bind(account.role().as_str())
        .bind(account.session_id().map(|s| s.as_str().to_string()))
        .bind(account.last_login())
        .bind(account.login_attempts() as i32)
        .bind(account.lock_until())
        .bind(account.password_changed_at());

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return AccountStoreError::AccountAlreadyExists;
                }
            }
            unexpected(e)
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, email, name, password_hash, role, session_id,
                       last_login, login_attempts, lock_until, password_changed_at
                FROM accounts
                WHERE email = $1 AND role = $2
            "#,
        )
        .bind(email.expose())
        .bind(self.role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(AccountStoreError::AccountNotFound);
        };

        account_from_row(&row)
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, email, name, password_hash, role, session_id,
                       last_login, login_attempts, lock_until, password_changed_at
                FROM accounts
                WHERE id = $1 AND role = $2
            "#,
        )
        .bind(id)
        .bind(self.role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(AccountStoreError::AccountNotFound);
        };

        account_from_row(&row)
    }

    #[tracing::instrument(name = "Saving account to PostgreSQL", skip_all)]
    async fn save(&self, account: &Account) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET password_hash = $2,
                    session_id = $3,
                    last_login = $4,
                    login_attempts = $5,
                    lock_until = $6,
                    password_changed_at = $7
                WHERE id = $1
            "#,
        )
        .bind(account.id())
        .bind(account.password_hash().expose())
        .bind(account.session_id().map(|s| s.as_str().to_string()))
        .bind(account.last_login())
        .bind(account.login_attempts() as i32)
        .bind(account.lock_until())
        .bind(account.password_changed_at())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }
}
