use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::{
    email::Email, lockout::LockoutPolicy, password::PasswordHash, role::Role, session::SessionId,
};

/// Outcome of recording a failed login attempt.
#[derive(Debug, PartialEq)]
pub enum LockoutDecision {
    /// The attempt was counted but the threshold was not reached.
    Counted { attempts: u32 },
    /// This attempt tripped the lock.
    Locked { retry_after: Duration },
}

/// A persisted account record, either a shopper or an administrator.
///
/// Credential, session and lockout fields are only mutated through the
/// methods below; stores persist whatever state those methods leave
/// behind.
#[derive(Debug, Clone)]
pub struct Account {
    id: Uuid,
    email: Email,
    name: String,
    password_hash: PasswordHash,
    role: Role,
    session_id: Option<SessionId>,
    last_login: Option<DateTime<Utc>>,
    login_attempts: u32,
    lock_until: Option<DateTime<Utc>>,
    password_changed_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a fresh account at registration time.
    pub fn new(email: Email, name: String, password_hash: PasswordHash, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            role,
            session_id: None,
            last_login: None,
            login_attempts: 0,
            lock_until: None,
            password_changed_at: None,
        }
    }

    /// Rebuild an account from stored fields. For store adapters only.
    #[allow(clippy::too_many_arguments)]
    pub fn hydrate(
        id: Uuid,
        email: Email,
        name: String,
        password_hash: PasswordHash,
        role: Role,
        session_id: Option<SessionId>,
        last_login: Option<DateTime<Utc>>,
        login_attempts: u32,
        lock_until: Option<DateTime<Utc>>,
        password_changed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            role,
            session_id,
            last_login,
            login_attempts,
            lock_until,
            password_changed_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    pub fn lock_until(&self) -> Option<DateTime<Utc>> {
        self.lock_until
    }

    pub fn password_changed_at(&self) -> Option<DateTime<Utc>> {
        self.password_changed_at
    }

    /// Time remaining on an active lock, if any.
    pub fn lock_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.lock_until.filter(|until| *until > now).map(|until| until - now)
    }

    /// Observe an expired lock on a new attempt: reset the counter and
    /// clear the lock before the password is consulted.
    pub fn clear_expired_lock(&mut self, now: DateTime<Utc>) {
        if self.lock_until.is_some_and(|until| until <= now) {
            self.lock_until = None;
            self.login_attempts = 0;
        }
    }

    /// Count a password mismatch, locking once the threshold is reached.
    pub fn record_failed_attempt(
        &mut self,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> LockoutDecision {
        self.login_attempts += 1;

        if self.login_attempts >= policy.max_attempts {
            self.lock_until = Some(now + policy.lock_duration);
            LockoutDecision::Locked {
                retry_after: policy.lock_duration,
            }
        } else {
            LockoutDecision::Counted {
                attempts: self.login_attempts,
            }
        }
    }

    /// Count a successful login: counters reset, lock cleared, session
    /// rotated. Returns the fresh session id for token issuance.
    pub fn record_successful_login(&mut self, now: DateTime<Utc>) -> SessionId {
        self.login_attempts = 0;
        self.lock_until = None;
        self.last_login = Some(now);

        let session_id = SessionId::generate();
        self.session_id = Some(session_id.clone());
        session_id
    }

    /// Store a new password hash and rotate the session, invalidating
    /// every outstanding token for this account.
    pub fn apply_password_reset(
        &mut self,
        new_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> SessionId {
        self.password_hash = new_hash;
        self.password_changed_at = Some(now);
        self.login_attempts = 0;
        self.lock_until = None;

        let session_id = SessionId::generate();
        self.session_id = Some(session_id.clone());
        session_id
    }

    /// Explicit logout: drop the active session.
    pub fn clear_session(&mut self) {
        self.session_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_account() -> Account {
        let email = Email::try_from(Secret::from("a@x.com".to_string())).unwrap();
        let hash = PasswordHash::new(Secret::from("$argon2id$stub".to_string()));
        Account::new(email, "A. Shopper".to_string(), hash, Role::User)
    }

    fn strict_policy() -> LockoutPolicy {
        LockoutPolicy::default()
    }

    #[test]
    fn test_new_account_starts_unlocked() {
        let account = test_account();
        assert_eq!(account.login_attempts(), 0);
        assert!(account.lock_until().is_none());
        assert!(account.session_id().is_none());
    }

    #[test]
    fn test_third_failure_locks() {
        let mut account = test_account();
        let policy = strict_policy();
        let now = Utc::now();

        assert_eq!(
            account.record_failed_attempt(&policy, now),
            LockoutDecision::Counted { attempts: 1 }
        );
        assert_eq!(
            account.record_failed_attempt(&policy, now),
            LockoutDecision::Counted { attempts: 2 }
        );
        assert!(matches!(
            account.record_failed_attempt(&policy, now),
            LockoutDecision::Locked { .. }
        ));
        assert_eq!(account.lock_until(), Some(now + policy.lock_duration));
    }

    #[test]
    fn test_active_lock_reports_remaining_time() {
        let mut account = test_account();
        let policy = strict_policy();
        let now = Utc::now();

        for _ in 0..3 {
            account.record_failed_attempt(&policy, now);
        }

        let remaining = account.lock_remaining(now + Duration::minutes(10)).unwrap();
        assert_eq!(remaining, Duration::minutes(20));
        assert!(account.lock_remaining(now + Duration::minutes(31)).is_none());
    }

    #[test]
    fn test_expired_lock_clears_on_next_attempt() {
        let mut account = test_account();
        let policy = strict_policy();
        let now = Utc::now();

        for _ in 0..3 {
            account.record_failed_attempt(&policy, now);
        }

        let later = now + policy.lock_duration + Duration::seconds(1);
        account.clear_expired_lock(later);
        assert_eq!(account.login_attempts(), 0);
        assert!(account.lock_until().is_none());
    }

    #[test]
    fn test_successful_login_resets_state_and_rotates_session() {
        let mut account = test_account();
        let policy = strict_policy();
        let now = Utc::now();

        account.record_failed_attempt(&policy, now);
        account.record_failed_attempt(&policy, now);

        let first = account.record_successful_login(now);
        assert_eq!(account.login_attempts(), 0);
        assert_eq!(account.last_login(), Some(now));
        assert_eq!(account.session_id(), Some(&first));

        let second = account.record_successful_login(now);
        assert_ne!(first, second);
    }

    #[test]
    fn test_password_reset_rotates_session_and_stamps_time() {
        let mut account = test_account();
        let now = Utc::now();
        let before = account.record_successful_login(now);

        let new_hash = PasswordHash::new(Secret::from("$argon2id$other".to_string()));
        let after = account.apply_password_reset(new_hash, now);

        assert_ne!(before, after);
        assert_eq!(account.password_changed_at(), Some(now));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut account = test_account();
        account.record_successful_login(Utc::now());
        account.clear_session();
        assert!(account.session_id().is_none());
    }
}
