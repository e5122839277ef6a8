use chrono::Duration;

/// Failed attempts allowed before an account locks.
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// How long a locked account refuses logins, in minutes.
pub const LOCK_DURATION_MINUTES: i64 = 30;

/// Failed-attempt threshold and lock window for the lockout state machine.
///
/// Injected rather than read from constants at the point of use so tests
/// can shrink the window to milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_LOGIN_ATTEMPTS,
            lock_duration: Duration::minutes(LOCK_DURATION_MINUTES),
        }
    }
}
