/// Default session token lifetime.
pub const SESSION_TOKEN_TTL_SECONDS: i64 = 60 * 60 * 24;

/// Hard ceiling on token age since issuance, enforced independently of
/// the signed `exp` claim.
pub const SESSION_TOKEN_MAX_AGE_SECONDS: i64 = 60 * 60 * 24;

/// Default reset token lifetime.
pub const RESET_TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Cookie carrying the session token when the client is a browser.
pub const SESSION_COOKIE_NAME: &str = "accessToken";

// Argon2id cost parameters. Verification cost scales with these, so
// they live here rather than inline at call sites.
pub const ARGON2_MEMORY_KIB: u32 = 15000;
pub const ARGON2_ITERATIONS: u32 = 2;
pub const ARGON2_PARALLELISM: u32 = 1;
