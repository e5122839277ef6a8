pub mod extract;
pub mod password_hasher;
pub mod reset_token;
pub mod session_token;
