pub mod complete_password_reset;
pub mod login;
pub mod logout;
pub mod register;
pub mod request_password_reset;
pub mod verify_session;
