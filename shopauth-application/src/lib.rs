pub mod use_cases;

pub use use_cases::{
    complete_password_reset::{CompletePasswordResetUseCase, CompleteResetError},
    login::{LoginError, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    register::{RegisterError, RegisterUseCase},
    request_password_reset::{RequestPasswordResetUseCase, RequestResetError},
    verify_session::{VerifySessionError, VerifySessionUseCase},
};

#[cfg(test)]
pub(crate) mod test_support;
