//! Auth service with request DTOs.

pub mod dto;
pub mod service;

pub use dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};
pub use service::AuthService;
