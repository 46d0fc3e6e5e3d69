use async_trait::async_trait;
use railbook_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::CoreResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: Masked<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: Masked<String>,
    pub user: User,
}

/// Reply to an OTP request. The auth service echoes the code back in test mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpDispatch {
    pub message: String,
    #[serde(default)]
    pub otp: Option<Masked<String>>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpVerification {
    #[serde(default)]
    pub message: Option<String>,
    pub verified: bool,
}

/// Remote authentication service
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> CoreResult<AuthResponse>;

    async fn login(&self, credentials: &Credentials) -> CoreResult<AuthResponse>;

    /// Current user for the session's bearer token
    async fn me(&self) -> CoreResult<User>;

    async fn request_otp(&self, phone: &str) -> CoreResult<OtpDispatch>;

    async fn verify_otp(&self, phone: &str, otp: &str) -> CoreResult<OtpVerification>;
}
