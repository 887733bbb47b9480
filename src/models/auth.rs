//! Authentication-related models

use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Generic acknowledgment body
/// Session endpoints never echo tokens in the body, only in cookies
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const LOGIN: Self = Self { message: "Login successful" };
    pub const REFRESH: Self = Self { message: "Token refreshed" };
    pub const LOGOUT: Self = Self { message: "Logout successful" };
}
