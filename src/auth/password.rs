//! 密码哈希与策略校验（Argon2id）

use crate::{config::AppConfig, error::AppError};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

/// 密码哈希器
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// 哈希密码（随机盐）
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// 校验密码
    /// 哈希格式无效与密码不匹配统一返回 Unauthorized，不区分原因
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AppError::Unauthorized)?;
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AppError::Unauthorized)
    }

    /// 校验密码策略
    pub fn validate_password_policy(password: &str, config: &AppConfig) -> Result<(), AppError> {
        let policy = &config.security;

        if password.chars().count() < policy.password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters long",
                policy.password_min_length
            )));
        }

        if policy.password_require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::Validation(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if policy.password_require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "Password must contain at least one digit".to_string(),
            ));
        }

        if policy.password_require_special
            && !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            return Err(AppError::Validation(
                "Password must contain at least one special character".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
