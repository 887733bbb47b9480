//! 认证服务：登录凭证校验与令牌换发

use crate::{
    auth::jwt::{JwtService, TokenPair},
    auth::password::PasswordHasher,
    error::AppError,
    models::{auth::LoginRequest, user::User},
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>) -> Self {
        Self { db, jwt_service }
    }

    /// 用户登录
    /// 校验通过后签发令牌对；令牌只进 Cookie，由 handler 负责下发
    pub async fn login(&self, req: &LoginRequest) -> Result<(User, TokenPair), AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        // 获取用户
        let user: User = user_repo
            .find_by_email(&req.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // 停用账户不允许登录
        if !user.is_active {
            metrics::counter!("auth_login_total", "outcome" => "inactive").increment(1);
            return Err(AppError::Unauthorized);
        }

        // 验证密码
        let hasher = PasswordHasher::new();
        if let Err(e) = hasher.verify(&req.password, &user.password_hash) {
            metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
            tracing::info!(email = %req.email, "Login failed: bad credentials");
            return Err(e);
        }

        // 生成令牌对
        let token_pair = self.jwt_service.generate_token_pair(&user.email)?;

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = %user.id, "Login successful");

        Ok((user, token_pair))
    }

    /// 用刷新令牌换发新的访问令牌
    /// 刷新令牌不轮换；这里也不回查用户目录，与访问令牌的无状态语义一致
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        match self.jwt_service.refresh_access_token(refresh_token) {
            Ok(access_token) => {
                metrics::counter!("auth_token_refresh_total", "outcome" => "success").increment(1);
                Ok(access_token)
            }
            Err(e) => {
                metrics::counter!("auth_token_refresh_total", "outcome" => "failure").increment(1);
                Err(e)
            }
        }
    }
}
