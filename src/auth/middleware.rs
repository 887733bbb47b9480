//! 基于 Cookie 的认证中间件
//!
//! 与基于 Authorization 头的方案不同：没有 Cookie 的请求按匿名放行，
//! 带着无效 Cookie 的请求则硬性失败，两种结果严格区分。

use crate::{
    auth::cookie::{get_cookie, ACCESS_COOKIE},
    auth::jwt::{Claims, JwtService, TokenError},
    error::AppError,
    middleware::AppState,
    repository::UserRepository,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
// 匿名请求在这里被拒绝，等价于 IsAuthenticated 权限检查
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Cookie 凭证检查的三种结果
/// Absent 表示匿名（不是错误），Invalid 表示硬性失败
#[derive(Debug)]
pub enum CookieCredential {
    Absent,
    Invalid(TokenError),
    Valid(Claims),
}

/// 检查请求中的 accessToken Cookie
pub fn check_cookie(headers: &HeaderMap, jwt_service: &JwtService) -> CookieCredential {
    let Some(raw_token) = get_cookie(headers, ACCESS_COOKIE) else {
        return CookieCredential::Absent;
    };

    match jwt_service.validate_access_token(&raw_token) {
        Ok(claims) => CookieCredential::Valid(claims),
        Err(e) => CookieCredential::Invalid(e),
    }
}

/// Cookie 认证中间件
///
/// - Cookie 缺失：按匿名放行，后续由 AuthContext 提取器决定是否拒绝
/// - Cookie 存在但校验失败：返回认证错误，携带具体原因，绝不静默降级
/// - 校验通过：用身份声明查用户目录，不存在或已停用同样算认证失败
pub async fn cookie_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match check_cookie(req.headers(), &state.jwt_service) {
        CookieCredential::Absent => {
            return Ok(next.run(req).await);
        }
        CookieCredential::Invalid(e) => {
            tracing::debug!(reason = %e, "Access token cookie rejected");
            return Err(AppError::Authentication(format!("Invalid token: {}", e)));
        }
        CookieCredential::Valid(claims) => claims,
    };

    // 解析身份：用户必须存在且处于激活状态
    let user_repo = UserRepository::new(state.db.clone());
    let user = user_repo
        .find_by_email(&claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::Authentication("Invalid token: user not found or inactive".to_string())
        })?;

    let auth_context = AuthContext {
        user_id: user.id,
        email: user.email,
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
    };

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
