//! 会话端点：登录、令牌刷新、登出
//!
//! 令牌只通过 Cookie 下发，响应体永远是通用的确认消息。
//! 这里不继承令牌签发流程，而是先调用签发操作、再单独附加
//! Set-Cookie 响应头（组合而非继承）。

use crate::{
    auth::cookie::{expired_cookie, get_cookie, session_cookie, ACCESS_COOKIE, REFRESH_COOKIE},
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginRequest, MessageResponse},
    models::user::UserResponse,
    repository::UserRepository,
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 登录
/// 成功时设置 accessToken / refreshToken 两个 Cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let (_user, token_pair) = state.auth_service.login(&req).await?;

    let security = &state.config.security;
    let access_cookie = session_cookie(
        ACCESS_COOKIE,
        &token_pair.access_token,
        security.access_cookie_max_age_secs,
        security.cookie_secure,
    )?;
    let refresh_cookie = session_cookie(
        REFRESH_COOKIE,
        &token_pair.refresh_token,
        security.refresh_cookie_max_age_secs,
        security.cookie_secure,
    )?;

    let mut response = Json(MessageResponse::LOGIN).into_response();
    response.headers_mut().append(SET_COOKIE, access_cookie);
    response.headers_mut().append(SET_COOKIE, refresh_cookie);

    Ok(response)
}

/// 刷新访问令牌
/// 只从 Cookie 读取刷新令牌，不接受请求体；刷新令牌本身不轮换
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<Response, AppError> {
    // Cookie 缺失是 400，而不是认证失败：刷新请求本身无需事先认证
    let Some(refresh_token) = get_cookie(&headers, REFRESH_COOKIE) else {
        tracing::debug!("Refresh request without refresh token cookie");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No refresh token provided"})),
        )
            .into_response());
    };

    let access_token = state.auth_service.refresh(&refresh_token)?;

    let security = &state.config.security;
    let access_cookie = session_cookie(
        ACCESS_COOKIE,
        &access_token,
        security.access_cookie_max_age_secs,
        security.cookie_secure,
    )?;

    let mut response = Json(MessageResponse::REFRESH).into_response();
    response.headers_mut().append(SET_COOKIE, access_cookie);

    Ok(response)
}

/// 登出
/// 只是清除客户端 Cookie；服务端不保存令牌状态，已泄露的副本自然过期
pub async fn logout(
    auth_context: AuthContext,
) -> Result<Response, AppError> {
    tracing::info!(user_id = %auth_context.user_id, "Logout");

    let mut response = Json(MessageResponse::LOGOUT).into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, expired_cookie(ACCESS_COOKIE)?);
    response
        .headers_mut()
        .append(SET_COOKIE, expired_cookie(REFRESH_COOKIE)?);

    Ok(response)
}

/// 当前用户信息
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&auth_context.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
