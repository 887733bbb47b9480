//! 账户管理的 HTTP 处理器
//! 注册、个人资料、修改密码、软停用

use crate::{
    auth::cookie::{expired_cookie, ACCESS_COOKIE, REFRESH_COOKIE},
    auth::middleware::AuthContext,
    auth::password::PasswordHasher,
    error::AppError,
    middleware::AppState,
    models::user::*,
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 注册新用户
/// 密码与确认密码不一致时，在创建任何用户记录之前拒绝
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    // 两次输入的密码必须一致，先于一切数据库操作检查
    if req.password != req.re_password {
        return Err(AppError::validation("Passwords must match"));
    }

    // 验证密码策略
    PasswordHasher::validate_password_policy(&req.password, &state.config)?;

    let repo = crate::repository::UserRepository::new(state.db.clone());

    // 邮箱是身份键，必须唯一
    if repo.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::validation("A user with this email already exists"));
    }

    // 哈希密码
    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(&req.password)?;

    let user = repo.create(&req, &password_hash).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": UserResponse::from(user)
        })),
    ))
}

/// 更新个人资料
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = crate::repository::UserRepository::new(state.db.clone());
    let user = repo
        .update_profile(auth_context.user_id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": UserResponse::from(user)
    })))
}

/// 修改密码
pub async fn set_password(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.new_password != req.re_new_password {
        return Err(AppError::validation("Passwords must match"));
    }

    let repo = crate::repository::UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&auth_context.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let hasher = PasswordHasher::new();
    hasher.verify(&req.current_password, &user.password_hash)?;

    // 验证新密码策略
    PasswordHasher::validate_password_policy(&req.new_password, &state.config)?;

    let new_password_hash = hasher.hash(&req.new_password)?;
    repo.update_password(auth_context.user_id, &new_password_hash).await?;

    Ok(Json(json!({
        "message": "Password changed successfully"
    })))
}

/// 软停用当前账户并清除会话 Cookie
/// 正常流程不做物理删除；停用后令牌在目录解析阶段即失效
pub async fn deactivate_account(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Response, AppError> {
    let repo = crate::repository::UserRepository::new(state.db.clone());
    repo.deactivate(auth_context.user_id).await?;

    tracing::info!(user_id = %auth_context.user_id, "Account deactivated");

    let mut response = Json(json!({
        "message": "Account deactivated"
    }))
    .into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, expired_cookie(ACCESS_COOKIE)?);
    response
        .headers_mut()
        .append(SET_COOKIE, expired_cookie(REFRESH_COOKIE)?);

    Ok(response)
}
