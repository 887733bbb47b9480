//! 会话 Cookie 契约
//! 两个 HttpOnly Cookie 分别承载访问令牌和刷新令牌，页面脚本不可读取

use crate::error::AppError;
use axum::http::{HeaderMap, HeaderValue};

/// 访问令牌 Cookie 名
pub const ACCESS_COOKIE: &str = "accessToken";
/// 刷新令牌 Cookie 名
pub const REFRESH_COOKIE: &str = "refreshToken";

/// 从 Cookie 请求头中按名字取值
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let mut parts = pair.trim().splitn(2, '=');
                let key = parts.next()?.trim();
                let value = parts.next()?.trim();
                if key == name {
                    Some(value.to_string())
                } else {
                    None
                }
            })
        })
}

/// 构造会话 Cookie
/// HttpOnly + SameSite=Lax + Path=/；Secure 由配置决定（开发环境默认关闭）
pub fn session_cookie(
    name: &str,
    value: &str,
    max_age_secs: u64,
    secure: bool,
) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        name, value, max_age_secs
    );

    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid cookie value: {}", e)))
}

/// 构造删除 Cookie（Max-Age=0，值置空）
pub fn expired_cookie(name: &str) -> Result<HeaderValue, AppError> {
    session_cookie(name, "", 0, false)
}
