//! 认证 API 集成测试
//!
//! 覆盖基于 Cookie 的会话全流程：登录、刷新、登出、注册

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

mod common;
use common::{
    cookie_value, create_test_app_state, create_test_user, deactivate_test_user, set_cookies,
    setup_test_db, TEST_JWT_SECRET,
};

/// 登录并返回响应（调用方自行检查状态码和 Cookie）
async fn do_login(
    app: axum::Router,
    email: &str,
    password: &str,
) -> axum::response::Response {
    let request_body = json!({
        "email": email,
        "password": password
    });

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/jwt/create/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(request_body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// 带会话 Cookie 调用改密端点
async fn set_password(
    app: &axum::Router,
    access_token: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/users/set_password/")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, format!("accessToken={}", access_token))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// 签发一个已过期的访问令牌（与测试密钥同源）
fn make_expired_access_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = catalog_system::auth::jwt::Claims {
        sub: "test@example.com".to_string(),
        token_type: "access".to_string(),
        iat: now - 3600,
        exp: now - 60,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
#[serial]
async fn test_login_sets_session_cookies() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "test@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = do_login(app, email, password).await;

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2, "Login should set exactly two cookies");

    // 两个会话 Cookie 都必须存在且非空
    let access = cookie_value(&cookies, "accessToken").expect("accessToken cookie missing");
    let refresh = cookie_value(&cookies, "refreshToken").expect("refreshToken cookie missing");
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);

    // Cookie 属性：HttpOnly + SameSite=Lax + 各自的 Max-Age
    for cookie in &cookies {
        assert!(cookie.contains("HttpOnly"), "cookie not HttpOnly: {}", cookie);
        assert!(cookie.contains("SameSite=Lax"), "cookie not SameSite=Lax: {}", cookie);
        assert!(cookie.contains("Path=/"), "cookie missing Path: {}", cookie);
    }
    let access_cookie = cookies.iter().find(|c| c.starts_with("accessToken=")).unwrap();
    let refresh_cookie = cookies.iter().find(|c| c.starts_with("refreshToken=")).unwrap();
    assert!(access_cookie.contains("Max-Age=3600"));
    assert!(refresh_cookie.contains("Max-Age=86400"));

    // 响应体只有确认消息，令牌绝不出现在响应体中
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"message": "Login successful"}));
}

#[tokio::test]
#[serial]
async fn test_login_wrong_password() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "test@example.com";
    create_test_user(&pool, email, "TestPass123")
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = do_login(app, email, "WrongPassword1").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty(), "Failed login must not set cookies");
}

#[tokio::test]
#[serial]
async fn test_login_user_not_found() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = do_login(app, "nobody@example.com", "TestPass123").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_login_inactive_user() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "inactive@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");
    deactivate_test_user(&pool, email).await;

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = do_login(app, email, password).await;

    // 停用用户即使密码正确也拒绝登录
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_refresh_without_cookie() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/jwt/refresh/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // 缺失刷新 Cookie 是 400 而不是 401
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "No refresh token provided"}));
}

#[tokio::test]
#[serial]
async fn test_refresh_issues_new_access_cookie() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "test@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let login_response = do_login(app.clone(), email, password).await;
    let login_cookies = set_cookies(&login_response);
    let refresh_token = cookie_value(&login_cookies, "refreshToken").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/jwt/refresh/")
                .header(header::COOKIE, format!("refreshToken={}", refresh_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // 只换发 accessToken，refreshToken 不轮换、不重新下发
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    let new_access = cookie_value(&cookies, "accessToken").expect("accessToken cookie missing");
    assert!(!new_access.is_empty());
    assert!(cookie_value(&cookies, "refreshToken").is_none());

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"message": "Token refreshed"}));
}

#[tokio::test]
#[serial]
async fn test_refresh_with_invalid_token() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/jwt/refresh/")
                .header(header::COOKIE, "refreshToken=not-a-valid-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_refresh_rejects_access_token_in_refresh_cookie() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "test@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let login_response = do_login(app.clone(), email, password).await;
    let login_cookies = set_cookies(&login_response);
    let access_token = cookie_value(&login_cookies, "accessToken").unwrap();

    // 把访问令牌塞进刷新 Cookie，必须被令牌类型检查拒绝
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/jwt/refresh/")
                .header(header::COOKIE, format!("refreshToken={}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_logout_clears_cookies() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "test@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let login_response = do_login(app.clone(), email, password).await;
    let login_cookies = set_cookies(&login_response);
    let access_token = cookie_value(&login_cookies, "accessToken").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout/")
                .header(header::COOKIE, format!("accessToken={}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // 两个 Cookie 都被置空并立即过期
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    for cookie in &cookies {
        assert!(cookie.contains("Max-Age=0"), "cookie not expired: {}", cookie);
    }
    assert_eq!(cookie_value(&cookies, "accessToken").as_deref(), Some(""));
    assert_eq!(cookie_value(&cookies, "refreshToken").as_deref(), Some(""));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"message": "Logout successful"}));
}

#[tokio::test]
#[serial]
async fn test_logout_without_session() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_expired_access_cookie_is_rejected() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "test@example.com", "TestPass123")
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let expired = make_expired_access_token();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/users/me/")
                .header(header::COOKIE, format!("accessToken={}", expired))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid token"), "unexpected message: {}", message);
}

#[tokio::test]
#[serial]
async fn test_invalid_cookie_rejected_even_on_readable_route() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    // 院系列表匿名可读，但带着坏 Cookie 的请求仍然硬失败
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/academic/departments/")
                .header(header::COOKIE, "accessToken=garbage-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_anonymous_read_without_cookie() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    // 无 Cookie 按匿名放行，GET 正常返回
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/academic/departments/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_get_current_user() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "test@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let login_response = do_login(app.clone(), email, password).await;
    let login_cookies = set_cookies(&login_response);
    let access_token = cookie_value(&login_cookies, "accessToken").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/users/me/")
                .header(header::COOKIE, format!("accessToken={}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["email"], email);
    // 密码哈希绝不出现在响应中
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[serial]
async fn test_get_current_user_without_cookie() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/users/me/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_register_password_mismatch() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool.clone()).await;
    let app = catalog_system::routes::create_router(state);

    let request_body = json!({
        "email": "new@example.com",
        "first_name": "New",
        "last_name": "User",
        "password": "TestPass123",
        "re_password": "DifferentPass123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/users/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 两次密码不一致时不能创建用户
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("new@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[serial]
async fn test_register_then_login() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let email = "new@example.com";
    let password = "TestPass123";

    let request_body = json!({
        "email": email,
        "first_name": "New",
        "last_name": "User",
        "password": password,
        "re_password": password
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/users/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], email);

    // 新用户立刻可以登录
    let login_response = do_login(app, email, password).await;
    assert_eq!(login_response.status(), StatusCode::OK);
    let cookies = set_cookies(&login_response);
    assert!(cookie_value(&cookies, "accessToken").is_some());
    assert!(cookie_value(&cookies, "refreshToken").is_some());
}

#[tokio::test]
#[serial]
async fn test_valid_token_for_deactivated_user_is_rejected() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "soon-gone@example.com";
    let password = "TestPass123";
    create_test_user(&pool, email, password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool.clone()).await;
    let app = catalog_system::routes::create_router(state);

    let login_response = do_login(app.clone(), email, password).await;
    assert_eq!(login_response.status(), StatusCode::OK);
    let login_cookies = set_cookies(&login_response);
    let access_token = cookie_value(&login_cookies, "accessToken").unwrap();

    // 登录后停用账户，签名仍然有效的令牌也必须被目录解析拒绝
    deactivate_test_user(&pool, email).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/users/me/")
                .header(header::COOKIE, format!("accessToken={}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_set_password_flow() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "rotate@example.com";
    let old_password = "TestPass123";
    let new_password = "FreshPass456";
    create_test_user(&pool, email, old_password)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let login_response = do_login(app.clone(), email, old_password).await;
    let login_cookies = set_cookies(&login_response);
    let access_token = cookie_value(&login_cookies, "accessToken").unwrap();

    // 两次新密码不一致
    let response = set_password(&app, &access_token, json!({
        "current_password": old_password,
        "new_password": new_password,
        "re_new_password": "Mismatch789"
    }))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 当前密码错误
    let response = set_password(&app, &access_token, json!({
        "current_password": "WrongPass123",
        "new_password": new_password,
        "re_new_password": new_password
    }))
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 正常改密
    let response = set_password(&app, &access_token, json!({
        "current_password": old_password,
        "new_password": new_password,
        "re_new_password": new_password
    }))
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"message": "Password changed successfully"}));

    // 旧密码失效，新密码可登录
    let response = do_login(app.clone(), email, old_password).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = do_login(app, email, new_password).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_register_duplicate_email() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let email = "taken@example.com";
    create_test_user(&pool, email, "TestPass123")
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = catalog_system::routes::create_router(state);

    let request_body = json!({
        "email": email,
        "first_name": "Other",
        "last_name": "User",
        "password": "TestPass123",
        "re_password": "TestPass123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/users/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
