//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查与指标）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics_export));

    // 会话端点与注册：不经过 Cookie 认证中间件
    // 登录/刷新请求可能带着过期的 accessToken Cookie 到达，不应被拒绝
    let session_routes = Router::new()
        .route("/api/auth/jwt/create/", post(handlers::auth::login))
        .route("/api/auth/jwt/refresh/", post(handlers::auth::refresh))
        .route("/api/auth/users/", post(handlers::user::register));

    // 其余 API 全部经过 Cookie 认证中间件：
    // 无 Cookie 按匿名放行（GET 仍可访问），带无效 Cookie 直接 401
    let api_routes = Router::new()
        // 会话与账户
        .route("/api/auth/logout/", post(handlers::auth::logout))
        .route(
            "/api/auth/users/me/",
            get(handlers::auth::get_current_user)
                .put(handlers::user::update_profile)
                .delete(handlers::user::deactivate_account),
        )
        .route("/api/auth/users/set_password/", post(handlers::user::set_password))
        // 院系
        .route(
            "/api/academic/departments/",
            get(handlers::department::list_departments)
                .post(handlers::department::create_department),
        )
        .route(
            "/api/academic/departments/{id}/",
            get(handlers::department::get_department)
                .put(handlers::department::update_department)
                .delete(handlers::department::delete_department),
        )
        .route("/api/academic/faculty-choices/", get(handlers::department::faculty_choices))
        // 课程
        .route(
            "/api/courses/courses/",
            get(handlers::course::list_courses).post(handlers::course::create_course),
        )
        .route(
            "/api/courses/courses/{id}/",
            get(handlers::course::get_course)
                .put(handlers::course::update_course)
                .delete(handlers::course::delete_course),
        )
        .route("/api/courses/choices/", get(handlers::course::course_choices))
        // 教学大纲
        .route(
            "/api/courses/syllabi/",
            get(handlers::syllabus::list_syllabi).post(handlers::syllabus::create_syllabus),
        )
        .route(
            "/api/courses/syllabi/{id}/",
            get(handlers::syllabus::get_syllabus)
                .put(handlers::syllabus::update_syllabus)
                .delete(handlers::syllabus::delete_syllabus),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::cookie_auth_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(api_routes)
        .layer(cors_layer(&state))
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(state.config.server.body_limit_bytes))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 构建 CORS 层
/// 会话基于 Cookie，必须允许携带凭证，因此不能使用通配来源
fn cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}
