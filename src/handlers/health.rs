//! 健康检查处理器

use crate::{db, middleware::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use once_cell::sync::OnceCell;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

static START_TIME: OnceCell<Instant> = OnceCell::new();

/// 记录进程启动时间，在 main 中调用一次
pub fn set_start_time() {
    let _ = START_TIME.set(Instant::now());
}

/// 获取进程运行时长（秒）
pub fn get_uptime() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// 存活检查
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": get_uptime()
    }))
}

/// 就绪检查（含数据库探活）
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    db::record_pool_metrics(&state.db);

    match db::ping(&state.db).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ready"}))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "not ready", "reason": e.to_string()})),
            )
                .into_response()
        }
    }
}
