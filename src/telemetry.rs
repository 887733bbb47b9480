//! 日志与指标初始化
//! 根据配置选择 json 或 pretty 格式输出

use crate::config::AppConfig;
use tracing_subscriber::EnvFilter;

/// 初始化日志订阅器
/// RUST_LOG 环境变量优先于配置文件中的日志级别
pub fn init_telemetry(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.logging.format.to_lowercase().as_str() {
        "json" => builder.json().init(),
        _ => builder.pretty().init(),
    }
}

/// 注册指标描述
pub fn init_metrics() {
    metrics::describe_counter!("http_requests_total", "Total HTTP requests handled");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_counter!("auth_login_total", "Login attempts by outcome");
    metrics::describe_counter!("auth_token_refresh_total", "Token refresh attempts by outcome");
    metrics::describe_gauge!("db.pool.size", "Database connection pool size");
    metrics::describe_gauge!("db.pool.idle", "Idle database connections");
}
