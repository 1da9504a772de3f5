//! 日志与追踪系统
//! 初始化结构化日志, 并记录进程启动时间供健康检查上报

use crate::config::AppConfig;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static APP_START_TIME: OnceCell<DateTime<Utc>> = OnceCell::new();

/// 记录进程启动时间, 只在 main 里调用一次, 重复调用会被忽略
pub fn mark_app_start() {
    let _ = APP_START_TIME.set(Utc::now());
}

/// 进程已运行秒数
pub fn uptime_secs() -> i64 {
    APP_START_TIME
        .get()
        .map(|start| (Utc::now() - *start).num_seconds())
        .unwrap_or(0)
}

/// 初始化全局日志订阅器
///
/// RUST_LOG 存在时优先生效, 否则退回配置里的 logging.level
pub fn init_telemetry(config: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // json 输出给采集器, pretty 留给本地终端
    let log_layer = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .boxed(),
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        "Telemetry initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_zero_before_start_is_marked() {
        // APP_START_TIME 可能已被其他测试设置, 这里只验证不会 panic
        let secs = uptime_secs();
        assert!(secs >= 0);
    }

    #[test]
    fn marking_start_twice_keeps_first_value() {
        mark_app_start();
        let first = *APP_START_TIME.get().expect("start time set");
        mark_app_start();
        assert_eq!(first, *APP_START_TIME.get().expect("start time set"));
    }
}
