//! 日志初始化
//!
//! 开发环境输出彩色文本，其余环境输出 JSON；`RUST_LOG` 优先于配置中的级别。
//! 可重复调用，之后的调用不生效。
//!
use crate::config::{Environment, LogConfig};
use tracing_subscriber::EnvFilter;

/// 安装全局 subscriber，返回本次调用是否生效
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match config.environment {
        Environment::Development => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(true)
            .try_init(),
        Environment::Test | Environment::Production => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init(),
    };

    result.is_ok()
}
