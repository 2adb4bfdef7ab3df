//! 运行配置
//!
//! 目前只有日志相关配置，读取 `ENVIRONMENT` 与 `LOG_LEVEL` 环境变量。
//!
use crate::error::{AppError, AppResult};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 部署环境：开发环境输出彩色文本日志，其余输出 JSON
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::Config(format!("unknown environment: {other}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[builder(default)]
    pub environment: Environment,
    /// `EnvFilter` 指令，如 `info` 或 `petrack_domain=debug,info`
    #[builder(into, default = "info".to_string())]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取，缺失的键取默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let environment = match lookup("ENVIRONMENT") {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };
        let level = lookup("LOG_LEVEL")
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "info".to_string());

        Ok(Self { environment, level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_development_info() {
        let cfg = LogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, LogConfig::default());
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.level, "info");
    }

    #[test]
    fn reads_environment_and_level() {
        let cfg = LogConfig::from_lookup(lookup(&[
            ("ENVIRONMENT", "Production"),
            ("LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.level, "debug");
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = LogConfig::from_lookup(lookup(&[("ENVIRONMENT", "staging")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn builder_overrides() {
        let cfg = LogConfig::builder()
            .environment(Environment::Test)
            .level("warn")
            .build();
        assert_eq!(cfg.environment.to_string(), "test");
        assert_eq!(cfg.level, "warn");
    }
}
