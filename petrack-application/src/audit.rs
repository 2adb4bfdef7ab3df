//! 审计记录与审计日志端口
//!
use crate::error::AppResult;
use async_trait::async_trait;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// 审计记录来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditChannel {
    /// 通用审计：所有已订阅事件
    AuditEvent,
    PetAudit,
    UserAudit,
}

impl fmt::Display for AuditChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AuditEvent => "AUDIT_EVENT",
            Self::PetAudit => "PET_AUDIT",
            Self::UserAudit => "USER_AUDIT",
        })
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub channel: AuditChannel,
    #[builder(into)]
    pub action: String,
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub schema_version: u32,
    #[builder(default = Utc::now())]
    pub recorded_at: DateTime<Utc>,
    /// 事件相关字段（宠物/主人/品种等标识）
    #[builder(default)]
    pub fields: Map<String, Value>,
    #[builder(into)]
    pub details: Option<String>,
}

/// 审计日志：审计处理器将记录写入此端口
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, record: AuditRecord) -> AppResult<()>;
}

/// 内存审计日志，测试与示例使用
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn records_for(&self, channel: AuditChannel) -> Vec<AuditRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.channel == channel)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, record: AuditRecord) -> AppResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }
}

/// 以结构化日志输出审计记录
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, record: AuditRecord) -> AppResult<()> {
        let fields = Value::Object(record.fields.clone());
        tracing::info!(
            target: "audit",
            channel = %record.channel,
            action = %record.action,
            event_type = record.event_type,
            event_id = %record.event_id,
            occurred_at = %record.occurred_at.to_rfc3339(),
            fields = %fields,
            details = record.details.as_deref().unwrap_or(""),
            "{}",
            record.channel
        );
        Ok(())
    }
}
