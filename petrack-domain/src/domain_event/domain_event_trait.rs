use super::EventMetadata;
use chrono::{DateTime, Utc};
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// 事件类型判别值：总线注册表的键，按值精确匹配（不考虑任何继承关系）
pub trait EventKind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// 事件类型名称（日志与审计使用）
    fn name(&self) -> &'static str;

    /// 该类型事件的 schema 版本
    fn schema_version(&self) -> u32 {
        1
    }
}

/// 领域事件需要满足的通用能力边界
pub trait DomainEvent: Clone + fmt::Debug + Send + Sync + 'static {
    type Kind: EventKind;

    /// 事件类型判别值
    fn kind(&self) -> Self::Kind;

    /// 事件元数据
    fn metadata(&self) -> &EventMetadata;

    fn event_type(&self) -> &'static str {
        self.kind().name()
    }

    fn event_id(&self) -> Uuid {
        self.metadata().event_id()
    }

    fn occurred_at(&self) -> &DateTime<Utc> {
        self.metadata().occurred_at()
    }

    fn schema_version(&self) -> u32 {
        self.metadata().schema_version()
    }
}
