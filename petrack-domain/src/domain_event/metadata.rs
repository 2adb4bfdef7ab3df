use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 事件元数据：标识、发生时间与 schema 版本，构造后不可变
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[builder(default = Uuid::new_v4())]
    event_id: Uuid,
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    #[builder(default = 1)]
    schema_version: u32,
}

impl EventMetadata {
    /// 以新的事件 ID 与当前时间创建元数据
    pub fn new(schema_version: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            schema_version,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new(1)
    }
}
