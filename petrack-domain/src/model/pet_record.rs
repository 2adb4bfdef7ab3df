use super::ids::{PetId, PetRecordId, UserId};
use crate::aggregate::AggregateRoot;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::events::PetrackEvent;
use crate::value_object::Version;
use chrono::{DateTime, Utc};
use petrack_macros::{aggregate_root, entity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// 档案类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetRecordType {
    Feeding,
    Weighing,
    Shedding,
    HealthCheck,
    Behavior,
    Environment,
    #[default]
    Other,
}

#[aggregate_root(event = PetrackEvent)]
#[entity(id = PetRecordId)]
#[derive(Clone)]
pub struct PetRecord {
    pet_id: PetId,
    creator_id: UserId,
    record_type: PetRecordType,
    record_data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_deleted: bool,
}

impl PetRecord {
    /// 新建档案，`record_data` 须为 JSON 对象；记录 `PetRecordCreated`
    pub fn create(
        pet_id: PetId,
        creator_id: UserId,
        record_type: PetRecordType,
        record_data: Value,
    ) -> DomainResult<Self> {
        ensure_object(&record_data)?;

        let now = Utc::now();
        let mut record = PetRecord::new(PetRecordId::generate(), Version::new());
        record.pet_id = pet_id;
        record.creator_id = creator_id;
        record.record_type = record_type;
        record.record_data = record_data;
        record.created_at = now;
        record.updated_at = now;

        let event = PetrackEvent::pet_record_created(
            record.pet_id.clone(),
            record.record_type,
            record.record_data.clone(),
        );
        record.append_event(event);
        Ok(record)
    }

    /// 替换档案数据；有键发生变化时记录 `PetRecordUpdated`
    pub fn update(&mut self, record_data: Value) -> DomainResult<()> {
        ensure_object(&record_data)?;

        let updated_fields = changed_keys(&self.record_data, &record_data);
        if updated_fields.is_empty() {
            return Ok(());
        }

        self.record_data = record_data;
        self.touch();
        self.append_event(PetrackEvent::pet_record_updated(
            self.pet_id.clone(),
            self.record_type,
            self.record_data.clone(),
            updated_fields,
        ));
        Ok(())
    }

    /// 标记删除，记录 `PetRecordDeleted`
    pub fn mark_deleted(&mut self) -> DomainResult<()> {
        if self.is_deleted {
            return Err(DomainError::invalid_state(format!(
                "pet record {} is already deleted",
                self.id
            )));
        }
        self.is_deleted = true;
        self.touch();
        self.append_event(PetrackEvent::pet_record_deleted(
            self.pet_id.clone(),
            self.record_type,
            self.record_data.clone(),
        ));
        Ok(())
    }

    pub fn pet_id(&self) -> &PetId {
        &self.pet_id
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn record_type(&self) -> PetRecordType {
        self.record_type
    }

    pub fn record_data(&self) -> &Value {
        &self.record_data
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn ensure_object(data: &Value) -> DomainResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(DomainError::invalid_value("record data must be a JSON object"))
    }
}

// 新增、删除或取值变化的键，按字典序
fn changed_keys(old: &Value, new: &Value) -> Vec<String> {
    let (Some(old), Some(new)) = (old.as_object(), new.as_object()) else {
        return Vec::new();
    };
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    keys.into_iter()
        .filter(|k| old.get(*k) != new.get(*k))
        .cloned()
        .collect()
}
