//! 审计处理器
//!
//! - `AuditEventHandler`：任意事件，公共字段加上各事件的标识字段与动作
//! - `PetAuditEventHandler`：仅宠物事件，动作与说明文字
//! - `UserAuditEventHandler`：仅用户创建
//!
use crate::audit::{AuditChannel, AuditLog, AuditRecord};
use async_trait::async_trait;
use petrack_domain::domain_event::DomainEvent;
use petrack_domain::eventing::EventHandler;
use petrack_domain::events::PetrackEvent;
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct AuditEventHandler {
    log: Arc<dyn AuditLog>,
}

impl AuditEventHandler {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler<PetrackEvent> for AuditEventHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        let mut fields = Map::new();
        let action = generic_fields(event, &mut fields);
        let record = audit_record(event, AuditChannel::AuditEvent, action, fields, None);
        self.log.record(record).await?;
        Ok(())
    }
}

pub struct PetAuditEventHandler {
    log: Arc<dyn AuditLog>,
}

impl PetAuditEventHandler {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler<PetrackEvent> for PetAuditEventHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        let (pet_id, action, details) = match event {
            PetrackEvent::PetCreated {
                pet_id,
                owner_id,
                breed_id,
                ..
            } => (
                pet_id,
                "CREATE",
                format!("Pet created for owner {owner_id} with breed {breed_id}"),
            ),
            PetrackEvent::PetOwnershipChanged {
                pet_id,
                old_owner_id,
                new_owner_id,
                ..
            } => (
                pet_id,
                "OWNERSHIP_CHANGE",
                format!("Ownership changed from {old_owner_id} to {new_owner_id}"),
            ),
            PetrackEvent::PetMorphologyUpdated {
                pet_id,
                old_morphology_id,
                new_morphology_id,
                ..
            } => (
                pet_id,
                "MORPHOLOGY_UPDATE",
                format!(
                    "Morphology changed from {} to {}",
                    display_opt(old_morphology_id.as_ref().map(|m| m.as_str())),
                    display_opt(new_morphology_id.as_ref().map(|m| m.as_str()))
                ),
            ),
            PetrackEvent::PetDeleted {
                pet_id, owner_id, ..
            } => (pet_id, "DELETE", format!("Pet deleted by owner {owner_id}")),
            _ => return Ok(()),
        };

        let mut fields = Map::new();
        fields.insert("pet_id".into(), pet_id.as_str().into());
        let record = audit_record(event, AuditChannel::PetAudit, action, fields, Some(details));
        self.log.record(record).await?;
        Ok(())
    }
}

pub struct UserAuditEventHandler {
    log: Arc<dyn AuditLog>,
}

impl UserAuditEventHandler {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler<PetrackEvent> for UserAuditEventHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        let PetrackEvent::UserCreated {
            username, email, ..
        } = event
        else {
            return Ok(());
        };

        let mut fields = Map::new();
        fields.insert("username".into(), username.as_str().into());
        fields.insert("email".into(), email.as_str().into());
        let details = format!("User account created for {username}");
        let record = audit_record(event, AuditChannel::UserAudit, "CREATE", fields, Some(details));
        self.log.record(record).await?;
        Ok(())
    }
}

fn audit_record(
    event: &PetrackEvent,
    channel: AuditChannel,
    action: &str,
    fields: Map<String, Value>,
    details: Option<String>,
) -> AuditRecord {
    AuditRecord::builder()
        .channel(channel)
        .action(action)
        .event_type(event.event_type())
        .event_id(event.event_id())
        .occurred_at(*event.occurred_at())
        .schema_version(event.schema_version())
        .fields(fields)
        .maybe_details(details)
        .build()
}

// 各事件的标识字段，返回审计动作
fn generic_fields(event: &PetrackEvent, fields: &mut Map<String, Value>) -> &'static str {
    let mut put = |key: &str, value: Value| {
        fields.insert(key.to_string(), value);
    };
    match event {
        PetrackEvent::PetCreated {
            pet_id,
            owner_id,
            breed_id,
            ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("owner_id", owner_id.as_str().into());
            put("breed_id", breed_id.as_str().into());
            "pet_created"
        }
        PetrackEvent::PetOwnershipChanged {
            pet_id,
            old_owner_id,
            new_owner_id,
            ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("old_owner_id", old_owner_id.as_str().into());
            put("new_owner_id", new_owner_id.as_str().into());
            "pet_ownership_changed"
        }
        PetrackEvent::PetMorphologyUpdated {
            pet_id,
            owner_id,
            old_morphology_id,
            new_morphology_id,
            ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("owner_id", owner_id.as_str().into());
            put(
                "old_morphology_id",
                old_morphology_id.as_ref().map(|m| m.as_str()).into(),
            );
            put(
                "new_morphology_id",
                new_morphology_id.as_ref().map(|m| m.as_str()).into(),
            );
            "pet_morphology_updated"
        }
        PetrackEvent::PetDeleted {
            pet_id, owner_id, ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("owner_id", owner_id.as_str().into());
            "pet_deleted"
        }
        PetrackEvent::UserCreated {
            user_id,
            username,
            email,
            ..
        } => {
            put("user_id", user_id.as_str().into());
            put("username", username.as_str().into());
            put("email", email.as_str().into());
            "user_created"
        }
        PetrackEvent::UserUpdated {
            user_id,
            updated_fields,
            ..
        } => {
            put("user_id", user_id.as_str().into());
            put("updated_fields", updated_fields.clone().into());
            "user_updated"
        }
        PetrackEvent::UserDeleted {
            user_id, username, ..
        } => {
            put("user_id", user_id.as_str().into());
            put("username", username.as_str().into());
            "user_deleted"
        }
        PetrackEvent::UserPasswordChanged { user_id, .. } => {
            put("user_id", user_id.as_str().into());
            "user_password_changed"
        }
        PetrackEvent::PetRecordCreated {
            pet_id,
            record_type,
            ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("record_type", record_type_value(record_type));
            "pet_record_created"
        }
        PetrackEvent::PetRecordUpdated {
            pet_id,
            record_type,
            updated_fields,
            ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("record_type", record_type_value(record_type));
            put("updated_fields", updated_fields.clone().into());
            "pet_record_updated"
        }
        PetrackEvent::PetRecordDeleted {
            pet_id,
            record_type,
            ..
        } => {
            put("pet_id", pet_id.as_str().into());
            put("record_type", record_type_value(record_type));
            "pet_record_deleted"
        }
    }
}

fn record_type_value(record_type: &petrack_domain::model::PetRecordType) -> Value {
    serde_json::to_value(record_type).unwrap_or(Value::Null)
}

fn display_opt(value: Option<&str>) -> &str {
    value.unwrap_or("none")
}
