//! 启动时的处理器注册
//!
//! 重复调用而不先清空总线会产生重复订阅（每个事件重复投递）。
//!
use crate::audit::{AuditLog, TracingAuditLog};
use crate::handlers::{
    AuditEventHandler, EmailNotificationHandler, NotificationEventHandler, PetAuditEventHandler,
    PetCreatedHandler, PetDeletedHandler, PetMorphologyUpdatedHandler,
    PetOwnershipChangedHandler, PetRecordCreatedHandler, PushNotificationHandler,
    UserAuditEventHandler, UserCreatedHandler, UserUpdatedHandler,
};
use crate::notification::{Notifier, TracingNotifier};
use petrack_domain::eventing::{EventBus, EventHandler};
use petrack_domain::events::{PetrackEvent, PetrackEventKind};
use std::sync::Arc;
use tracing::info;

use PetrackEventKind::*;

const PET_KINDS: [PetrackEventKind; 4] = [
    PetCreated,
    PetOwnershipChanged,
    PetMorphologyUpdated,
    PetDeleted,
];

/// 处理器依赖的端口
#[derive(Clone)]
pub struct HandlerDeps {
    pub audit_log: Arc<dyn AuditLog>,
    pub notifier: Arc<dyn Notifier>,
}

impl HandlerDeps {
    pub fn new(audit_log: Arc<dyn AuditLog>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            audit_log,
            notifier,
        }
    }
}

impl Default for HandlerDeps {
    fn default() -> Self {
        Self::new(Arc::new(TracingAuditLog), Arc::new(TracingNotifier))
    }
}

/// 注册全部处理器，顺序：领域处理器、通用审计、专用审计、站内通知、邮件、推送
pub fn register_all_event_handlers(bus: &EventBus<PetrackEvent>, deps: &HandlerDeps) {
    register_pet_event_handlers(bus);
    register_user_event_handlers(bus);
    register_pet_record_event_handlers(bus);

    let audit: Arc<dyn EventHandler<PetrackEvent>> =
        Arc::new(AuditEventHandler::new(Arc::clone(&deps.audit_log)));
    bus.subscribe_many(PET_KINDS.into_iter().chain([UserCreated]), audit);

    let pet_audit: Arc<dyn EventHandler<PetrackEvent>> =
        Arc::new(PetAuditEventHandler::new(Arc::clone(&deps.audit_log)));
    bus.subscribe_many(PET_KINDS, pet_audit);
    bus.subscribe(
        UserCreated,
        Arc::new(UserAuditEventHandler::new(Arc::clone(&deps.audit_log))),
    );

    let in_app: Arc<dyn EventHandler<PetrackEvent>> =
        Arc::new(NotificationEventHandler::new(Arc::clone(&deps.notifier)));
    bus.subscribe_many(PET_KINDS.into_iter().chain([UserCreated]), in_app);

    let email: Arc<dyn EventHandler<PetrackEvent>> =
        Arc::new(EmailNotificationHandler::new(Arc::clone(&deps.notifier)));
    bus.subscribe_many([PetCreated, PetOwnershipChanged, UserCreated], email);

    let push: Arc<dyn EventHandler<PetrackEvent>> =
        Arc::new(PushNotificationHandler::new(Arc::clone(&deps.notifier)));
    bus.subscribe_many([PetCreated, PetOwnershipChanged], push);

    info!(
        handlers = bus.total_handler_count(),
        "registered domain event handlers"
    );
}

pub fn register_pet_event_handlers(bus: &EventBus<PetrackEvent>) {
    bus.subscribe(PetCreated, Arc::new(PetCreatedHandler));
    bus.subscribe(PetOwnershipChanged, Arc::new(PetOwnershipChangedHandler));
    bus.subscribe(PetMorphologyUpdated, Arc::new(PetMorphologyUpdatedHandler));
    bus.subscribe(PetDeleted, Arc::new(PetDeletedHandler));
}

pub fn register_user_event_handlers(bus: &EventBus<PetrackEvent>) {
    bus.subscribe(UserCreated, Arc::new(UserCreatedHandler));
    bus.subscribe(UserUpdated, Arc::new(UserUpdatedHandler));
}

pub fn register_pet_record_event_handlers(bus: &EventBus<PetrackEvent>) {
    bus.subscribe(PetRecordCreated, Arc::new(PetRecordCreatedHandler));
}
