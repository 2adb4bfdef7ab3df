//! 领域事件处理器
//!
//! - `domain`：各事件的领域处理器（结构化日志）
//! - `audit`：写入审计日志
//! - `notification`：站内、邮件与推送通知
//!
pub mod audit;
pub mod domain;
pub mod notification;

pub use audit::{AuditEventHandler, PetAuditEventHandler, UserAuditEventHandler};
pub use domain::{
    PetCreatedHandler, PetDeletedHandler, PetMorphologyUpdatedHandler,
    PetOwnershipChangedHandler, PetRecordCreatedHandler, UserCreatedHandler, UserUpdatedHandler,
};
pub use notification::{
    EmailNotificationHandler, NotificationEventHandler, PushNotificationHandler,
};
