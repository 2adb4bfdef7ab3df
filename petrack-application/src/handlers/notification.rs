//! 通知处理器
//!
//! 站内通知覆盖宠物事件与用户创建；邮件只发送宠物创建、所有权变更与欢迎邮件；
//! 推送只针对宠物创建与所有权变更。发送失败向总线返回错误。
//!
use crate::notification::{Notification, NotificationChannel, Notifier};
use async_trait::async_trait;
use petrack_domain::domain_event::DomainEvent;
use petrack_domain::eventing::EventHandler;
use petrack_domain::events::PetrackEvent;
use std::sync::Arc;

fn notification(
    channel: NotificationChannel,
    event: &PetrackEvent,
    recipient: impl Into<String>,
    message: String,
) -> Notification {
    Notification {
        channel,
        event_id: event.event_id(),
        recipient: recipient.into(),
        message,
    }
}

/// 站内通知
pub struct NotificationEventHandler {
    notifier: Arc<dyn Notifier>,
}

impl NotificationEventHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl EventHandler<PetrackEvent> for NotificationEventHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        let channel = NotificationChannel::InApp;
        let note = match event {
            PetrackEvent::PetCreated {
                pet_id, owner_id, ..
            } => notification(
                channel,
                event,
                owner_id.as_str(),
                format!("Pet {pet_id} created for owner {owner_id}"),
            ),
            PetrackEvent::PetOwnershipChanged {
                pet_id,
                new_owner_id,
                ..
            } => notification(
                channel,
                event,
                new_owner_id.as_str(),
                format!("Pet {pet_id} ownership changed"),
            ),
            PetrackEvent::PetMorphologyUpdated {
                pet_id, owner_id, ..
            } => notification(
                channel,
                event,
                owner_id.as_str(),
                format!("Pet {pet_id} morphology updated"),
            ),
            PetrackEvent::PetDeleted {
                pet_id, owner_id, ..
            } => notification(
                channel,
                event,
                owner_id.as_str(),
                format!("Pet {pet_id} deleted"),
            ),
            PetrackEvent::UserCreated {
                user_id, username, ..
            } => notification(
                channel,
                event,
                user_id.as_str(),
                format!("User {username} created"),
            ),
            _ => return Ok(()),
        };
        self.notifier.send(note).await?;
        Ok(())
    }
}

/// 邮件通知
pub struct EmailNotificationHandler {
    notifier: Arc<dyn Notifier>,
}

impl EmailNotificationHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl EventHandler<PetrackEvent> for EmailNotificationHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        let channel = NotificationChannel::Email;
        let notes = match event {
            PetrackEvent::PetCreated {
                pet_id, owner_id, ..
            } => vec![notification(
                channel,
                event,
                owner_id.as_str(),
                format!("Pet creation email for {pet_id}"),
            )],
            // 原主人与新主人各一封
            PetrackEvent::PetOwnershipChanged {
                pet_id,
                old_owner_id,
                new_owner_id,
                ..
            } => vec![
                notification(
                    channel,
                    event,
                    old_owner_id.as_str(),
                    format!("Ownership change email for {pet_id}"),
                ),
                notification(
                    channel,
                    event,
                    new_owner_id.as_str(),
                    format!("Ownership change email for {pet_id}"),
                ),
            ],
            PetrackEvent::UserCreated {
                username, email, ..
            } => vec![notification(
                channel,
                event,
                email.as_str(),
                format!("Welcome email to {username}"),
            )],
            _ => return Ok(()),
        };
        for note in notes {
            self.notifier.send(note).await?;
        }
        Ok(())
    }
}

/// 推送通知
pub struct PushNotificationHandler {
    notifier: Arc<dyn Notifier>,
}

impl PushNotificationHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl EventHandler<PetrackEvent> for PushNotificationHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        let channel = NotificationChannel::Push;
        let note = match event {
            PetrackEvent::PetCreated {
                pet_id, owner_id, ..
            } => notification(
                channel,
                event,
                owner_id.as_str(),
                format!("Pet creation push for {pet_id}"),
            ),
            PetrackEvent::PetOwnershipChanged {
                pet_id,
                new_owner_id,
                ..
            } => notification(
                channel,
                event,
                new_owner_id.as_str(),
                format!("Ownership change push for {pet_id}"),
            ),
            _ => return Ok(()),
        };
        self.notifier.send(note).await?;
        Ok(())
    }
}
