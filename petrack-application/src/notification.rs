//! 通知与通知端口
//!
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InApp,
    Email,
    Push,
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Push => "push",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub channel: NotificationChannel,
    /// 触发通知的事件
    pub event_id: Uuid,
    pub recipient: String,
    pub message: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> AppResult<()>;
}

/// 内存通知器，可指定某些渠道发送失败
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: Mutex<HashSet<NotificationChannel>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后发往该渠道的通知均返回错误
    pub fn fail_channel(&self, channel: NotificationChannel) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sent_on(&self, channel: NotificationChannel) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|n| n.channel == channel)
            .collect()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send(&self, notification: Notification) -> AppResult<()> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&notification.channel);
        if failing {
            return Err(AppError::Infra(format!(
                "{} channel unavailable",
                notification.channel
            )));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
        Ok(())
    }
}

/// 以日志代替真实发送
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notification: Notification) -> AppResult<()> {
        tracing::info!(
            target: "notification",
            channel = %notification.channel,
            event_id = %notification.event_id,
            recipient = %notification.recipient,
            "{}",
            notification.message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(channel: NotificationChannel) -> Notification {
        Notification {
            channel,
            event_id: Uuid::new_v4(),
            recipient: "owner-1".into(),
            message: "hello".into(),
        }
    }

    #[tokio::test]
    async fn in_memory_notifier_records_and_fails_on_demand() {
        let notifier = InMemoryNotifier::new();
        notifier.send(note(NotificationChannel::Email)).await.unwrap();

        notifier.fail_channel(NotificationChannel::Push);
        let err = notifier
            .send(note(NotificationChannel::Push))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Infra(_)));

        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(notifier.sent_on(NotificationChannel::Email).len(), 1);
        assert!(notifier.sent_on(NotificationChannel::Push).is_empty());
    }
}
