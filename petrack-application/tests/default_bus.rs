//! 默认总线是进程级状态，单独成一个测试二进制并在同一个测试中按顺序验证
use async_trait::async_trait;
use petrack_application::{default_event_bus, default_event_publisher, reset_event_bus};
use petrack_domain::eventing::EventHandler;
use petrack_domain::events::{PetrackEvent, PetrackEventKind};
use petrack_domain::model::UserId;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Counter(AtomicUsize);

#[async_trait]
impl EventHandler<PetrackEvent> for Counter {
    async fn handle(&self, _event: &PetrackEvent) -> anyhow::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn default_instance_is_shared_until_reset() {
    let first = default_event_bus();
    let again = default_event_bus();
    assert!(Arc::ptr_eq(&first, &again));

    let counter = Arc::new(Counter::default());
    first.subscribe(PetrackEventKind::UserDeleted, counter.clone());

    let deleted = PetrackEvent::user_deleted(UserId::new("u-1"), "alice".to_string());
    let publisher = default_event_publisher();
    assert!(Arc::ptr_eq(publisher.bus(), &first));
    publisher.publish_event(&deleted).await;
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);

    reset_event_bus();
    let fresh = default_event_bus();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert!(fresh.is_empty());
    // 旧实例的注册也被清空
    assert!(first.is_empty());

    default_event_publisher().publish_event(&deleted).await;
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}
