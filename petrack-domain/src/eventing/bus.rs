//! 事件总线（EventBus）
//!
//! 事件类型到处理器列表的注册表，并负责分发：
//! - `subscribe` 不去重，重复注册即重复投递；
//! - `publish` 先取处理器快照再逐个等待，等待期间不持有注册表锁；
//! - 每个处理器单独隔离，错误与 panic 记录日志后继续下一个。
//!
use super::handler::{EventHandler, FnEventHandler};
use crate::domain_event::{DomainEvent, EventKind};
use dashmap::DashMap;
use futures_util::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

/// 进程内事件总线
pub struct EventBus<E>
where
    E: DomainEvent,
{
    handlers: DashMap<E::Kind, Vec<Arc<dyn EventHandler<E>>>>,
}

impl<E> EventBus<E>
where
    E: DomainEvent,
{
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// 为事件类型注册处理器（追加到末尾，不检查重复）
    pub fn subscribe(&self, kind: E::Kind, handler: Arc<dyn EventHandler<E>>) {
        debug!(
            event_type = kind.name(),
            handler = handler.handler_name(),
            "subscribing event handler"
        );
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// 同一处理器实例依次注册到多个事件类型
    pub fn subscribe_many(
        &self,
        kinds: impl IntoIterator<Item = E::Kind>,
        handler: Arc<dyn EventHandler<E>>,
    ) {
        for kind in kinds {
            self.subscribe(kind, Arc::clone(&handler));
        }
    }

    /// 包装异步函数并注册，返回处理器句柄以便之后取消订阅
    pub fn subscribe_fn<F, Fut>(
        &self,
        kind: E::Kind,
        name: impl Into<String>,
        f: F,
    ) -> Arc<dyn EventHandler<E>>
    where
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: Arc<dyn EventHandler<E>> = Arc::new(FnEventHandler::new(name, f));
        self.subscribe(kind, Arc::clone(&handler));
        handler
    }

    /// 移除该类型下第一个与给定处理器为同一实例的注册项；不存在时不做任何事
    pub fn unsubscribe(&self, kind: E::Kind, handler: &Arc<dyn EventHandler<E>>) -> bool {
        let removed = match self.handlers.get_mut(&kind) {
            Some(mut list) => match list
                .iter()
                .position(|h| std::ptr::addr_eq(Arc::as_ptr(h), Arc::as_ptr(handler)))
            {
                Some(idx) => {
                    list.remove(idx);
                    true
                }
                None => false,
            },
            None => false,
        };

        if removed {
            self.handlers.remove_if(&kind, |_, list| list.is_empty());
            debug!(
                event_type = kind.name(),
                handler = handler.handler_name(),
                "unsubscribed event handler"
            );
        }
        removed
    }

    /// 清空全部注册
    pub fn clear_handlers(&self) {
        self.handlers.clear();
    }

    pub fn has_handlers(&self, kind: E::Kind) -> bool {
        self.handler_count(kind) > 0
    }

    pub fn handler_count(&self, kind: E::Kind) -> usize {
        self.handlers.get(&kind).map(|list| list.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total_handler_count() == 0
    }

    /// 所有事件类型的注册项总数（重复注册分别计数）
    pub fn total_handler_count(&self) -> usize {
        self.handlers.iter().map(|entry| entry.value().len()).sum()
    }

    /// 分发单个事件：按注册顺序逐个等待处理器，始终正常返回
    pub async fn publish(&self, event: &E) {
        let kind = event.kind();
        let handlers = self.snapshot(kind);
        if handlers.is_empty() {
            debug!(event_type = kind.name(), event_id = %event.event_id(), "no handlers for event");
            return;
        }

        debug!(
            event_type = kind.name(),
            event_id = %event.event_id(),
            handlers = handlers.len(),
            "publishing event"
        );

        for handler in handlers {
            match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    let reason = format!("{err:#}");
                    error!(
                        handler = handler.handler_name(),
                        event_type = kind.name(),
                        event_id = %event.event_id(),
                        reason = %reason,
                        "event handler failed"
                    );
                }
                Err(payload) => {
                    let reason = panic_message(&*payload);
                    error!(
                        handler = handler.handler_name(),
                        event_type = kind.name(),
                        event_id = %event.event_id(),
                        reason = %reason,
                        "event handler panicked"
                    );
                }
            }
        }
    }

    /// 依次分发多个事件
    pub async fn publish_all(&self, events: &[E]) {
        for event in events {
            self.publish(event).await;
        }
    }

    fn snapshot(&self, kind: E::Kind) -> Vec<Arc<dyn EventHandler<E>>> {
        self.handlers
            .get(&kind)
            .map(|list| list.value().clone())
            .unwrap_or_default()
    }
}

impl<E> Default for EventBus<E>
where
    E: DomainEvent,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E>
where
    E: DomainEvent,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.len())
            .field("handlers", &self.total_handler_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use petrack_macros::domain_event;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[domain_event]
    enum DoorEvent {
        Opened { door: String },
        Closed { door: String },
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Counter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventHandler<DoorEvent> for Counter {
        async fn handle(&self, _event: &DoorEvent) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Panicking;

    #[async_trait]
    impl EventHandler<DoorEvent> for Panicking {
        async fn handle(&self, _event: &DoorEvent) -> anyhow::Result<()> {
            panic!("door handler exploded");
        }
    }

    struct Recording {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler<DoorEvent> for Recording {
        async fn handle(&self, event: &DoorEvent) -> anyhow::Result<()> {
            let door = match event {
                DoorEvent::Opened { door, .. } | DoorEvent::Closed { door, .. } => door,
            };
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, door));
            Ok(())
        }
    }

    #[test]
    fn fresh_bus_is_empty() {
        let bus = EventBus::<DoorEvent>::new();
        assert!(bus.is_empty());
        assert!(!bus.has_handlers(DoorEventKind::Opened));
        assert_eq!(bus.handler_count(DoorEventKind::Opened), 0);
    }

    #[test]
    fn subscribe_many_registers_each_kind() {
        let bus = EventBus::<DoorEvent>::new();
        let h: Arc<dyn EventHandler<DoorEvent>> = Arc::new(Counter::default());
        bus.subscribe_many(DoorEventKind::ALL.iter().copied(), h);
        assert_eq!(bus.handler_count(DoorEventKind::Opened), 1);
        assert_eq!(bus.handler_count(DoorEventKind::Closed), 1);
        assert_eq!(bus.total_handler_count(), 2);
    }

    #[tokio::test]
    async fn panicking_handler_is_isolated() {
        let bus = EventBus::<DoorEvent>::new();
        let counter = Arc::new(Counter::default());
        bus.subscribe(DoorEventKind::Opened, Arc::new(Panicking));
        bus.subscribe(DoorEventKind::Opened, counter.clone());

        bus.publish(&DoorEvent::opened("front".into())).await;
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn unsubscribe_removes_only_first_matching_instance() {
        let bus = EventBus::<DoorEvent>::new();
        let counter = Arc::new(Counter::default());
        let handle: Arc<dyn EventHandler<DoorEvent>> = counter.clone();
        bus.subscribe(DoorEventKind::Opened, handle.clone());
        bus.subscribe(DoorEventKind::Opened, handle.clone());

        assert!(bus.unsubscribe(DoorEventKind::Opened, &handle));
        assert_eq!(bus.handler_count(DoorEventKind::Opened), 1);

        bus.publish(&DoorEvent::opened("front".into())).await;
        assert_eq!(counter.count(), 1);

        assert!(bus.unsubscribe(DoorEventKind::Opened, &handle));
        assert!(bus.is_empty());
        assert!(!bus.unsubscribe(DoorEventKind::Opened, &handle));
    }

    #[test]
    fn unsubscribe_unknown_handler_is_noop() {
        let bus = EventBus::<DoorEvent>::new();
        let registered: Arc<dyn EventHandler<DoorEvent>> = Arc::new(Counter::default());
        let stranger: Arc<dyn EventHandler<DoorEvent>> = Arc::new(Counter::default());
        bus.subscribe(DoorEventKind::Closed, registered);

        assert!(!bus.unsubscribe(DoorEventKind::Closed, &stranger));
        assert!(!bus.unsubscribe(DoorEventKind::Opened, &stranger));
        assert_eq!(bus.handler_count(DoorEventKind::Closed), 1);
    }

    #[tokio::test]
    async fn subscribe_fn_handle_can_unsubscribe() {
        let bus = EventBus::<DoorEvent>::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in = seen.clone();
        let handle = bus.subscribe_fn(DoorEventKind::Closed, "close_counter", move |_ev| {
            let seen = seen_in.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                anyhow::Ok(())
            }
        });
        assert_eq!(handle.handler_name(), "close_counter");

        bus.publish(&DoorEvent::closed("back".into())).await;
        assert!(bus.unsubscribe(DoorEventKind::Closed, &handle));
        bus.publish(&DoorEvent::closed("back".into())).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn publish_all_keeps_total_order() {
        let bus = EventBus::<DoorEvent>::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for label in ["h1", "h2"] {
            bus.subscribe(
                DoorEventKind::Opened,
                Arc::new(Recording {
                    label,
                    log: log.clone(),
                }),
            );
        }

        bus.publish_all(&[
            DoorEvent::opened("e1".into()),
            DoorEvent::opened("e2".into()),
        ])
        .await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["h1:e1", "h2:e1", "h1:e2", "h2:e2"]
        );
    }

    #[test]
    fn panic_message_extracts_strings() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*boxed), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*boxed), "non-string panic payload");
    }
}
