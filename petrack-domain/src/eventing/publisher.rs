//! 事件发布器（EventPublisher）
//!
//! 仓储在写入成功之后调用：读取聚合的待发布事件，交给总线分发，然后清空。
//! 写入失败时不得调用，聚合中的事件因此保持原样。
//!
use super::bus::EventBus;
use crate::aggregate::AggregateRoot;
use crate::domain_event::DomainEvent;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct EventPublisher<E>
where
    E: DomainEvent,
{
    bus: Arc<EventBus<E>>,
}

impl<E> EventPublisher<E>
where
    E: DomainEvent,
{
    pub fn new(bus: Arc<EventBus<E>>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &Arc<EventBus<E>> {
        &self.bus
    }

    /// 分发聚合的全部待发布事件并清空；没有待发布事件时不做任何事
    pub async fn publish_from_aggregate<A>(&self, aggregate: &mut A)
    where
        A: AggregateRoot + ?Sized,
        A::Event: Into<E>,
    {
        if !aggregate.has_pending_events() {
            return;
        }

        let events: Vec<E> = aggregate
            .pending_events()
            .into_iter()
            .map(Into::into)
            .collect();
        debug!(count = events.len(), "publishing aggregate events");

        self.bus.publish_all(&events).await;
        aggregate.clear_pending_events();
    }

    /// 按顺序对每个聚合执行 `publish_from_aggregate`
    pub async fn publish_from_aggregates<'a, A, I>(&self, aggregates: I)
    where
        A: AggregateRoot + ?Sized + 'a,
        A::Event: Into<E>,
        I: IntoIterator<Item = &'a mut A>,
    {
        for aggregate in aggregates {
            self.publish_from_aggregate(aggregate).await;
        }
    }

    pub async fn publish_event(&self, event: &E) {
        self.bus.publish(event).await;
    }

    pub async fn publish_events(&self, events: &[E]) {
        self.bus.publish_all(events).await;
    }
}

impl<E> Clone for EventPublisher<E>
where
    E: DomainEvent,
{
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<E> fmt::Debug for EventPublisher<E>
where
    E: DomainEvent,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPublisher")
            .field("bus", &self.bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventing::EventHandler;
    use async_trait::async_trait;
    use petrack_macros::{aggregate_root, domain_event};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[domain_event]
    enum GateEvent {
        Locked { gate: String },
        Unlocked { gate: String },
    }

    #[aggregate_root(event = GateEvent)]
    #[derive(Default)]
    struct Gate {
        name: String,
    }

    impl Gate {
        fn named(name: &str) -> Self {
            Self {
                name: name.to_string(),
                ..Default::default()
            }
        }

        fn cycle(&mut self) {
            self.append_event(GateEvent::locked(self.name.clone()));
            self.append_event(GateEvent::unlocked(self.name.clone()));
        }
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    #[async_trait]
    impl EventHandler<GateEvent> for Counter {
        async fn handle(&self, _event: &GateEvent) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn publisher_with_counter() -> (EventPublisher<GateEvent>, Arc<Counter>) {
        let bus = Arc::new(EventBus::<GateEvent>::new());
        let counter = Arc::new(Counter::default());
        let handler: Arc<dyn EventHandler<GateEvent>> = counter.clone();
        bus.subscribe_many(GateEventKind::ALL.iter().copied(), handler);
        (EventPublisher::new(bus), counter)
    }

    #[tokio::test]
    async fn drains_and_clears_aggregate() {
        let (publisher, counter) = publisher_with_counter();
        let mut gate = Gate::named("north");
        gate.cycle();

        publisher.publish_from_aggregate(&mut gate).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        assert!(!gate.has_pending_events());

        // 再次发布不会重复投递
        publisher.publish_from_aggregate(&mut gate).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn publishes_multiple_aggregates_in_order() {
        let (publisher, counter) = publisher_with_counter();
        let mut a = Gate::named("a");
        let mut b = Gate::named("b");
        a.cycle();
        b.cycle();
        b.cycle();

        publisher.publish_from_aggregates([&mut a, &mut b]).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 6);
        assert_eq!(a.pending_count() + b.pending_count(), 0);
    }

    #[tokio::test]
    async fn pass_through_publishing() {
        let (publisher, counter) = publisher_with_counter();
        publisher.publish_event(&GateEvent::locked("x".into())).await;
        publisher
            .publish_events(&[GateEvent::locked("x".into()), GateEvent::unlocked("x".into())])
            .await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
        assert_eq!(publisher.clone().bus().total_handler_count(), 2);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let (publisher, counter) = publisher_with_counter();
        let mut gate = Gate::named("dyn");
        gate.cycle();
        let agg: &mut dyn AggregateRoot<Event = GateEvent> = &mut gate;
        publisher.publish_from_aggregate(agg).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        assert!(!gate.has_pending_events());
    }
}
