//! 事件感知仓储
//!
//! 写入成功后才发布聚合的待发布事件；写入失败时返回错误，事件留在聚合中。
//!
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use petrack_domain::aggregate::AggregateRoot;
use petrack_domain::domain_event::DomainEvent;
use petrack_domain::entity::Entity;
use petrack_domain::error::{DomainError, DomainResult};
use petrack_domain::eventing::EventPublisher;
use petrack_domain::events::PetrackEvent;
use petrack_domain::model::{Pet, PetRecord, User};
use petrack_domain::persist::AggregateRepository;
use tracing::debug;

/// 仓储实现共用的发布能力
pub struct EventAwareRepository<E>
where
    E: DomainEvent,
{
    publisher: EventPublisher<E>,
}

impl<E> EventAwareRepository<E>
where
    E: DomainEvent,
{
    pub fn new(publisher: EventPublisher<E>) -> Self {
        Self { publisher }
    }

    pub fn publisher(&self) -> &EventPublisher<E> {
        &self.publisher
    }

    pub async fn publish_from_entity<A>(&self, aggregate: &mut A)
    where
        A: AggregateRoot + ?Sized,
        A::Event: Into<E>,
    {
        self.publisher.publish_from_aggregate(aggregate).await;
    }

    pub async fn publish_from_entities<'a, A, I>(&self, aggregates: I)
    where
        A: AggregateRoot + ?Sized + 'a,
        A::Event: Into<E>,
        I: IntoIterator<Item = &'a mut A>,
    {
        self.publisher.publish_from_aggregates(aggregates).await;
    }

    pub async fn publish_event(&self, event: &E) {
        self.publisher.publish_event(event).await;
    }

    pub async fn publish_events(&self, events: &[E]) {
        self.publisher.publish_events(events).await;
    }
}

/// 内存聚合仓储：按标识存放聚合副本（不含待发布事件），以版本号做乐观并发控制
pub struct InMemoryAggregateRepository<A, E = PetrackEvent>
where
    A: AggregateRoot + Entity,
    E: DomainEvent,
{
    store: DashMap<A::Id, A>,
    events: EventAwareRepository<E>,
}

pub type InMemoryPetRepository = InMemoryAggregateRepository<Pet>;
pub type InMemoryUserRepository = InMemoryAggregateRepository<User>;
pub type InMemoryPetRecordRepository = InMemoryAggregateRepository<PetRecord>;

impl<A, E> InMemoryAggregateRepository<A, E>
where
    A: AggregateRoot + Entity + Clone,
    E: DomainEvent,
{
    pub fn new(publisher: EventPublisher<E>) -> Self {
        Self {
            store: DashMap::new(),
            events: EventAwareRepository::new(publisher),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // 校验版本并写入；返回前释放分片锁
    fn write(&self, aggregate: &mut A) -> DomainResult<()> {
        let expected = aggregate.version();
        match self.store.entry(aggregate.id().clone()) {
            Entry::Occupied(mut slot) => {
                let actual = slot.get().version();
                if actual != expected {
                    return Err(DomainError::VersionConflict {
                        expected: expected.value(),
                        actual: actual.value(),
                    });
                }
                aggregate.set_version(expected.next());
                slot.insert(stored_copy(aggregate));
            }
            Entry::Vacant(slot) => {
                if !expected.is_new() {
                    return Err(DomainError::VersionConflict {
                        expected: expected.value(),
                        actual: 0,
                    });
                }
                aggregate.set_version(expected.next());
                slot.insert(stored_copy(aggregate));
            }
        }
        Ok(())
    }
}

fn stored_copy<A>(aggregate: &A) -> A
where
    A: AggregateRoot + Clone,
{
    let mut copy = aggregate.clone();
    copy.clear_pending_events();
    copy
}

#[async_trait]
impl<A, E> AggregateRepository<A> for InMemoryAggregateRepository<A, E>
where
    A: AggregateRoot + Entity + Clone + 'static,
    A::Event: Into<E>,
    E: DomainEvent,
{
    async fn load(&self, id: &A::Id) -> DomainResult<Option<A>> {
        Ok(self.store.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, aggregate: &mut A) -> DomainResult<()> {
        self.write(aggregate)?;
        debug!(
            id = %aggregate.id(),
            version = %aggregate.version(),
            pending = aggregate.pending_count(),
            "aggregate saved"
        );
        self.events.publish_from_entity(aggregate).await;
        Ok(())
    }
}
