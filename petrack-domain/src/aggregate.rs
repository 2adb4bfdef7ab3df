//! 聚合根（AggregateRoot）与待发布事件
//!
//! 聚合在业务方法中通过 `append_event` 记录事件；外部只能读取副本或整体清空，
//! 无法修改单个事件。清空由发布器在事件分发之后完成。
//!
use crate::domain_event::DomainEvent;

/// 聚合内部的待发布事件缓冲区（按追加顺序，无上限）
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEvents<E> {
    events: Vec<E>,
}

impl<E> Default for DomainEvents<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E: Clone> DomainEvents<E> {
    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    /// 返回全部待发布事件的副本
    pub fn to_vec(&self) -> Vec<E> {
        self.events.clone()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }
}

/// 聚合根接口，通常由 `#[aggregate_root(event = ...)]` 生成实现
pub trait AggregateRoot: Send + Sync {
    /// 该聚合产生的领域事件类型
    type Event: DomainEvent;

    fn domain_events(&self) -> &DomainEvents<Self::Event>;

    fn domain_events_mut(&mut self) -> &mut DomainEvents<Self::Event>;

    /// 追加一个待发布事件
    fn append_event(&mut self, event: Self::Event) {
        self.domain_events_mut().record(event);
    }

    /// 待发布事件的副本，修改副本不影响聚合
    fn pending_events(&self) -> Vec<Self::Event> {
        self.domain_events().to_vec()
    }

    /// 清空待发布事件（幂等）
    fn clear_pending_events(&mut self) {
        self.domain_events_mut().clear();
    }

    fn has_pending_events(&self) -> bool {
        !self.domain_events().is_empty()
    }

    fn pending_count(&self) -> usize {
        self.domain_events().len()
    }
}
