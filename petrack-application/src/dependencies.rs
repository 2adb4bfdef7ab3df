//! 默认总线实例
//!
//! 进程级的默认总线只是对显式实例的薄封装；对正确性敏感的流程应通过注入传递总线/发布器。
//! 测试使用 `create_test_event_bus` 获取互不干扰的实例，或以 `reset_event_bus` 重置默认实例。
//!
use petrack_domain::eventing::{EventBus, EventPublisher};
use petrack_domain::events::PetrackEvent;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

pub type PetrackEventBus = EventBus<PetrackEvent>;
pub type PetrackEventPublisher = EventPublisher<PetrackEvent>;

static DEFAULT_EVENT_BUS: LazyLock<RwLock<Arc<PetrackEventBus>>> =
    LazyLock::new(|| RwLock::new(Arc::new(EventBus::new())));

/// 默认总线（首次访问时创建）
pub fn default_event_bus() -> Arc<PetrackEventBus> {
    let guard = DEFAULT_EVENT_BUS
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

/// 基于默认总线的发布器
pub fn default_event_publisher() -> PetrackEventPublisher {
    EventPublisher::new(default_event_bus())
}

/// 清空当前默认总线的注册并替换为新实例
pub fn reset_event_bus() {
    let mut guard = DEFAULT_EVENT_BUS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    guard.clear_handlers();
    *guard = Arc::new(EventBus::new());
    debug!("default event bus reset");
}

/// 与默认实例隔离的新总线
pub fn create_test_event_bus() -> Arc<PetrackEventBus> {
    Arc::new(EventBus::new())
}

/// 使用给定总线（缺省时新建隔离总线）的发布器
pub fn create_test_event_publisher(bus: Option<Arc<PetrackEventBus>>) -> PetrackEventPublisher {
    EventPublisher::new(bus.unwrap_or_else(create_test_event_bus))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buses_are_isolated() {
        let a = create_test_event_bus();
        let b = create_test_event_bus();
        assert!(!Arc::ptr_eq(&a, &b));

        let publisher = create_test_event_publisher(Some(a.clone()));
        assert!(Arc::ptr_eq(publisher.bus(), &a));

        let fresh = create_test_event_publisher(None);
        assert!(!Arc::ptr_eq(fresh.bus(), &a));
    }
}
