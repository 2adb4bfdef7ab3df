//! 领域事件（Domain Event）
//!
//! 定义事件需要实现的最小接口（`DomainEvent`）、作为总线分发键的
//! 事件类型判别（`EventKind`），以及每个事件携带的元数据（`EventMetadata`）。

mod domain_event_trait;
mod metadata;

pub use domain_event_trait::{DomainEvent, EventKind};
pub use metadata::EventMetadata;
