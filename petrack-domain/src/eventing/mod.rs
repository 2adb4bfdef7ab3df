//! 事件子系统（eventing）
//!
//! 进程内的领域事件分发：
//! - `EventBus`：事件类型到有序处理器列表的注册表，按注册顺序逐个等待处理器；
//! - `EventHandler`：消费事件的处理器契约，另有包装异步函数的 `FnEventHandler`；
//! - `EventPublisher`：仓储写入成功后，将聚合的待发布事件交给总线并清空。
//!
//! 单个处理器返回错误或发生 panic 时只记录日志，不影响其余处理器，也不向调用方传播。
//!
pub mod bus;
pub mod handler;
pub mod publisher;

pub use bus::EventBus;
pub use handler::{EventHandler, FnEventHandler};
pub use publisher::EventPublisher;
