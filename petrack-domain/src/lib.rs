//! 宠物追踪领域层（petrack-domain）
//!
//! 提供领域事件分发核心与宠物/用户/宠物档案聚合：
//! - 领域事件（`domain_event`）：事件元数据、事件类型判别与 `DomainEvent` 约束
//! - 聚合（`aggregate`）：聚合根对待发布事件的累积、读取与清空
//! - 事件系统（`eventing`）：进程内总线、处理器契约与发布器
//! - 仓储接口（`persist`）：由基础设施实现，写入成功后交由发布器分发事件
//! - 具体事件（`events`）与领域模型（`model`）
//!
//! 典型用法：
//! 1. 聚合方法在修改状态的同时通过 `append_event` 记录事件；
//! 2. 仓储提交状态后调用 `EventPublisher::publish_from_aggregate`；
//! 3. 总线按事件类型依注册顺序调用各处理器，单个处理器失败不影响其余处理器。
//!
pub mod aggregate;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod events;
pub mod model;
pub mod persist;
pub mod value_object;

// 允许在本 crate 内部通过 ::petrack_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 中也能解析。
extern crate self as petrack_domain;
