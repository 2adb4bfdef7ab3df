//! 宠物追踪应用层（petrack-application）
//!
//! 领域事件的消费端与装配：
//! - `handlers`：领域、审计与通知处理器
//! - `registry`：启动时把处理器注册到总线
//! - `dependencies`：默认总线实例与测试用工厂
//! - `repository`：写入成功后发布事件的内存仓储
//! - `config` / `telemetry`：日志配置与初始化
//!
pub mod audit;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod notification;
pub mod registry;
pub mod repository;
pub mod telemetry;

pub use dependencies::{
    create_test_event_bus, create_test_event_publisher, default_event_bus,
    default_event_publisher, reset_event_bus,
};
pub use registry::{HandlerDeps, register_all_event_handlers};
