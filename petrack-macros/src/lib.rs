//! 领域层属性宏：事件枚举、聚合根、实体与标识类型
use proc_macro::TokenStream;

mod aggregate_root;
mod domain_event;
mod entity;
mod entity_id;
mod utils;

/// 领域事件宏
/// - 为每个具名字段变体注入 `metadata: EventMetadata`
/// - 生成 `XxxKind` 判别枚举并实现 `DomainEvent` / `EventKind`
/// - 参数：`#[domain_event(version = N)]`；变体可用 `#[event(event_type = "...", event_version = N)]` 覆写
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}

/// 聚合根宏
/// - 追加私有待发布事件缓冲区并实现 `AggregateRoot`
/// - 参数：`#[aggregate_root(event = EventType)]`
/// - 与 `#[entity]` 同用时须置于其之上
#[proc_macro_attribute]
pub fn aggregate_root(attr: TokenStream, item: TokenStream) -> TokenStream {
    aggregate_root::expand(attr, item)
}

/// 实体宏
/// - 追加字段：`id: IdType`, `version: Version`（若缺失）并置于字段最前
/// - 参数：`#[entity(id = IdType, debug = true|false)]`，`id` 默认 `String`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体标识宏，仅用于 `struct X(String);`
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}
