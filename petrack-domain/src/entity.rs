//! 实体（Entity）基础抽象
//!
//! 为聚合与实体提供统一的标识（Id）与版本（optimistic locking）能力。
//!
use crate::value_object::Version;
use std::{fmt::Display, hash::Hash, str::FromStr};

/// 具备唯一标识与版本的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示、可克隆并可作为仓储键
    type Id: FromStr + Clone + Display + Eq + Hash + Send + Sync;

    /// 使用给定标识与版本创建实体
    fn new(id: Self::Id, version: Version) -> Self;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;

    /// 获取当前版本（用于乐观锁与并发控制）
    fn version(&self) -> Version;

    /// 更新版本，由仓储在写入成功时调用
    fn set_version(&mut self, version: Version);
}

/// 生成新的实体标识（UUID v4 文本形式），供 `#[entity_id]` 的 `generate` 使用
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
