//! 聚合仓储接口
//!
//! 仓储负责持久化聚合状态，并在写入成功之后通过 `EventPublisher`
//! 发布聚合的待发布事件；写入失败时返回错误且不发布任何事件。
//!
use crate::aggregate::AggregateRoot;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AggregateRepository<A>: Send + Sync
where
    A: AggregateRoot + Entity,
{
    async fn load(&self, id: &A::Id) -> DomainResult<Option<A>>;

    /// 加载必须存在的聚合，不存在时返回 `NotFound`
    async fn get(&self, id: &A::Id) -> DomainResult<A> {
        self.load(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("aggregate {id}")))
    }

    /// 持久化聚合（版本校验通过后递增版本），随后发布并清空其待发布事件
    async fn save(&self, aggregate: &mut A) -> DomainResult<()>;
}

#[async_trait]
impl<A, T> AggregateRepository<A> for Arc<T>
where
    A: AggregateRoot + Entity,
    T: AggregateRepository<A> + ?Sized,
{
    async fn load(&self, id: &A::Id) -> DomainResult<Option<A>> {
        (**self).load(id).await
    }

    async fn save(&self, aggregate: &mut A) -> DomainResult<()> {
        (**self).save(aggregate).await
    }
}
