//! 事件处理器（EventHandler）
//!
//! 处理器只有一个方法：`handle`。返回 `Err` 或 panic 是唯一的失败信号，
//! 成功不携带任何值。
//!
use crate::domain_event::DomainEvent;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// 事件处理器：处理一类或多类事件
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: DomainEvent,
{
    /// 处理器名称（用于失败日志），默认取类型名
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 处理事件
    async fn handle(&self, event: &E) -> anyhow::Result<()>;
}

/// 将异步函数包装为处理器，需显式订阅到总线
pub struct FnEventHandler<F> {
    name: String,
    f: F,
}

impl<F> FnEventHandler<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnEventHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEventHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, F, Fut> EventHandler<E> for FnEventHandler<F>
where
    E: DomainEvent,
    F: Fn(E) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    fn handler_name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &E) -> anyhow::Result<()> {
        (self.f)(event.clone()).await
    }
}
