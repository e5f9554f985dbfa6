//! 启用状态切换协调
//! 先等远端确认，再修改本地；同一实体同一时间只允许一个变更

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::future::Future;

use crate::core::models::Status;
use crate::error::{AppError, AppResult};

/// 变更目标
#[derive(Debug, Clone, Copy)]
pub enum ToggleTarget<'a> {
    Account(&'a str),
    Quota {
        cookie_id: &'a str,
        model_name: &'a str,
    },
}

impl ToggleTarget<'_> {
    pub fn key(&self) -> String {
        match self {
            ToggleTarget::Account(id) => format!("account:{}", id),
            ToggleTarget::Quota {
                cookie_id,
                model_name,
            } => format!("quota:{}:{}", cookie_id, model_name),
        }
    }
}

/// 进行中的实体集合
#[derive(Default)]
pub struct InFlightGuard {
    keys: DashMap<String, ()>,
}

/// 持有期间该实体被标记为进行中，drop 时释放
pub struct InFlightPermit<'a> {
    guard: &'a InFlightGuard,
    key: String,
}

impl InFlightGuard {
    pub fn acquire(&self, key: String) -> AppResult<InFlightPermit<'_>> {
        match self.keys.entry(key.clone()) {
            Entry::Occupied(_) => Err(AppError::Busy(key)),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightPermit { guard: self, key })
            }
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.keys.remove(&self.key);
    }
}

/// 账号与配额共用的切换逻辑
#[derive(Default)]
pub struct ToggleCoordinator {
    guard: InFlightGuard,
}

impl ToggleCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&self) -> &InFlightGuard {
        &self.guard
    }

    /// 翻转 `target` 的状态
    ///
    /// `current` 在取得许可之后才读取，`confirm` 收到新状态，负责远程更新
    /// 并在成功后修改本地副本；它返回错误时本地不应有任何变化。
    pub async fn flip<C, F, Fut>(
        &self,
        target: ToggleTarget<'_>,
        current: C,
        confirm: F,
    ) -> AppResult<Status>
    where
        C: Future<Output = AppResult<Status>>,
        F: FnOnce(Status) -> Fut,
        Fut: Future<Output = AppResult<()>>,
    {
        let _permit = self.guard.acquire(target.key())?;
        let next = current.await?.toggled();
        confirm(next).await?;
        Ok(next)
    }
}
