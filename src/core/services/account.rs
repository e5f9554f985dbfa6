//! 账号存储
//! 会话级内存缓存，通过显式刷新和远端确认后的本地修改与网关保持一致

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::gateway::normalize_accounts;
use crate::core::models::{Account, Notification, Status};
use crate::core::services::toggle::{ToggleCoordinator, ToggleTarget};
use crate::core::traits::{AccountAddedObserver, AccountGateway, Notifier};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct StoreState {
    accounts: Vec<Account>,
    /// 最近一次生效的刷新序号
    applied: u64,
}

/// 刷新期间持有，请求被丢弃时同样会释放计数
struct RefreshInFlight<'a> {
    refreshing: &'a AtomicUsize,
    loaded: &'a AtomicBool,
}

impl<'a> RefreshInFlight<'a> {
    fn enter(refreshing: &'a AtomicUsize, loaded: &'a AtomicBool) -> Self {
        refreshing.fetch_add(1, Ordering::SeqCst);
        Self { refreshing, loaded }
    }
}

impl Drop for RefreshInFlight<'_> {
    fn drop(&mut self) {
        self.refreshing.fetch_sub(1, Ordering::SeqCst);
        self.loaded.store(true, Ordering::SeqCst);
    }
}

/// 账号存储
pub struct AccountStore {
    gateway: Arc<dyn AccountGateway>,
    notifier: Arc<dyn Notifier>,
    toggles: Arc<ToggleCoordinator>,
    state: RwLock<StoreState>,
    issued: AtomicU64,
    refreshing: AtomicUsize,
    loaded: AtomicBool,
}

impl AccountStore {
    pub fn new(
        gateway: Arc<dyn AccountGateway>,
        notifier: Arc<dyn Notifier>,
        toggles: Arc<ToggleCoordinator>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            toggles,
            state: RwLock::new(StoreState::default()),
            issued: AtomicU64::new(0),
            refreshing: AtomicUsize::new(0),
            loaded: AtomicBool::new(false),
        }
    }

    /// 当前账号列表快照
    pub async fn accounts(&self) -> Vec<Account> {
        self.state.read().await.accounts.clone()
    }

    pub async fn get(&self, cookie_id: &str) -> Option<Account> {
        self.state
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.cookie_id == cookie_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 首次刷新完成之前为 true
    pub async fn is_loading(&self) -> bool {
        !self.loaded.load(Ordering::SeqCst)
    }

    pub async fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    fn surface(&self, title: &str, err: &AppError, fallback: &str) {
        let message = err.user_message(fallback);
        let notification = if err.is_local() {
            Notification::warning(title, message)
        } else {
            Notification::error(title, message)
        };
        self.notifier.show(notification);
    }

    /// 从网关拉取完整账号列表并整体替换
    ///
    /// 响应结构异常时清空列表；请求失败同样清空并返回错误，不自动重试。
    /// 晚于后发请求返回的结果直接丢弃。
    pub async fn refresh(&self) -> AppResult<usize> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = RefreshInFlight::enter(&self.refreshing, &self.loaded);

        let result = self.gateway.list_accounts().await;

        let mut state = self.state.write().await;

        if generation < state.applied {
            debug!(
                "丢弃过期的账号刷新结果 (#{} < #{})",
                generation, state.applied
            );
            return result.map(|_| state.accounts.len());
        }
        state.applied = generation;

        match result {
            Ok(payload) => {
                state.accounts = normalize_accounts(payload);
                info!("账号列表已刷新: {} 个账号", state.accounts.len());
                Ok(state.accounts.len())
            }
            Err(e) => {
                state.accounts.clear();
                drop(state);
                self.surface("加载失败", &e, "加载账号列表失败");
                Err(e)
            }
        }
    }

    async fn status_of(&self, cookie_id: &str) -> AppResult<Status> {
        self.get(cookie_id)
            .await
            .map(|a| a.status)
            .ok_or_else(|| AppError::NotFound(format!("账号不存在: {}", cookie_id)))
    }

    async fn patch_status(&self, cookie_id: &str, status: Status) {
        let mut state = self.state.write().await;
        if let Some(account) = state
            .accounts
            .iter_mut()
            .find(|a| a.cookie_id == cookie_id)
        {
            account.status = status;
        }
    }

    /// 切换账号启用状态，远端确认后才修改本地
    pub async fn toggle_account_status(&self, cookie_id: &str) -> AppResult<Account> {
        let result = self
            .toggles
            .flip(
                ToggleTarget::Account(cookie_id),
                self.status_of(cookie_id),
                |next| async move {
                    self.gateway.update_account_status(cookie_id, next).await?;
                    self.patch_status(cookie_id, next).await;
                    Ok(())
                },
            )
            .await;

        match result {
            Ok(next) => {
                info!("账号 {} 已{}", cookie_id, next.label());
                self.notifier.show(Notification::success(
                    "状态已更新",
                    format!("账号已{}", next.label()),
                ));
                self.get(cookie_id)
                    .await
                    .ok_or_else(|| AppError::NotFound(format!("账号不存在: {}", cookie_id)))
            }
            Err(e) => {
                self.surface("更新失败", &e, "更新状态失败");
                Err(e)
            }
        }
    }

    /// 删除账号，成功后按 id 从本地移除
    pub async fn remove(&self, cookie_id: &str) -> AppResult<()> {
        let result: AppResult<()> = async {
            let _permit = self
                .toggles
                .guard()
                .acquire(ToggleTarget::Account(cookie_id).key())?;
            self.gateway.delete_account(cookie_id).await?;
            self.state
                .write()
                .await
                .accounts
                .retain(|a| a.cookie_id != cookie_id);
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                info!("账号 {} 已删除", cookie_id);
                self.notifier
                    .show(Notification::success("删除成功", "账号已删除"));
                Ok(())
            }
            Err(e) => {
                self.surface("删除失败", &e, "删除失败");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl AccountAddedObserver for AccountStore {
    async fn on_account_added(&self) {
        // 失败已经通过通知上报
        let _ = self.refresh().await;
    }
}
