//! 配额面板
//! 一次只查看一个账号的模型配额，切换账号或关闭面板时丢弃旧数据

use serde::Serialize;
use std::future::ready;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::gateway::normalize_quotas;
use crate::core::models::{Account, Notification, Quota, Status};
use crate::core::services::model_names::{display_name, model_family, ModelFamily};
use crate::core::services::toggle::{ToggleCoordinator, ToggleTarget};
use crate::core::traits::{AccountGateway, Notifier};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct PanelState {
    account: Option<Account>,
    quotas: Vec<Quota>,
    /// open / close 时递增，用于丢弃其他账号的迟到结果
    generation: u64,
}

/// 某次 open 的加载标记，结束或被丢弃时清除；更新的 open 不受影响
struct Loading<'a> {
    slot: &'a AtomicU64,
    generation: u64,
}

impl<'a> Loading<'a> {
    fn begin(slot: &'a AtomicU64, generation: u64) -> Self {
        slot.store(generation, Ordering::SeqCst);
        Self { slot, generation }
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let _ = self.slot.compare_exchange(
            self.generation,
            0,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

/// 带展示信息的配额行
#[derive(Debug, Clone, Serialize)]
pub struct QuotaRow {
    #[serde(flatten)]
    pub quota: Quota,
    pub display_name: String,
    pub family: ModelFamily,
    pub formatted_quota: String,
}

impl From<&Quota> for QuotaRow {
    fn from(quota: &Quota) -> Self {
        Self {
            display_name: display_name(&quota.model_name).to_string(),
            family: model_family(&quota.model_name),
            formatted_quota: quota.formatted_quota(),
            quota: quota.clone(),
        }
    }
}

/// 面板快照
#[derive(Debug, Clone, Serialize)]
pub struct QuotaPanelView {
    pub account: Option<Account>,
    pub loading: bool,
    pub quotas: Vec<QuotaRow>,
}

/// 配额面板控制器
pub struct QuotaPanel {
    gateway: Arc<dyn AccountGateway>,
    notifier: Arc<dyn Notifier>,
    toggles: Arc<ToggleCoordinator>,
    state: RwLock<PanelState>,
    /// 正在加载的 generation，0 表示空闲
    loading: AtomicU64,
}

impl QuotaPanel {
    pub fn new(
        gateway: Arc<dyn AccountGateway>,
        notifier: Arc<dyn Notifier>,
        toggles: Arc<ToggleCoordinator>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            toggles,
            state: RwLock::new(PanelState::default()),
            loading: AtomicU64::new(0),
        }
    }

    pub async fn inspected(&self) -> Option<Account> {
        self.state.read().await.account.clone()
    }

    pub async fn quotas(&self) -> Vec<Quota> {
        self.state.read().await.quotas.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) != 0
    }

    pub async fn view(&self) -> QuotaPanelView {
        let state = self.state.read().await;
        QuotaPanelView {
            account: state.account.clone(),
            loading: self.loading.load(Ordering::SeqCst) != 0,
            quotas: state.quotas.iter().map(QuotaRow::from).collect(),
        }
    }

    /// 查看账号配额
    ///
    /// 先清空旧数据再发起请求，加载期间不会出现其他账号的配额。
    pub async fn open(&self, account: Account) -> AppResult<usize> {
        let cookie_id = account.cookie_id.clone();
        let (generation, _loading) = {
            let mut state = self.state.write().await;
            state.account = Some(account);
            state.quotas.clear();
            state.generation += 1;
            (state.generation, Loading::begin(&self.loading, state.generation))
        };

        let result = self.gateway.list_account_quotas(&cookie_id).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!("账号 {} 的配额结果已过期，丢弃", cookie_id);
            return result.map(|_| 0);
        }

        match result {
            Ok(payload) => {
                state.quotas = normalize_quotas(payload);
                info!("账号 {} 配额已加载: {} 个模型", cookie_id, state.quotas.len());
                Ok(state.quotas.len())
            }
            Err(e) => {
                drop(state);
                self.notifier.show(Notification::error(
                    "加载失败",
                    e.user_message("加载配额信息失败"),
                ));
                Err(e)
            }
        }
    }

    /// 关闭面板
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.account = None;
        state.quotas.clear();
        state.generation += 1;
        self.loading.store(0, Ordering::SeqCst);
    }

    /// 切换当前账号下某个模型的启用状态
    ///
    /// 远端确认后才按 `model_name` 更新本地条目，其余条目不变。
    pub async fn toggle_quota(&self, model_name: &str, current: Status) -> AppResult<Status> {
        let label = display_name(model_name).to_string();

        let inspected = {
            let state = self.state.read().await;
            state
                .account
                .as_ref()
                .map(|a| (a.cookie_id.clone(), state.generation))
        };
        let Some((cookie_id, generation)) = inspected else {
            let err = AppError::InvalidState("未选择账号".to_string());
            self.notifier.show(Notification::warning(
                "更新失败",
                err.user_message("更新模型状态失败"),
            ));
            return Err(err);
        };

        let cookie_id = cookie_id.as_str();
        let target = ToggleTarget::Quota {
            cookie_id,
            model_name,
        };
        let result = self
            .toggles
            .flip(target, ready(Ok(current)), |next| async move {
                self.gateway
                    .update_quota_status(cookie_id, model_name, next)
                    .await?;

                let mut state = self.state.write().await;
                if state.generation == generation {
                    for quota in state
                        .quotas
                        .iter_mut()
                        .filter(|q| q.model_name == model_name)
                    {
                        quota.status = next;
                    }
                }
                Ok(())
            })
            .await;

        match result {
            Ok(next) => {
                self.notifier.show(Notification::success(
                    "状态已更新",
                    format!("模型 {} 已{}", label, next.label()),
                ));
                Ok(next)
            }
            Err(e) => {
                let message = format!("模型 {}: {}", label, e.user_message("更新模型状态失败"));
                let notification = if e.is_local() {
                    Notification::warning("更新失败", message)
                } else {
                    Notification::error("更新失败", message)
                };
                self.notifier.show(notification);
                Err(e)
            }
        }
    }
}
