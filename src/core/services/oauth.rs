//! OAuth 账号关联流程
//! 申请授权链接 -> 操作员在浏览器完成授权 -> 粘贴回调地址 -> 网关完成关联

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::models::{
    AccountType, LinkPhase, LinkSession, LinkSnapshot, Notification, SubmissionState,
};
use crate::core::services::AccountAddedSignal;
use crate::core::traits::{AccountGateway, Notifier};
use crate::error::{AppError, AppResult};

struct FlowState {
    phase: LinkPhase,
    session: Option<LinkSession>,
    /// 每次 start / cancel / 完成都会递增，用于忽略过期的授权链接响应
    ticket: u64,
}

impl FlowState {
    fn reset(&mut self) {
        self.phase = LinkPhase::Idle;
        self.session = None;
        self.ticket += 1;
    }

    fn session_mut(&mut self, submitting: bool) -> AppResult<&mut LinkSession> {
        if submitting {
            return Err(AppError::InvalidState("正在提交，输入已锁定".to_string()));
        }
        match self.phase {
            LinkPhase::Idle => Err(AppError::InvalidState("没有进行中的授权".to_string())),
            _ => self
                .session
                .as_mut()
                .ok_or_else(|| AppError::InvalidState("没有进行中的授权".to_string())),
        }
    }
}

/// 回调提交占位
///
/// 持有期间对外呈现 Completing。请求被中途丢弃时随之释放，
/// 会话停在 AwaitingCallback 并保留输入，可以重新提交或取消。
struct Submitting<'a>(&'a AtomicBool);

impl<'a> Submitting<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// OAuth 关联流程
pub struct OAuthLinkFlow {
    gateway: Arc<dyn AccountGateway>,
    notifier: Arc<dyn Notifier>,
    account_added: Arc<AccountAddedSignal>,
    state: RwLock<FlowState>,
    submitting: AtomicBool,
}

impl OAuthLinkFlow {
    pub fn new(
        gateway: Arc<dyn AccountGateway>,
        notifier: Arc<dyn Notifier>,
        account_added: Arc<AccountAddedSignal>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            account_added,
            state: RwLock::new(FlowState {
                phase: LinkPhase::Idle,
                session: None,
                ticket: 0,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    fn visible_phase(&self, state: &FlowState) -> LinkPhase {
        if self.is_submitting() {
            LinkPhase::Completing
        } else {
            state.phase
        }
    }

    pub async fn phase(&self) -> LinkPhase {
        let state = self.state.read().await;
        self.visible_phase(&state)
    }

    pub async fn snapshot(&self) -> LinkSnapshot {
        let state = self.state.read().await;
        let session = state.session.as_ref();
        let phase = self.visible_phase(&state);
        LinkSnapshot {
            phase,
            submission_state: SubmissionState::from(phase),
            account_type: session.map(|s| s.account_type),
            authorize_url: session.map(|s| s.authorize_url.clone()),
            callback_input: session.map(|s| s.callback_input.clone()),
        }
    }

    /// 为指定账号类型申请授权链接
    ///
    /// 已有的会话会被丢弃；失败时保持 Idle，不留下半成品会话。
    pub async fn start(&self, account_type: AccountType) -> AppResult<String> {
        let ticket = {
            let mut state = self.state.write().await;
            if self.is_submitting() {
                let err = AppError::InvalidState("正在提交授权回调".to_string());
                drop(state);
                self.notifier.show(Notification::warning(
                    "获取授权链接失败",
                    err.user_message("获取授权链接失败"),
                ));
                return Err(err);
            }
            state.reset();
            state.ticket
        };

        let result = self.gateway.authorization_url(account_type).await;

        let mut state = self.state.write().await;
        if state.ticket != ticket {
            debug!("授权链接返回时流程已取消或重新开始，忽略");
            return Err(AppError::InvalidState("授权流程已取消".to_string()));
        }

        match result {
            Ok(url) => {
                info!("已获取{}账号授权链接", account_type.label());
                state.session = Some(LinkSession::new(account_type, url.clone()));
                state.phase = LinkPhase::AwaitingAuthorization;
                Ok(url)
            }
            Err(e) => {
                drop(state);
                self.notifier.show(Notification::error(
                    "获取授权链接失败",
                    e.user_message("获取授权链接失败"),
                ));
                Err(e)
            }
        }
    }

    /// 打开授权页面，可重复调用
    pub async fn open_authorization_target(&self) -> AppResult<String> {
        let state = self.state.read().await;
        let session = match state.phase {
            LinkPhase::Idle => None,
            _ => state.session.as_ref(),
        }
        .ok_or_else(|| AppError::InvalidState("没有进行中的授权".to_string()))?;

        info!("打开授权页面: {}", session.authorize_url);
        Ok(session.authorize_url.clone())
    }

    /// 更新操作员粘贴的回调地址
    pub async fn set_callback_input(&self, text: &str) -> AppResult<LinkPhase> {
        let mut state = self.state.write().await;
        let session = state.session_mut(self.is_submitting())?;
        session.callback_input = text.to_string();
        let has_input = session.has_input();
        state.phase = if has_input {
            LinkPhase::AwaitingCallback
        } else {
            LinkPhase::AwaitingAuthorization
        };
        Ok(state.phase)
    }

    /// 提交回调地址
    ///
    /// 空白输入在任何远程调用前被拒绝。成功后回到 Idle 并发出 "账号已添加"
    /// 信号；失败时回到 AwaitingCallback，保留已输入的内容。
    pub async fn submit(&self, callback_text: &str) -> AppResult<()> {
        if callback_text.trim().is_empty() {
            self.notifier
                .show(Notification::warning("输入错误", "请输入回调地址"));
            return Err(AppError::Validation("请输入回调地址".to_string()));
        }

        let submitting = {
            let mut state = self.state.write().await;
            let Some(claim) = Submitting::claim(&self.submitting) else {
                return Err(AppError::Busy("授权回调正在提交".to_string()));
            };
            if let Some(e) = state.session_mut(false).err() {
                drop(state);
                drop(claim);
                self.notifier
                    .show(Notification::warning("提交失败", e.user_message("提交回调失败")));
                return Err(e);
            }
            if let Some(session) = state.session.as_mut() {
                session.callback_input = callback_text.to_string();
            }
            // 提交中断或被拒绝时回到这里
            state.phase = LinkPhase::AwaitingCallback;
            claim
        };

        let result = self
            .gateway
            .submit_authorization_callback(callback_text.trim())
            .await;

        match result {
            Ok(()) => {
                self.state.write().await.reset();
                drop(submitting);
                info!("授权回调已接受，账号关联完成");
                self.notifier
                    .show(Notification::success("添加成功", "账号已成功添加"));
                self.account_added.raise().await;
                Ok(())
            }
            Err(e) => {
                drop(submitting);
                self.notifier.show(Notification::error(
                    "提交失败",
                    e.user_message("提交回调失败"),
                ));
                Err(e)
            }
        }
    }

    /// 提交当前已输入的回调地址
    pub async fn submit_pending(&self) -> AppResult<()> {
        let input = self
            .state
            .read()
            .await
            .session
            .as_ref()
            .map(|s| s.callback_input.clone())
            .unwrap_or_default();
        self.submit(&input).await
    }

    /// 取消授权，仅重置本地状态，不通知网关
    pub async fn cancel(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        if self.is_submitting() {
            return Err(AppError::InvalidState("正在提交，无法取消".to_string()));
        }
        state.reset();
        Ok(())
    }
}
