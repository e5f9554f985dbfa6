use std::sync::Arc;

use crate::core::models::ConsoleConfig;
use crate::core::services::{
    AccountAddedSignal, AccountStore, NotificationLog, OAuthLinkFlow, QuotaPanel,
    ToggleCoordinator,
};
use crate::core::traits::{AccountGateway, Notifier};

/// 控制台应用状态
///
/// 三个控制器共用同一个网关、通知日志和切换协调器；
/// 账号存储订阅 account-added 信号，授权完成后自动刷新。
pub struct AppState {
    pub accounts: Arc<AccountStore>,
    pub oauth: OAuthLinkFlow,
    pub quotas: QuotaPanel,
    pub notifications: Arc<NotificationLog>,
    pub account_added: Arc<AccountAddedSignal>,
}

impl AppState {
    pub fn new(config: &ConsoleConfig, gateway: Arc<dyn AccountGateway>) -> Self {
        let notifications = Arc::new(NotificationLog::new(
            config.notifications.capacity,
            config.notifications.placement,
        ));
        Self::with_notifier(gateway, notifications)
    }

    pub fn with_notifier(
        gateway: Arc<dyn AccountGateway>,
        notifications: Arc<NotificationLog>,
    ) -> Self {
        let notifier: Arc<dyn Notifier> = notifications.clone();
        let toggles = Arc::new(ToggleCoordinator::new());
        let account_added = Arc::new(AccountAddedSignal::new());

        let accounts = Arc::new(AccountStore::new(
            gateway.clone(),
            notifier.clone(),
            toggles.clone(),
        ));
        account_added.subscribe(accounts.clone());

        Self {
            oauth: OAuthLinkFlow::new(gateway.clone(), notifier.clone(), account_added.clone()),
            quotas: QuotaPanel::new(gateway, notifier, toggles),
            accounts,
            notifications,
            account_added,
        }
    }
}
