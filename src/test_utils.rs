//! 测试辅助：可编排的网关与记录型通知接收方

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::core::models::{AccountType, Notification, Severity, Status};
use crate::core::traits::{AccountGateway, Notifier};
use crate::error::{AppError, AppResult};

pub const LIST_ACCOUNTS: &str = "list_accounts";
pub const AUTHORIZATION_URL: &str = "authorization_url";
pub const SUBMIT_CALLBACK: &str = "submit_callback";
pub const UPDATE_ACCOUNT_STATUS: &str = "update_account_status";
pub const DELETE_ACCOUNT: &str = "delete_account";
pub const LIST_QUOTAS: &str = "list_quotas";
pub const UPDATE_QUOTA_STATUS: &str = "update_quota_status";

pub fn account_json(id: &str, status: u8, is_shared: u8) -> Value {
    json!({
        "cookie_id": id,
        "is_shared": is_shared,
        "status": status,
        "created_at": "2025-01-01T00:00:00Z",
        "last_used_at": null
    })
}

pub fn quota_json(id: u64, model: &str, status: u8) -> Value {
    json!({
        "quota_id": id,
        "model_name": model,
        "quota": "0.7500",
        "status": status,
        "reset_time": "2025-06-01T08:00:00Z"
    })
}

/// 内存网关，按操作名记录调用、注入失败、挂起请求
pub struct FakeGateway {
    accounts: Mutex<Value>,
    quotas: Mutex<HashMap<String, Value>>,
    auth_url: Mutex<String>,
    failures: Mutex<HashMap<&'static str, String>>,
    gates: Mutex<HashMap<&'static str, Arc<Semaphore>>>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(json!([])),
            quotas: Mutex::new(HashMap::new()),
            auth_url: Mutex::new("https://provider/auth?x=1".to_string()),
            failures: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_accounts(accounts: Value) -> Arc<Self> {
        let gateway = Self::default();
        *gateway.accounts.lock().unwrap() = accounts;
        Arc::new(gateway)
    }

    pub fn set_accounts(&self, accounts: Value) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn set_quotas(&self, cookie_id: &str, quotas: Value) {
        self.quotas
            .lock()
            .unwrap()
            .insert(cookie_id.to_string(), quotas);
    }

    pub fn set_auth_url(&self, url: &str) {
        *self.auth_url.lock().unwrap() = url.to_string();
    }

    pub fn fail(&self, op: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, message.to_string());
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    /// 之后的 `op` 调用会挂起，直到向返回的信号量添加许可
    pub fn hold(&self, op: &'static str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.lock().unwrap().insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    /// 等待 `op` 至少被调用一次
    pub async fn entered(&self, op: &str) {
        while self.call_count(op) == 0 {
            tokio::task::yield_now().await;
        }
    }

    async fn enter(&self, op: &'static str, detail: String) -> AppResult<()> {
        let entry = if detail.is_empty() {
            op.to_string()
        } else {
            format!("{} {}", op, detail)
        };
        self.calls.lock().unwrap().push(entry);

        let gate = self.gates.lock().unwrap().get(op).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match self.failures.lock().unwrap().get(op) {
            Some(message) => Err(AppError::Gateway(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountGateway for FakeGateway {
    async fn list_accounts(&self) -> AppResult<Value> {
        self.enter(LIST_ACCOUNTS, String::new()).await?;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn authorization_url(&self, account_type: AccountType) -> AppResult<String> {
        self.enter(AUTHORIZATION_URL, u8::from(account_type).to_string())
            .await?;
        Ok(self.auth_url.lock().unwrap().clone())
    }

    async fn submit_authorization_callback(&self, callback_url: &str) -> AppResult<()> {
        self.enter(SUBMIT_CALLBACK, callback_url.to_string()).await
    }

    async fn update_account_status(&self, cookie_id: &str, status: Status) -> AppResult<()> {
        self.enter(
            UPDATE_ACCOUNT_STATUS,
            format!("{} {}", cookie_id, u8::from(status)),
        )
        .await
    }

    async fn delete_account(&self, cookie_id: &str) -> AppResult<()> {
        self.enter(DELETE_ACCOUNT, cookie_id.to_string()).await
    }

    async fn list_account_quotas(&self, cookie_id: &str) -> AppResult<Value> {
        self.enter(LIST_QUOTAS, cookie_id.to_string()).await?;
        Ok(self
            .quotas
            .lock()
            .unwrap()
            .get(cookie_id)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    async fn update_quota_status(
        &self,
        cookie_id: &str,
        model_name: &str,
        status: Status,
    ) -> AppResult<()> {
        self.enter(
            UPDATE_QUOTA_STATUS,
            format!("{} {} {}", cookie_id, model_name, u8::from(status)),
        )
        .await
    }
}

/// 记录全部通知
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.shown.lock().unwrap().last().cloned()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}
