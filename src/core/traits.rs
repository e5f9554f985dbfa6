//! 核心 trait 定义
//! 用于解耦编排逻辑与网关、通知、存储等外部协作方

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::core::models::{AccountType, Notification, Status};
use crate::error::AppResult;

/// 远程账号网关
/// 账号存储、OAuth 换取令牌、配额计算都在远端完成，这里只描述请求
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// 账号列表，原样返回 (数组或 `{accounts: [...]}`)
    async fn list_accounts(&self) -> AppResult<Value>;

    /// 获取指定账号类型的授权链接
    async fn authorization_url(&self, account_type: AccountType) -> AppResult<String>;

    /// 提交授权完成后浏览器地址栏中的回调地址
    async fn submit_authorization_callback(&self, callback_url: &str) -> AppResult<()>;

    async fn update_account_status(&self, cookie_id: &str, status: Status) -> AppResult<()>;

    async fn delete_account(&self, cookie_id: &str) -> AppResult<()>;

    /// 账号的模型配额列表，原样返回
    async fn list_account_quotas(&self, cookie_id: &str) -> AppResult<Value>;

    async fn update_quota_status(
        &self,
        cookie_id: &str,
        model_name: &str,
        status: Status,
    ) -> AppResult<()>;
}

/// 通知接收方
/// 控制台在每条成功与失败路径上调用，不做重试与排队
pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}

/// 空通知接收方
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn show(&self, _notification: Notification) {}
}

/// "账号已添加" 观察者
#[async_trait]
pub trait AccountAddedObserver: Send + Sync {
    async fn on_account_added(&self);
}

/// 存储配置 trait
/// 只读：控制台不在本地持久化任何会话数据
pub trait StorageConfig: Send + Sync {
    /// 获取数据目录路径
    fn data_dir(&self) -> PathBuf;

    /// 获取配置文件路径
    fn config_path(&self) -> PathBuf {
        self.data_dir().join("config.json")
    }
}

/// 默认存储配置 (使用 ~/.account_console/)
pub struct DefaultStorageConfig {
    data_dir: PathBuf,
}

impl DefaultStorageConfig {
    pub fn new() -> Result<Self, String> {
        let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
        Ok(Self {
            data_dir: home.join(".account_console"),
        })
    }

    /// 从指定路径创建
    pub fn with_path(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

impl StorageConfig for DefaultStorageConfig {
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}
