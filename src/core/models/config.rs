//! 控制台配置模型

use super::{GatewayConfig, Placement};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 控制台配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    pub gateway: GatewayConfig,
    pub notifications: NotificationConfig,
    pub server: ServerConfig,
    /// 日志目录，未配置时只输出到控制台
    pub log_dir: Option<PathBuf>,
}

/// 通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// 内存中保留的通知条数
    pub capacity: usize,
    pub placement: Placement,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            placement: Placement::TopRight,
        }
    }
}

/// 控制台 HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3100 }
    }
}
