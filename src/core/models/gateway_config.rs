//! 远程账号网关配置

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    30
}

/// 网关连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// 网关根地址，例如 `http://127.0.0.1:8045/admin/`
    pub base_url: String,

    /// 管理密钥，配置后以 Bearer 方式携带
    pub api_key: Option<String>,

    /// 请求超时时间(秒)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 上游代理配置
    pub upstream_proxy: UpstreamProxyConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8045/admin/".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

/// 上游代理配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpstreamProxyConfig {
    /// 是否启用
    pub enabled: bool,
    /// 代理地址 (http://, https://, socks5://)
    pub url: String,
}
