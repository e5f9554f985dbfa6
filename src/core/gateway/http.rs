//! 基于 HTTP 的远程账号网关

use async_trait::async_trait;
use reqwest::{Client, Method, Proxy};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::models::{AccountType, GatewayConfig, Status};
use crate::core::traits::AccountGateway;
use crate::error::{AppError, AppResult};

/// HTTP 网关
pub struct HttpGateway {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl HttpGateway {
    /// `base` 必须以 `/` 结尾，见 `ConfigStorage::validate`
    ///
    /// 请求超时取自 `timeout_secs`；启用上游代理时所有网关请求经由该代理，
    /// 代理地址无效视为配置错误。
    pub fn new(base: Url, config: &GatewayConfig) -> AppResult<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        let upstream = &config.upstream_proxy;
        if upstream.enabled && !upstream.url.trim().is_empty() {
            let proxy = Proxy::all(upstream.url.trim()).map_err(|e| {
                AppError::Config(format!("无效的上游代理 {}: {}", upstream.url, e))
            })?;
            builder = builder.proxy(proxy);
            info!("网关请求经由上游代理 {}", upstream.url);
        }

        Ok(Self {
            client: builder.build()?,
            base,
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("无效的网关地址: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> AppResult<Value> {
        debug!("gateway {} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(error_text)
                .unwrap_or_else(|| {
                    if text.trim().is_empty() {
                        format!("HTTP {}", status)
                    } else {
                        format!("HTTP {} - {}", status, text.trim())
                    }
                });
            warn!("网关请求失败: {}", message);
            return Err(AppError::Gateway(message));
        }

        unwrap_envelope(parsed.unwrap_or(Value::Null))
    }
}

/// 从错误响应中提取可读信息
fn error_text(body: &Value) -> Option<String> {
    ["error", "message", "detail"].iter().find_map(|key| {
        match body.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            nested @ Value::Object(_) => error_text(nested),
            _ => None,
        }
    })
}

/// 解开 `{success, data, error}` 包装，未包装的响应原样返回
fn unwrap_envelope(body: Value) -> AppResult<Value> {
    let Some(success) = body.get("success").and_then(Value::as_bool) else {
        return Ok(body);
    };

    if success {
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    } else {
        Err(AppError::Gateway(error_text(&body).unwrap_or_default()))
    }
}

#[async_trait]
impl AccountGateway for HttpGateway {
    async fn list_accounts(&self) -> AppResult<Value> {
        let url = self.endpoint(&["accounts"])?;
        self.send(Method::GET, url, None).await
    }

    async fn authorization_url(&self, account_type: AccountType) -> AppResult<String> {
        let mut url = self.endpoint(&["oauth", "authorize"])?;
        url.query_pairs_mut()
            .append_pair("is_shared", &u8::from(account_type).to_string());

        let body = self.send(Method::GET, url, None).await?;
        body.get("auth_url")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Gateway("响应中缺少 auth_url".to_string()))
    }

    async fn submit_authorization_callback(&self, callback_url: &str) -> AppResult<()> {
        let url = self.endpoint(&["oauth", "callback"])?;
        self.send(
            Method::POST,
            url,
            Some(json!({ "callback_url": callback_url })),
        )
        .await?;
        Ok(())
    }

    async fn update_account_status(&self, cookie_id: &str, status: Status) -> AppResult<()> {
        let url = self.endpoint(&["accounts", cookie_id, "status"])?;
        self.send(Method::PUT, url, Some(json!({ "status": status })))
            .await?;
        Ok(())
    }

    async fn delete_account(&self, cookie_id: &str) -> AppResult<()> {
        let url = self.endpoint(&["accounts", cookie_id])?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn list_account_quotas(&self, cookie_id: &str) -> AppResult<Value> {
        let url = self.endpoint(&["accounts", cookie_id, "quotas"])?;
        self.send(Method::GET, url, None).await
    }

    async fn update_quota_status(
        &self,
        cookie_id: &str,
        model_name: &str,
        status: Status,
    ) -> AppResult<()> {
        let url = self.endpoint(&["accounts", cookie_id, "quotas", "status"])?;
        self.send(
            Method::PUT,
            url,
            Some(json!({ "model_name": model_name, "status": status })),
        )
        .await?;
        Ok(())
    }
}
