//! 配置读取
//! 从 JSON 文件加载控制台配置，文件不存在时使用默认值，从不回写

use crate::core::models::ConsoleConfig;
use crate::core::traits::StorageConfig;
use crate::error::{AppError, AppResult};
use std::path::Path;

/// 配置存储服务
pub struct ConfigStorage;

impl ConfigStorage {
    /// 从默认位置加载
    pub fn load<S: StorageConfig>(storage: &S) -> AppResult<ConsoleConfig> {
        Self::load_from(&storage.config_path())
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> AppResult<ConsoleConfig> {
        if !path.exists() {
            tracing::info!("配置文件 {:?} 不存在，使用默认配置", path);
            return Ok(ConsoleConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("解析配置文件失败: {}", e)))?;

        Ok(config)
    }

    /// 校验网关地址，返回规范化后的根地址 (以 `/` 结尾)
    pub fn validate(config: &ConsoleConfig) -> AppResult<url::Url> {
        let mut base = url::Url::parse(config.gateway.base_url.trim())
            .map_err(|e| AppError::Config(format!("无效的网关地址: {}", e)))?;

        if base.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "无效的网关地址: {}",
                config.gateway.base_url
            )));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::DefaultStorageConfig;

    #[test]
    fn test_missing_file_yields_defaults() {
        let storage = DefaultStorageConfig::with_path(
            std::env::temp_dir().join("account-console-does-not-exist"),
        );
        let config = ConfigStorage::load(&storage).unwrap();
        assert_eq!(config.server.port, 3100);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "account-console-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "gateway": { "api_key": "secret" } }"#).unwrap();

        let config = ConfigStorage::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.gateway.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_validate_appends_trailing_slash() {
        let mut config = ConsoleConfig::default();
        config.gateway.base_url = "https://gw.example.com/admin".to_string();
        let base = ConfigStorage::validate(&config).unwrap();
        assert_eq!(base.as_str(), "https://gw.example.com/admin/");

        config.gateway.base_url = "not a url".to_string();
        assert!(matches!(
            ConfigStorage::validate(&config),
            Err(AppError::Config(_))
        ));
    }
}
