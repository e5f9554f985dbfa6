use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 用户输入不合法，未发起任何远程调用
    #[error("{0}")]
    Validation(String),

    /// 网关返回的业务错误
    #[error("{0}")]
    Gateway(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 当前状态不允许该操作
    #[error("{0}")]
    InvalidState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 同一实体已有进行中的变更
    #[error("Operation already in progress: {0}")]
    Busy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 面向操作员的错误文本，错误本身没有内容时回退到 `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }

    /// 是否在发起远程调用前就被拒绝
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidState(_)
                | AppError::NotFound(_)
                | AppError::Busy(_)
        )
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type AppResult<T> = Result<T, AppError>;
