//! 账号数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// 启用状态，账号与模型配额共用 (线上为 0/1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    Disabled,
    Enabled,
}

impl Status {
    pub fn toggled(self) -> Self {
        match self {
            Status::Enabled => Status::Disabled,
            Status::Disabled => Status::Enabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Status::Enabled
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Enabled => "启用",
            Status::Disabled => "禁用",
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Disabled),
            1 => Ok(Status::Enabled),
            other => Err(format!("invalid status: {}", other)),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Disabled => 0,
            Status::Enabled => 1,
        }
    }
}

/// 账号类型 (专属 / 共享)，创建后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccountType {
    Exclusive,
    Shared,
}

impl AccountType {
    pub fn label(self) -> &'static str {
        match self {
            AccountType::Exclusive => "专属",
            AccountType::Shared => "共享",
        }
    }
}

impl TryFrom<u8> for AccountType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountType::Exclusive),
            1 => Ok(AccountType::Shared),
            other => Err(format!("invalid account type: {}", other)),
        }
    }
}

impl From<AccountType> for u8 {
    fn from(kind: AccountType) -> Self {
        match kind {
            AccountType::Exclusive => 0,
            AccountType::Shared => 1,
        }
    }
}

/// 账号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub cookie_id: String,
    pub is_shared: AccountType,
    pub status: Status,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn with_status(&self, status: Status) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
