//! 配额数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{wire, Status};

/// 单个模型的配额条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    #[serde(deserialize_with = "wire::string_or_number")]
    pub quota_id: String,
    pub model_name: String,
    /// 剩余额度，只展示不修改
    #[serde(deserialize_with = "wire::decimal")]
    pub quota: f64,
    pub status: Status,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub reset_time: Option<DateTime<Utc>>,
}

impl Quota {
    /// 四位小数展示
    pub fn formatted_quota(&self) -> String {
        format!("{:.4}", self.quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quota_accepts_string_decimal_and_numeric_id() {
        let quota: Quota = serde_json::from_value(json!({
            "quota_id": 42,
            "model_name": "gemini-2.5-pro",
            "quota": "0.51234",
            "status": 1,
            "reset_time": "2025-06-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(quota.quota_id, "42");
        assert_eq!(quota.formatted_quota(), "0.5123");
        assert!(quota.reset_time.is_some());
    }

    #[test]
    fn test_quota_without_reset_time() {
        let quota: Quota = serde_json::from_value(json!({
            "quota_id": "q1",
            "model_name": "claude-sonnet-4-5",
            "quota": 3,
            "status": 0
        }))
        .unwrap();

        assert_eq!(quota.status, Status::Disabled);
        assert!(quota.reset_time.is_none());
    }
}
