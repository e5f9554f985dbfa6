//! 网关响应归一化
//! 结构不符的响应视为空集合，而不是向上传播错误

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use crate::core::models::{Account, Quota};

/// 取出集合：数组本身，或对象中名为 `field` 的数组字段
fn collection(payload: Value, field: &str) -> Option<Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// 整体解码，任一条目失败则整批丢弃，避免新旧数据混杂
fn decode_all<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    let mut decoded = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item) {
            Ok(entry) => decoded.push(entry),
            Err(e) => {
                warn!("{}响应格式异常，按空列表处理: {}", what, e);
                return Vec::new();
            }
        }
    }
    decoded
}

/// 账号列表归一化，并保证 cookie_id 唯一 (保留首次出现)
pub fn normalize_accounts(payload: Value) -> Vec<Account> {
    let Some(items) = collection(payload, "accounts") else {
        warn!("账号列表响应既不是数组也不包含 accounts 字段，按空列表处理");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    decode_all::<Account>(items, "账号列表")
        .into_iter()
        .filter(|account| {
            let fresh = seen.insert(account.cookie_id.clone());
            if !fresh {
                warn!("账号列表中存在重复的 cookie_id: {}", account.cookie_id);
            }
            fresh
        })
        .collect()
}

/// 配额列表归一化
pub fn normalize_quotas(payload: Value) -> Vec<Quota> {
    let Some(items) = collection(payload, "quotas") else {
        warn!("配额响应不是列表，按空列表处理");
        return Vec::new();
    };
    decode_all(items, "配额")
}
