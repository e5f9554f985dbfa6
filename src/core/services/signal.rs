//! "账号已添加" 信号
//! 显式订阅，取代全局事件总线

use futures::future::join_all;
use std::sync::{Arc, RwLock};

use crate::core::traits::AccountAddedObserver;

#[derive(Default)]
pub struct AccountAddedSignal {
    observers: RwLock<Vec<Arc<dyn AccountAddedObserver>>>,
}

impl AccountAddedSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn AccountAddedObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(observer);
    }

    /// 通知全部观察者并等待其完成，返回通知数量
    pub async fn raise(&self) -> usize {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        tracing::debug!("account-added 通知 {} 个观察者", observers.len());
        join_all(observers.iter().map(|o| o.on_account_added())).await;
        observers.len()
    }
}
