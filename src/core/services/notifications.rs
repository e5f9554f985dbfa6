//! 通知日志
//! 内存环形缓冲区，同时把每条通知写入 tracing

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::models::{Notification, Placement, Severity};
use crate::core::traits::Notifier;

/// 已发出的通知
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub notification: Notification,
}

/// 通知日志（环形缓冲区）
pub struct NotificationLog {
    entries: RwLock<VecDeque<NotificationEntry>>,
    max_size: usize,
    placement: Placement,
    next_id: AtomicU64,
}

impl NotificationLog {
    pub fn new(max_size: usize, placement: Placement) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_size)),
            max_size,
            placement,
            next_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, VecDeque<NotificationEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<NotificationEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// 最新的在前
    pub fn recent(&self, limit: usize, offset: usize) -> Vec<NotificationEntry> {
        self.read()
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(200, Placement::default())
    }
}

impl Notifier for NotificationLog {
    fn show(&self, mut notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!("[{}] {}", notification.title, notification.message),
            Severity::Warning => tracing::warn!("[{}] {}", notification.title, notification.message),
            Severity::Success | Severity::Info => {
                tracing::info!("[{}] {}", notification.title, notification.message)
            }
        }

        notification.placement = self.placement;
        let entry = NotificationEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now(),
            notification,
        };

        let mut entries = self.write();

        // 超过最大容量时移除最旧的
        if entries.len() >= self.max_size {
            entries.pop_front();
        }

        entries.push_back(entry);
    }
}
