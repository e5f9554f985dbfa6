//! 核心模块
//! 网关访问与控制器逻辑，不依赖 HTTP 服务层

pub mod gateway;
pub mod models;
pub mod services;
pub mod storage;
pub mod traits;

// 重导出常用类型
pub use traits::{
    AccountAddedObserver, AccountGateway, DefaultStorageConfig, NoopNotifier, Notifier,
    StorageConfig,
};
