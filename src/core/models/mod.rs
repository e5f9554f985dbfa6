//! 核心数据模型

mod account;
mod config;
mod gateway_config;
mod notification;
mod oauth;
mod quota;
pub(crate) mod wire;

pub use account::{Account, AccountType, Status};
pub use config::{ConsoleConfig, NotificationConfig, ServerConfig};
pub use gateway_config::{GatewayConfig, UpstreamProxyConfig};
pub use notification::{Notification, Placement, Severity};
pub use oauth::{LinkPhase, LinkSession, LinkSnapshot, SubmissionState};
pub use quota::Quota;
