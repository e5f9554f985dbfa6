//! 远程账号网关
//! trait 定义见 `core::traits::AccountGateway`

pub mod http;
pub mod payload;

pub use http::HttpGateway;
pub use payload::{normalize_accounts, normalize_quotas};
