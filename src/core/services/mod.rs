//! 核心服务层
//! 账号、授权、配额三块控制器及其共用组件

pub mod account;
pub mod model_names;
pub mod notifications;
pub mod oauth;
pub mod quota;
pub mod signal;
pub mod toggle;

pub use account::AccountStore;
pub use notifications::NotificationLog;
pub use oauth::OAuthLinkFlow;
pub use quota::{QuotaPanel, QuotaPanelView, QuotaRow};
pub use signal::AccountAddedSignal;
pub use toggle::{InFlightGuard, ToggleCoordinator, ToggleTarget};
