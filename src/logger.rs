use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志系统
///
/// 控制台始终输出；配置了 `log_dir` 时额外按天滚动写入 `console.log`。
/// 返回的 guard 需要存活到进程退出，否则尾部日志会丢失。
pub fn init_logger(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // 捕获 log 宏输出
    let _ = tracing_log::LogTracer::init();

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    let mut dir_error = None;
    let (file_layer, guard) = match log_dir {
        Some(dir) => match fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, "console.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .boxed();
                (Some(layer), Some(guard))
            }
            Err(e) => {
                dir_error = Some(format!("无法创建日志目录 {}: {}", dir.display(), e));
                (None, None)
            }
        },
        None => (None, None),
    };

    // 重复初始化时忽略
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Some(message) = dir_error {
        warn!("{}，仅输出到控制台", message);
    } else if guard.is_some() {
        info!("日志系统已初始化 (控制台 + 文件)");
    } else {
        info!("日志系统已初始化 (控制台)");
    }

    guard
}
