use account_console::api::{build_routes, common};
use account_console::core::gateway::HttpGateway;
use account_console::core::storage::ConfigStorage;
use account_console::core::traits::{DefaultStorageConfig, StorageConfig};
use account_console::logger::init_logger;
use account_console::state::AppState;
use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径，默认 ~/.account_console/config.json
    #[arg(short, long, env = "CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// 网关根地址，覆盖配置文件
    #[arg(long, env = "GATEWAY_URL")]
    gateway_url: Option<String>,

    #[arg(long, env = "GATEWAY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigStorage::load_from(path)
            .with_context(|| format!("无法加载配置 {}", path.display()))?,
        None => {
            let storage = DefaultStorageConfig::new().map_err(anyhow::Error::msg)?;
            ConfigStorage::load(&storage)
                .with_context(|| format!("无法加载配置 {}", storage.config_path().display()))?
        }
    };

    if let Some(url) = args.gateway_url {
        config.gateway.base_url = url;
    }
    if let Some(key) = args.api_key {
        config.gateway.api_key = Some(key);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = Some(dir);
    }

    let _log_guard = init_logger(config.log_dir.as_deref());

    let base = ConfigStorage::validate(&config)?;
    tracing::info!("网关地址: {}", base);

    let gateway = Arc::new(HttpGateway::new(base, &config.gateway)?);
    let app_state = Arc::new(AppState::new(&config, gateway));

    // 启动时加载一次账号列表，失败不影响服务启动
    match app_state.accounts.refresh().await {
        Ok(count) => tracing::info!("启动时已加载 {} 个账号", count),
        Err(e) => tracing::warn!("启动时加载账号失败: {}", e),
    }

    let app = build_routes(app_state).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(common::request_logger))
            .layer(CorsLayer::permissive()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Console listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
