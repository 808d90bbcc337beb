pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod import;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use config::Config;
use state::AppState;
use storage::ArticleStore;

/// 初始化日志，过滤规则读取环境变量 `INSIGHTS_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("INSIGHTS_LOG"))
        .init();
}

/// 启动服务
///
/// 数据库在监听端口之前初始化，初始化失败直接返回错误，不对外提供服务。
pub async fn run() -> error::Result<()> {
    init_tracing();

    let config = Config::load()?;
    let store = ArticleStore::new(&config.database_path);
    store.connection().await?;

    api::run_server(AppState::new(store), &config.listen_addr).await
}
