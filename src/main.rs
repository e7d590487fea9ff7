use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use users_cql::build_app;
use users_cql::infrastructure::{
    config::{load_config, Config, StorageBackend},
    database::{CassandraStore, UserStore},
    logger::Logger,
    memory::MemoryStore,
    schema::{SchemaError, SchemaLoader},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    Logger::init(&config.logging.level);

    info!("启动用户服务...");

    // schema 初始化完成之前不接受请求
    let store: Arc<dyn UserStore> = match config.cassandra.backend {
        StorageBackend::Cassandra => {
            let store = CassandraStore::connect(&config.cassandra).await?;
            load_schema(&store, &config).await?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            info!("使用内存存储");
            let store = MemoryStore::new();
            load_schema(&store, &config).await?;
            Arc::new(store)
        }
    };

    let app = build_app(store);

    let listener = TcpListener::bind(config.listen_address()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 用户服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /users         - 获取所有用户");
    info!("   POST   /users         - 创建或覆盖用户");
    info!("   GET    /users/:id     - 获取特定用户");
    info!("   DELETE /users/:id     - 删除用户");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn load_schema(store: &dyn UserStore, config: &Config) -> Result<(), SchemaError> {
    SchemaLoader::new(store, &config.cassandra.keyspace)
        .run(&config.schema.schema_script, &config.schema.data_script)
        .await
        .map_err(|e| {
            error!("schema 初始化失败: {}", e);
            e
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("监听 Ctrl-C 失败: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号");
}
