//! Voiceclone - 音色克隆服务
//!
//! - Domain: voice/
//! - Application: commands, ports
//! - Infrastructure: http, persistence, adapters

use std::sync::Arc;

use voiceclone::application::RecordStorePort;
use voiceclone::config::{load_config, print_config, AppConfig, StoreBackend};
use voiceclone::infrastructure::adapters::{
    ElevenLabsClient, ElevenLabsClientConfig, EnvSecretProvider, HttpAudioFetcher,
    HttpAudioFetcherConfig,
};
use voiceclone::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voiceclone::infrastructure::persistence::{
    FirebaseRecordStore, FirebaseStoreConfig, SledRecordStore, SledStoreConfig,
};

/// 初始化日志，RUST_LOG 优先
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},voiceclone={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置创建记录存储（进程内只创建一次）
async fn create_record_store(config: &AppConfig) -> anyhow::Result<Arc<dyn RecordStorePort>> {
    match config.store.backend {
        StoreBackend::Firebase => {
            let firebase = &config.store.firebase;
            let mut store_config = FirebaseStoreConfig::new(&firebase.database_url);
            store_config.timeout_secs = firebase.timeout_secs;
            if let Some(token) = &firebase.auth_token {
                store_config = store_config.with_auth_token(token);
            }
            if let Some(ns) = &firebase.namespace {
                store_config = store_config.with_namespace(ns);
            }
            Ok(Arc::new(FirebaseRecordStore::new(store_config)?))
        }
        StoreBackend::Sled => {
            let path = &config.store.sled.path;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let store_config = SledStoreConfig {
                db_path: path.to_string_lossy().to_string(),
            };
            Ok(Arc::new(SledRecordStore::new(&store_config)?))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Voiceclone - 音色克隆服务");
    print_config(&config);

    // API Key 每次请求时读取；配置中显式给出时覆盖环境变量
    let mut secrets = EnvSecretProvider::new();
    if let Some(key) = &config.elevenlabs.api_key {
        secrets = secrets.with_override(&config.elevenlabs.api_key_secret, key);
    }

    // 参考音频下载器
    let mut fetch_config = HttpAudioFetcherConfig::default().with_max_bytes(config.fetch.max_bytes);
    fetch_config.timeout_secs = config.fetch.timeout_secs;
    if let Some(dir) = &config.fetch.temp_dir {
        tokio::fs::create_dir_all(dir).await?;
        fetch_config = fetch_config.with_temp_dir(dir);
    }
    let fetcher = Arc::new(HttpAudioFetcher::new(fetch_config)?);

    // ElevenLabs 客户端
    let cloner = Arc::new(ElevenLabsClient::new(
        ElevenLabsClientConfig::new(&config.elevenlabs.base_url)
            .with_timeout(config.elevenlabs.timeout_secs),
    )?);

    let record_store = create_record_store(&config).await?;

    let state = AppState::new(
        Arc::new(secrets),
        fetcher,
        cloner,
        record_store,
        &config.elevenlabs.api_key_secret,
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
