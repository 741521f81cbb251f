//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StoreBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOICECLONE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOICECLONE_SERVER__PORT=8080`
/// - `VOICECLONE_STORE__BACKEND=sled`
/// - `VOICECLONE_STORE__FIREBASE__DATABASE_URL=https://demo-default-rtdb.firebaseio.com`
/// - `VOICECLONE_ELEVENLABS__API_KEY_SECRET=ELEVEN_API_KEY`
///
/// API Key 本身不需要出现在配置里，请求时从 `elevenlabs.api_key_secret`
/// 指定的环境变量读取。
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.max_body_bytes", 1024 * 1024)?
        .set_default("elevenlabs.base_url", "https://api.elevenlabs.io/v1")?
        .set_default("elevenlabs.api_key_secret", "ELEVEN_API_KEY")?
        .set_default("elevenlabs.timeout_secs", 120)?
        .set_default("fetch.timeout_secs", 60)?
        .set_default("fetch.max_bytes", 50_u64 * 1024 * 1024)?
        .set_default("store.backend", "firebase")?
        .set_default("store.firebase.database_url", "")?
        .set_default("store.firebase.timeout_secs", 30)?
        .set_default("store.sled.path", "data/records.sled")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VOICECLONE_STORE__SLED__PATH=/data/records.sled
    builder = builder.add_source(
        Environment::with_prefix("VOICECLONE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.elevenlabs.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "ElevenLabs base URL cannot be empty".to_string(),
        ));
    }

    if config.elevenlabs.api_key_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "ElevenLabs API key secret name cannot be empty".to_string(),
        ));
    }

    if config.fetch.max_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Fetch max_bytes cannot be 0".to_string(),
        ));
    }

    match config.store.backend {
        StoreBackend::Firebase if config.store.firebase.database_url.is_empty() => {
            return Err(ConfigError::ValidationError(
                "Firebase database_url is required for the firebase backend".to_string(),
            ));
        }
        StoreBackend::Sled if config.store.sled.path.as_os_str().is_empty() => {
            return Err(ConfigError::ValidationError(
                "Sled path is required for the sled backend".to_string(),
            ));
        }
        _ => {}
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，凭据只显示是否已设置）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body: {} bytes", config.server.max_body_bytes);
    tracing::info!("ElevenLabs URL: {}", config.elevenlabs.base_url);
    tracing::info!(
        "ElevenLabs API Key: {}",
        if config.elevenlabs.api_key.is_some() {
            "<configured>".to_string()
        } else {
            format!("from ${}", config.elevenlabs.api_key_secret)
        }
    );
    tracing::info!("ElevenLabs Timeout: {}s", config.elevenlabs.timeout_secs);
    tracing::info!("Fetch Timeout: {}s", config.fetch.timeout_secs);
    tracing::info!("Fetch Max Size: {} bytes", config.fetch.max_bytes);
    tracing::info!("Store Backend: {}", config.store.backend);
    match config.store.backend {
        StoreBackend::Firebase => {
            tracing::info!("Firebase URL: {}", config.store.firebase.database_url);
            tracing::info!(
                "Firebase Auth: {}",
                if config.store.firebase.auth_token.is_some() {
                    "<configured>"
                } else {
                    "<none>"
                }
            );
        }
        StoreBackend::Sled => {
            tracing::info!("Sled Path: {:?}", config.store.sled.path);
        }
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.firebase.database_url = "https://demo.firebaseio.com".to_string();
        config
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_missing_firebase_url() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_sled_backend_does_not_need_firebase_url() {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Sled;
        assert!(validate_config(&config).is_ok());

        config.store.sled.path = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_max_bytes() {
        let mut config = valid_config();
        config.fetch.max_bytes = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voiceclone.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[store]
backend = "sled"

[store.sled]
path = "/tmp/records.sled"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.store.backend, StoreBackend::Sled);
        assert_eq!(config.store.sled.path, PathBuf::from("/tmp/records.sled"));
        assert_eq!(config.fetch.max_bytes, 50 * 1024 * 1024);
    }
}
