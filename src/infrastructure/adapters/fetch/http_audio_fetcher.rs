//! HTTP Audio Fetcher - 下载参考音频
//!
//! 实现 AudioFetcherPort trait，按块写入每次调用独享的临时文件

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{AudioFetcherPort, AudioSample, FetchError};
use crate::domain::voice::{SourceUrl, VoiceName};

/// 错误信息中保留的上游响应体长度
const MAX_ERROR_BODY: usize = 512;

/// HTTP 下载器配置
#[derive(Debug, Clone)]
pub struct HttpAudioFetcherConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 单个音频最大字节数
    pub max_bytes: u64,
    /// 临时文件目录，None 表示系统临时目录
    pub temp_dir: Option<PathBuf>,
}

impl Default for HttpAudioFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_bytes: 50 * 1024 * 1024,
            temp_dir: None,
        }
    }
}

impl HttpAudioFetcherConfig {
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

/// HTTP 音频下载器
pub struct HttpAudioFetcher {
    client: Client,
    config: HttpAudioFetcherConfig,
}

impl HttpAudioFetcher {
    pub fn new(config: HttpAudioFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn create_temp_file(&self, name: &VoiceName, ext: &str) -> Result<tempfile::NamedTempFile, FetchError> {
        let prefix = format!("{}-", name.file_stem());
        let suffix = format!(".{}", ext);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix);

        match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| FetchError::IoError(format!("Failed to create temp file: {}", e)))
    }
}

fn map_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl AudioFetcherPort for HttpAudioFetcher {
    async fn fetch(&self, url: &SourceUrl, name: &VoiceName) -> Result<AudioSample, FetchError> {
        let mut response = self
            .client
            .get(url.as_url().clone())
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(
                body.char_indices()
                    .nth(MAX_ERROR_BODY)
                    .map(|(i, _)| i)
                    .unwrap_or(body.len()),
            );
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let limit = self.config.max_bytes;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let ext = url.extension();
        let (file, path) = self.create_temp_file(name, &ext)?.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        // path 在任何提前返回时被 drop，临时文件随之删除
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(map_request_error)? {
            written += chunk.len() as u64;
            if written > limit {
                return Err(FetchError::TooLarge { limit });
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::IoError(e.to_string()))?;
        }
        file.flush()
            .await
            .map_err(|e| FetchError::IoError(e.to_string()))?;
        drop(file);

        let sample = AudioSample::new(path, written, format!("{}.{}", name, ext), content_type);
        if sample.is_empty() {
            return Err(FetchError::Empty);
        }

        tracing::debug!(
            url = %url,
            bytes = sample.len(),
            content_type = ?sample.content_type(),
            path = %sample.path().display(),
            "Audio downloaded to temp file"
        );

        Ok(sample)
    }
}
