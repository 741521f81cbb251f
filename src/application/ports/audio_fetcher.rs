//! Audio Fetcher Port - 参考音频下载抽象
//!
//! 下载结果落在每次调用独享的临时文件中，`AudioSample` 被 drop 时文件即被删除

use async_trait::async_trait;
use std::path::Path;
use tempfile::TempPath;
use thiserror::Error;

use crate::domain::voice::{SourceUrl, VoiceName};

/// 下载错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Audio exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Upstream returned an empty body")]
    Empty,

    #[error("IO error: {0}")]
    IoError(String),
}

/// 已下载的参考音频
///
/// 持有临时文件路径，离开作用域时自动删除
#[derive(Debug)]
pub struct AudioSample {
    path: TempPath,
    len: u64,
    file_name: String,
    content_type: Option<String>,
}

impl AudioSample {
    pub fn new(
        path: TempPath,
        len: u64,
        file_name: impl Into<String>,
        content_type: Option<String>,
    ) -> Self {
        Self {
            path,
            len,
            file_name: file_name.into(),
            content_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 上传时使用的文件名（`<name>.<ext>`）
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// Audio Fetcher Port
#[async_trait]
pub trait AudioFetcherPort: Send + Sync {
    /// 下载 `url` 指向的音频到一个以 `name` 为前缀的新临时文件
    async fn fetch(&self, url: &SourceUrl, name: &VoiceName) -> Result<AudioSample, FetchError>;
}
