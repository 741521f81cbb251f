//! Voice Context - Value Objects

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 记录键中禁止出现的字符（Realtime Database 键约束）
const FORBIDDEN_KEY_CHARS: &[char] = &['.', '#', '$', '[', ']', '/'];

/// 记录键最大字节数
const MAX_KEY_BYTES: usize = 768;

/// 音色名称
///
/// 不变量:
/// - 去除首尾空白后非空
/// - 可作为记录路径的一段（不含 `. # $ [ ] /` 及控制字符）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, VoiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VoiceError::InvalidName("name must not be empty".to_string()));
        }
        if name.len() > MAX_KEY_BYTES {
            return Err(VoiceError::InvalidName(format!(
                "name must be at most {} bytes",
                MAX_KEY_BYTES
            )));
        }
        if let Some(c) = name
            .chars()
            .find(|c| FORBIDDEN_KEY_CHARS.contains(c) || c.is_control())
        {
            return Err(VoiceError::InvalidName(format!(
                "name contains forbidden character {:?}",
                c
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 适合用作临时文件名前缀的形式（仅保留字母数字、`-`、`_`）
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .take(64)
            .collect();
        stem
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参考音频来源 URL
///
/// 不变量: 绝对 URL，协议为 http 或 https
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl(Url);

impl SourceUrl {
    /// 无法从 URL 推断时使用的扩展名
    pub const DEFAULT_EXTENSION: &'static str = "m4a";

    pub fn parse(raw: &str) -> Result<Self, VoiceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(VoiceError::InvalidUrl("url must not be empty".to_string()));
        }
        let url = Url::parse(raw).map_err(|e| VoiceError::InvalidUrl(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(VoiceError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            ))),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// 从 URL 路径推断文件扩展名
    ///
    /// 只接受 1-5 个字母数字组成的扩展名，否则回退到 `m4a`
    pub fn extension(&self) -> String {
        self.0
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(|last| last.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| Self::DEFAULT_EXTENSION.to_string())
    }
}

impl std::fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 记录路径 - 键值存储中的层级键
///
/// 不变量: 至少一段，每段非空
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordPath(Vec<String>);

impl RecordPath {
    pub fn new<I, S>(segments: I) -> Result<Self, VoiceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(VoiceError::InvalidRecordPath(segments.join("/")));
        }
        Ok(Self(segments))
    }

    /// 各段已知非空时直接构造
    pub(super) fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for RecordPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
