//! Firebase Realtime Database Record Store
//!
//! 通过 REST API 实现 RecordStorePort:
//! - PATCH <database_url>/<path>.json   合并写入，缺失的父节点自动创建
//! - GET   <database_url>/<path>.json   读取，`null` 表示不存在

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::application::ports::{RecordStorePort, StoreError};
use crate::domain::voice::RecordPath;

/// Firebase 存储配置
#[derive(Debug, Clone)]
pub struct FirebaseStoreConfig {
    /// 数据库 URL
    pub database_url: String,
    /// `auth` 查询参数
    pub auth_token: Option<String>,
    /// `ns` 查询参数（模拟器）
    pub namespace: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl FirebaseStoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            auth_token: None,
            namespace: None,
            timeout_secs: 30,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }
}

/// Firebase Realtime Database 记录存储
///
/// 进程启动时创建一次，所有请求共享
pub struct FirebaseRecordStore {
    client: Client,
    base_url: Url,
    config: FirebaseStoreConfig,
}

impl FirebaseRecordStore {
    pub fn new(config: FirebaseStoreConfig) -> Result<Self, StoreError> {
        let base_url = Url::parse(&config.database_url).map_err(|e| {
            StoreError::DatabaseError(format!("Invalid database URL {}: {}", config.database_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::DatabaseError(format!(
                "Invalid database URL {}",
                config.database_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        tracing::info!(database_url = %base_url, "FirebaseRecordStore initialized");

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// 记录的 REST 地址，各段按 URL 规则编码
    fn record_url(&self, path: &RecordPath) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            let parts = path.segments();
            let last = parts.len() - 1;
            for (i, part) in parts.iter().enumerate() {
                if i == last {
                    segments.push(&format!("{}.json", part));
                } else {
                    segments.push(part);
                }
            }
        }
        {
            let mut query = url.query_pairs_mut();
            if let Some(token) = &self.config.auth_token {
                query.append_pair("auth", token);
            }
            if let Some(ns) = &self.config.namespace {
                query.append_pair("ns", ns);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_request_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::NetworkError("Request timeout".to_string())
    } else {
        StoreError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl RecordStorePort for FirebaseRecordStore {
    async fn update(
        &self,
        path: &RecordPath,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.record_url(path))
            .json(&Value::Object(fields))
            .send()
            .await
            .map_err(map_request_error)?;
        Self::check(response).await?;

        tracing::debug!(path = %path, "Firebase record updated");
        Ok(())
    }

    async fn get(&self, path: &RecordPath) -> Result<Option<Value>, StoreError> {
        let response = self
            .client
            .get(self.record_url(path))
            .send()
            .await
            .map_err(map_request_error)?;
        let value: Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }
}
