//! Record Store Port - 远程键值存储抽象
//!
//! 只暴露合并写入（partial update）与读取两种操作

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::voice::RecordPath;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Store rejected request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Record Store Port
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// 将 `fields` 合并写入 `path` 处的记录
    ///
    /// 未出现在 `fields` 中的字段保持不变；记录不存在时创建
    async fn update(&self, path: &RecordPath, fields: Map<String, Value>)
        -> Result<(), StoreError>;

    /// 读取 `path` 处的记录，不存在时返回 `None`
    async fn get(&self, path: &RecordPath) -> Result<Option<Value>, StoreError>;
}
