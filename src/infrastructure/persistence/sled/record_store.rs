//! Sled-based Record Store Implementation
//!
//! 本地/单节点部署使用的记录存储：键为记录路径，值为 JSON 对象

use async_trait::async_trait;
use serde_json::{Map, Value};
use sled::Db;

use crate::application::ports::{RecordStorePort, StoreError};
use crate::domain::voice::RecordPath;

/// Sled 存储配置
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/records.sled".to_string(),
        }
    }
}

/// Sled 记录存储
pub struct SledRecordStore {
    db: Db,
}

impl SledRecordStore {
    pub fn new(config: &SledStoreConfig) -> Result<Self, StoreError> {
        let db = sled::open(&config.db_path).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            records = db.len(),
            "SledRecordStore initialized"
        );

        Ok(Self { db })
    }

    /// 进程退出即销毁的临时存储
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(Self { db })
    }
}

/// 将 fields 合并进已有记录；已有值不是对象时整体替换
fn merge_record(existing: Option<&[u8]>, fields: &Map<String, Value>) -> Result<Vec<u8>, StoreError> {
    let mut record = match existing {
        Some(bytes) => match serde_json::from_slice::<Value>(bytes)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?
        {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        None => Map::new(),
    };
    record.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));

    serde_json::to_vec(&Value::Object(record))
        .map_err(|e| StoreError::SerializationError(e.to_string()))
}

#[async_trait]
impl RecordStorePort for SledRecordStore {
    async fn update(
        &self,
        path: &RecordPath,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let key = path.to_string();
        let mut merge_error = None;

        // update_and_fetch 在并发冲突时会重试闭包，同一路径上的合并是原子的
        self.db
            .update_and_fetch(key.as_bytes(), |old| {
                merge_error = None;
                match merge_record(old, &fields) {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        merge_error = Some(e);
                        old.map(|b| b.to_vec())
                    }
                }
            })
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        if let Some(e) = merge_error {
            return Err(e);
        }

        self.db
            .flush_async()
            .await
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::debug!(path = %path, "Sled record updated");
        Ok(())
    }

    async fn get(&self, path: &RecordPath) -> Result<Option<Value>, StoreError> {
        let key = path.to_string();
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?
        {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }
}
