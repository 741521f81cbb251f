//! Sled 存储实现

mod record_store;

pub use record_store::{SledRecordStore, SledStoreConfig};
