//! Persistence Layer - 记录持久化
//!
//! Firebase Realtime Database（默认）和 Sled（本地）两种 RecordStorePort 实现

pub mod firebase;
pub mod sled;

pub use self::firebase::{FirebaseRecordStore, FirebaseStoreConfig};
pub use self::sled::{SledRecordStore, SledStoreConfig};
