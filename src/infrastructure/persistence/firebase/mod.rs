//! Firebase Realtime Database 存储实现

mod realtime_db;

pub use realtime_db::{FirebaseRecordStore, FirebaseStoreConfig};
