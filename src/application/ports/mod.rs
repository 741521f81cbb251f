//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_fetcher;
mod record_store;
mod secrets;
mod voice_cloning;

pub use audio_fetcher::{AudioFetcherPort, AudioSample, FetchError};
pub use record_store::{RecordStorePort, StoreError};
pub use secrets::SecretProviderPort;
pub use voice_cloning::{ClonedVoice, CloningError, VoiceCloningPort};
