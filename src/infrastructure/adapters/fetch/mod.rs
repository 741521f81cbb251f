//! Fetch Adapter - 参考音频下载

mod http_audio_fetcher;

pub use http_audio_fetcher::*;
