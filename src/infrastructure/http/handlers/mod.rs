//! HTTP Handlers

mod clone_voice;
mod ping;

pub use clone_voice::*;
pub use ping::*;
