//! ElevenLabs Adapter - 音色克隆客户端

mod elevenlabs_client;

pub use elevenlabs_client::*;
