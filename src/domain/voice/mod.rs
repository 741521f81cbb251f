//! Voice Context - 音色克隆限界上下文
//!
//! 职责:
//! - 克隆请求校验（名称、来源 URL）
//! - 角色音色设置记录（路径与字段）

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{CharacterVoiceSetting, CloneRequest};
pub use errors::VoiceError;
pub use value_objects::{RecordPath, SourceUrl, VoiceName};
