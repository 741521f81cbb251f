//! Domain Layer - 领域层
//!
//! Voice Context: 音色克隆请求与角色音色设置

pub mod voice;
