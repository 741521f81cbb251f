//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Missing name or url")]
    MissingField,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Empty voiceId for {0}")]
    EmptyVoiceId(String),

    #[error("Invalid record path: {0}")]
    InvalidRecordPath(String),
}
