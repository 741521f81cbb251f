//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::dto::ErrorResponse;
use crate::application::error::CloneVoiceError;

/// API 错误
///
/// 输入问题返回 400，其余阶段返回 500
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    CloneVoice(CloneVoiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CloneVoice(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::CloneVoice(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::BadRequest(msg) => ErrorResponse {
                error: Value::String(msg.clone()),
                stage: "input",
            },
            ApiError::CloneVoice(e) => {
                // 克隆服务的原始返回直接透传给调用方
                let error = match e {
                    CloneVoiceError::CloningService(inner) => inner
                        .payload()
                        .cloned()
                        .unwrap_or_else(|| Value::String(e.to_string())),
                    _ => Value::String(e.to_string()),
                };
                ErrorResponse {
                    error,
                    stage: e.stage(),
                }
            }
        }
    }
}

impl From<CloneVoiceError> for ApiError {
    fn from(e: CloneVoiceError) -> Self {
        ApiError::CloneVoice(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let response = self.body();

        match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(stage = response.stage, error = %msg, "Bad request");
            }
            ApiError::CloneVoice(e) if e.is_client_error() => {
                tracing::warn!(stage = response.stage, error = %e, "Invalid clone request");
            }
            ApiError::CloneVoice(CloneVoiceError::Persistence { voice_id, source }) => {
                tracing::error!(
                    stage = response.stage,
                    voice_id = %voice_id,
                    error = %source,
                    "Voice created upstream but record update failed"
                );
            }
            ApiError::CloneVoice(e) => {
                tracing::error!(stage = response.stage, error = %e, "Voice clone failed");
            }
        }

        (status, Json(response)).into_response()
    }
}
