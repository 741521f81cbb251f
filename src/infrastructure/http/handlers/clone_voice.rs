//! Clone Voice HTTP Handler

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::application::CloneVoice;
use crate::infrastructure::http::dto::CloneVoiceSuccess;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 解析请求体
///
/// 不看 Content-Type，空请求体按缺字段处理
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// 克隆音色
///
/// POST /cloneVoice {name, url}
pub async fn clone_voice(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CloneVoiceSuccess>, ApiError> {
    let payload = parse_body(&body)?;
    let command = CloneVoice::from_json(&payload)?;

    let response = state.clone_voice_handler.handle(command).await?;

    Ok(Json(CloneVoiceSuccess::new(response.voice_id)))
}
