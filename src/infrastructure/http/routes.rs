//! HTTP Routes
//!
//! API Endpoints:
//! - /cloneVoice  POST  下载参考音频、克隆音色并写入 voiceId
//! - /ping        GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cloneVoice", post(handlers::clone_voice))
        .route("/ping", get(handlers::ping))
}
