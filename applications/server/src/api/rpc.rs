/// Command envelope endpoint
use crate::{
    error::{Result, ServiceError},
    service::Reply,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// POST /api/rpc
///
/// Body is `{"cmd": ..., "params": {...}}`. Assembly runs on the blocking
/// pool so the runtime keeps serving other connections.
pub async fn rpc(State(app_state): State<AppState>, body: Bytes) -> Result<Response> {
    let service = app_state.service.clone();
    let reply = tokio::task::spawn_blocking(move || service.handle_json(&body))
        .await
        .map_err(|e| ServiceError::Internal(format!("request task failed: {}", e)))??;

    let response = match reply {
        Reply::Pong => StatusCode::NO_CONTENT.into_response(),
        Reply::Info(info) => Json(info).into_response(),
        Reply::Release(envelope) => Json(*envelope).into_response(),
    };
    Ok(response)
}
