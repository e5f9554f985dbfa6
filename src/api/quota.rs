use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{into_response, ApiResponse};
use crate::core::models::Status;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ToggleQuotaRequest {
    pub model_name: String,
    /// 操作员看到的当前状态
    pub status: Status,
}

pub async fn get_panel(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::ok(state.quotas.view().await).into_response()
}

pub async fn open_panel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(account) = state.accounts.get(&id).await else {
        return AppError::NotFound(format!("账号不存在: {}", id)).into_response();
    };
    if let Err(e) = state.quotas.open(account).await {
        return e.into_response();
    }
    ApiResponse::ok(state.quotas.view().await).into_response()
}

pub async fn close_panel(State(state): State<Arc<AppState>>) -> Response {
    state.quotas.close().await;
    ApiResponse::ok(()).into_response()
}

pub async fn toggle_quota(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleQuotaRequest>,
) -> Response {
    into_response(state.quotas.toggle_quota(&req.model_name, req.status).await)
}
