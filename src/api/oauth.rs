use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{into_response, ApiResponse};
use crate::core::models::AccountType;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartRequest {
    pub account_type: AccountType,
}

#[derive(Deserialize)]
pub struct CallbackInput {
    pub callback_url: String,
}

#[derive(Deserialize, Default)]
pub struct SubmitRequest {
    pub callback_url: Option<String>,
}

pub async fn get_flow(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::ok(state.oauth.snapshot().await).into_response()
}

pub async fn start_flow(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Response {
    into_response(state.oauth.start(req.account_type).await)
}

pub async fn set_input(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CallbackInput>,
) -> Response {
    into_response(state.oauth.set_callback_input(&req.callback_url).await)
}

pub async fn open_target(State(state): State<Arc<AppState>>) -> Response {
    into_response(state.oauth.open_authorization_target().await)
}

/// 未携带 `callback_url` 时提交已输入的内容
pub async fn submit_callback(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SubmitRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let result = match req.callback_url {
        Some(url) => state.oauth.submit(&url).await,
        None => state.oauth.submit_pending().await,
    };
    into_response(result)
}

pub async fn cancel_flow(State(state): State<Arc<AppState>>) -> Response {
    into_response(state.oauth.cancel().await)
}
