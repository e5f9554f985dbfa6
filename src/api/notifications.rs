use super::common::ApiResponse;
use crate::core::services::notifications::NotificationEntry;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(serde::Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationEntry>,
    pub total: usize,
}

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NotificationQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(50);
    let offset = params.offset.unwrap_or(0);

    ApiResponse::ok(NotificationsResponse {
        notifications: state.notifications.recent(limit, offset),
        total: state.notifications.len(),
    })
    .into_response()
}

pub async fn clear_notifications(State(state): State<Arc<AppState>>) -> Response {
    state.notifications.clear();
    ApiResponse::ok(()).into_response()
}
