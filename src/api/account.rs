use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::common::{into_response, ApiResponse};
use crate::core::models::Account;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AccountsView {
    pub accounts: Vec<Account>,
    pub loading: bool,
    pub refreshing: bool,
}

pub async fn list_accounts(State(state): State<Arc<AppState>>) -> Response {
    let store = &state.accounts;
    ApiResponse::ok(AccountsView {
        accounts: store.accounts().await,
        loading: store.is_loading().await,
        refreshing: store.is_refreshing().await,
    })
    .into_response()
}

pub async fn refresh_accounts(State(state): State<Arc<AppState>>) -> Response {
    into_response(state.accounts.refresh().await)
}

/// 外部完成账号关联后通知控制台
pub async fn account_added(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::ok(state.account_added.raise().await).into_response()
}

pub async fn toggle_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    into_response(state.accounts.toggle_account_status(&id).await)
}

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    into_response(state.accounts.remove(&id).await)
}
