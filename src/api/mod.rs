use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

mod account;
pub mod common;
mod notifications;
mod oauth;
mod quota;

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Account
        .route("/api/accounts", get(account::list_accounts))
        .route("/api/accounts/refresh", post(account::refresh_accounts))
        .route("/api/accounts/added", post(account::account_added))
        .route("/api/accounts/:id/toggle", post(account::toggle_account))
        .route("/api/accounts/:id", delete(account::delete_account))
        // OAuth
        .route("/api/oauth", get(oauth::get_flow))
        .route("/api/oauth/start", post(oauth::start_flow))
        .route("/api/oauth/input", put(oauth::set_input))
        .route("/api/oauth/open", post(oauth::open_target))
        .route("/api/oauth/submit", post(oauth::submit_callback))
        .route("/api/oauth/cancel", post(oauth::cancel_flow))
        // Quota
        .route("/api/quotas", get(quota::get_panel))
        .route("/api/quotas/open/:id", post(quota::open_panel))
        .route("/api/quotas/close", post(quota::close_panel))
        .route("/api/quotas/toggle", post(quota::toggle_quota))
        // Notifications
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/clear",
            post(notifications::clear_notifications),
        )
        // Health
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::NotificationLog;
    use crate::test_utils::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(gateway: Arc<FakeGateway>) -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::with_notifier(
            gateway,
            Arc::new(NotificationLog::default()),
        ));
        (build_routes(state.clone()), state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_refresh_then_list() {
        let gateway = FakeGateway::with_accounts(json!([
            account_json("c1", 1, 0),
            account_json("c2", 0, 1)
        ]));
        let (app, _) = app(gateway);

        let (status, body) = call(&app, Method::POST, "/api/accounts/refresh", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], 2);

        let (_, body) = call(&app, Method::GET, "/api/accounts", None).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["loading"], false);
        assert_eq!(body["data"]["accounts"][1]["cookie_id"], "c2");
        assert_eq!(body["data"]["accounts"][1]["is_shared"], 1);
    }

    #[tokio::test]
    async fn test_toggle_unknown_account_is_not_found() {
        let (app, _) = app(FakeGateway::new());

        let (status, body) = call(&app, Method::POST, "/api/accounts/c9/toggle", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_account_added_triggers_refresh() {
        let gateway = FakeGateway::new();
        let (app, state) = app(gateway.clone());
        assert!(state.accounts.is_empty().await);

        gateway.set_accounts(json!([account_json("linked", 1, 1)]));
        let (status, body) = call(&app, Method::POST, "/api/accounts/added", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], 1);
        assert_eq!(gateway.call_count(LIST_ACCOUNTS), 1);
        assert!(state.accounts.get("linked").await.is_some());
    }

    #[tokio::test]
    async fn test_delete_account_removes_locally() {
        let gateway = FakeGateway::with_accounts(json!([
            account_json("c1", 1, 0),
            account_json("c2", 1, 0)
        ]));
        let (app, state) = app(gateway.clone());
        state.accounts.refresh().await.unwrap();

        let (status, body) = call(&app, Method::DELETE, "/api/accounts/c1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(gateway.calls().contains(&"delete_account c1".to_string()));

        let (_, body) = call(&app, Method::GET, "/api/accounts", None).await;
        let accounts = body["data"]["accounts"].as_array().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0]["cookie_id"], "c2");
    }

    #[tokio::test]
    async fn test_gateway_failure_maps_to_bad_gateway() {
        let gateway = FakeGateway::with_accounts(json!([account_json("c1", 1, 0)]));
        let (app, state) = app(gateway.clone());
        state.accounts.refresh().await.unwrap();

        gateway.fail(DELETE_ACCOUNT, "locked");
        let (status, body) = call(&app, Method::DELETE, "/api/accounts/c1", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "locked");
        assert_eq!(state.accounts.len().await, 1);

        let (_, body) = call(&app, Method::GET, "/api/notifications", None).await;
        assert_eq!(body["data"]["notifications"][0]["severity"], "error");
        assert_eq!(body["data"]["notifications"][0]["placement"], "top-right");
    }

    #[tokio::test]
    async fn test_oauth_flow_over_http() {
        let gateway = FakeGateway::new();
        let (app, state) = app(gateway.clone());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/oauth/start",
            Some(json!({ "account_type": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "https://provider/auth?x=1");

        let (_, body) = call(
            &app,
            Method::PUT,
            "/api/oauth/input",
            Some(json!({ "callback_url": "http://localhost/cb?code=abc" })),
        )
        .await;
        assert_eq!(body["data"], "awaiting_callback");

        gateway.set_accounts(json!([account_json("c1", 1, 1)]));
        let (status, _) = call(&app, Method::POST, "/api/oauth/submit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(gateway
            .calls()
            .contains(&"submit_callback http://localhost/cb?code=abc".to_string()));
        assert_eq!(state.accounts.len().await, 1);

        let (_, body) = call(&app, Method::GET, "/api/oauth", None).await;
        assert_eq!(body["data"]["phase"], "idle");
    }

    #[tokio::test]
    async fn test_blank_submit_is_bad_request() {
        let gateway = FakeGateway::new();
        let (app, _) = app(gateway.clone());

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/oauth/submit",
            Some(json!({ "callback_url": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(gateway.call_count(SUBMIT_CALLBACK), 0);
    }

    #[tokio::test]
    async fn test_quota_panel_routes() {
        let gateway = FakeGateway::with_accounts(json!([account_json("c1", 1, 0)]));
        gateway.set_quotas("c1", json!([quota_json(1, "gemini-2.5-flash", 1)]));
        let (app, state) = app(gateway);
        state.accounts.refresh().await.unwrap();

        let (status, body) = call(&app, Method::POST, "/api/quotas/open/c1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["quotas"][0]["display_name"], "Gemini 2.5 Flash");
        assert_eq!(body["data"]["quotas"][0]["model_name"], "gemini-2.5-flash");

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/quotas/toggle",
            Some(json!({ "model_name": "gemini-2.5-flash", "status": 1 })),
        )
        .await;
        assert_eq!(body["data"], 0);

        let (_, body) = call(&app, Method::POST, "/api/quotas/close", None).await;
        assert_eq!(body["success"], true);
        let (_, body) = call(&app, Method::GET, "/api/quotas", None).await;
        assert!(body["data"]["account"].is_null());
    }

    #[tokio::test]
    async fn test_healthz() {
        let (app, _) = app(FakeGateway::new());
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
