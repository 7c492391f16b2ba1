#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response},
    Router,
};
use policy_portal::{
    config::{AppConfig, ConfigHandle},
    db::Db,
    router, AppState,
};
use tower::ServiceExt;

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "policy_portal_test_{}_{}.db",
        std::process::id(),
        id
    ));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("file:{}", path.display());
    Db::new(url, String::new())
        .await
        .expect("failed to create test database")
}

pub async fn test_state(config: AppConfig) -> AppState {
    state_on(create_test_db().await, config)
}

pub fn state_on(db: Db, config: AppConfig) -> AppState {
    AppState::new(
        db,
        ConfigHandle::new(config),
        reqwest::Client::new(),
        false,
    )
}

pub async fn app() -> (Router, AppState) {
    let state = test_state(AppConfig::default()).await;
    (router(state.clone()), state)
}

/// Build an htmx request, optionally carrying a cookie and a url-encoded form.
pub fn htmx(method: Method, uri: &str, cookie: Option<&str>, form: Option<&str>) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header("HX-Request", "true");
    if let Some(cookie) = cookie {
        req = req.header("cookie", cookie);
    }
    let body = match form {
        Some(form) => {
            req = req.header("content-type", "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    req.body(body).expect("request build should succeed")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("router should respond")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

/// `name=value` part of the first Set-Cookie header.
pub fn set_cookie(resp: &Response<Body>) -> String {
    resp.headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("response should set a cookie")
        .to_string()
}

/// Url-encode form pairs; repeated keys are kept in order.
pub fn form(pairs: &[(&str, &str)]) -> String {
    reqwest::Url::parse_with_params("http://localhost/", pairs)
        .expect("pairs should encode")
        .query()
        .unwrap_or_default()
        .to_string()
}
