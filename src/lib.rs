rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod course;
pub mod db;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod statics;
pub mod utils;
pub mod views;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::{
    config::ConfigHandle,
    course::CourseSessions,
    services::{
        ai::AiService,
        auth::{AdminAuthService, AdminSessions},
        policy::PolicyStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub store: PolicyStore,
    pub config: ConfigHandle,
    pub http: reqwest::Client,
    pub courses: CourseSessions,
    pub admins: AdminSessions,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: db::Db, config: ConfigHandle, http: reqwest::Client, secure_cookies: bool) -> Self {
        Self {
            store: PolicyStore::new(db),
            config,
            http,
            courses: CourseSessions::new(),
            admins: AdminSessions::new(),
            secure_cookies,
        }
    }

    /// AI client bound to the configuration as it is right now.
    pub fn ai(&self) -> AiService {
        AiService::new(self.http.clone(), self.config.current())
    }

    pub fn admin_auth(&self) -> AdminAuthService {
        AdminAuthService::new(self.http.clone(), self.config.current())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::home::routes())
        .merge(handlers::policy::routes())
        .merge(handlers::course::routes())
        .merge(handlers::account::routes())
        .merge(handlers::admin::routes())
        .layer(middleware::from_fn(csrf_check))
        .nest("/static", statics::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn csrf_check(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;

    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            tracing::warn!("rejected {} {} without HX-Request", req.method(), req.uri());
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
