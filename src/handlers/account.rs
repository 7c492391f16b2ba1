use axum::{
    extract::{Form, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use maud::Markup;

use crate::{
    extractors::{AdminGuard, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    services::auth::Credentials,
    utils,
    views::{self, admin as admin_views, components::Notice},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::LOGIN_URL, get(login_page).post(login_post))
        .route(names::LOGOUT_URL, post(logout_post))
}

async fn login_page(State(state): State<AppState>, IsHtmx(is_htmx): IsHtmx) -> Markup {
    let enabled = state.config.current().admin_login_enabled();
    views::render(is_htmx, "Admin Access", admin_views::login(enabled, None))
}

async fn login_post(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let auth = state.admin_auth();

    match auth.login(&credentials).await {
        Ok(_) => {
            let token = state.admins.open().await;
            let cookie = utils::cookie(names::ADMIN_SESSION_COOKIE_NAME, &token, state.secure_cookies);

            let mut headers = HeaderMap::new();
            headers.insert(
                SET_COOKIE,
                HeaderValue::from_str(&cookie).reject("could not build session cookie")?,
            );
            headers.insert("HX-Redirect", HeaderValue::from_static(names::ADMIN_URL));
            Ok((headers, "").into_response())
        }
        Err(e) => {
            tracing::warn!("admin login for {} failed: {e}", credentials.email);
            let enabled = state.config.current().admin_login_enabled();
            Ok(views::titled(
                "Admin Access",
                admin_views::login(enabled, Some(&Notice::Error(e.to_string()))),
            )
            .into_response())
        }
    }
}

async fn logout_post(
    AdminGuard(token): AdminGuard,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    // The local session ends even if the backend call fails.
    if let Err(e) = state.admin_auth().logout().await {
        tracing::warn!("backend logout failed: {e}");
    }
    state.admins.close(&token).await;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&utils::expired_cookie(names::ADMIN_SESSION_COOKIE_NAME))
            .reject("could not build clear cookie")?,
    );
    headers.insert("HX-Redirect", HeaderValue::from_static(names::HOME_URL));

    Ok((headers, "").into_response())
}
