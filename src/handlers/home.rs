use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use maud::Markup;
use serde::Deserialize;

use crate::{
    extractors::IsHtmx,
    names,
    rejections::{AppError, ResultExt},
    views::{self, home as home_views},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::HOME_URL, get(home))
        .route(names::SEARCH_URL, get(search))
}

#[derive(Deserialize, Default)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn home(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Query(query): Query<SearchQuery>,
) -> Result<Markup, AppError> {
    let policies = state
        .store
        .list_policies()
        .await
        .reject("could not load policies")?;
    let bundles = state
        .store
        .list_bundles()
        .await
        .reject("could not load bundles")?;

    Ok(views::render(
        is_htmx,
        "Library",
        home_views::home(&policies, &bundles, &query.q),
    ))
}

/// Catalog fragment swapped in while the learner types.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Markup, AppError> {
    let policies = state
        .store
        .list_policies()
        .await
        .reject("could not load policies")?;
    let bundles = state
        .store
        .list_bundles()
        .await
        .reject("could not load bundles")?;

    Ok(home_views::catalog(&policies, &bundles, &query.q))
}
