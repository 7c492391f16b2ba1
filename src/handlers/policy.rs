use std::collections::HashMap;

use axum::{
    extract::{Form, Path, State},
    routing::get,
    Router,
};
use maud::Markup;

use crate::{
    course::{evaluate, quiz::answers_from_form, Answers},
    extractors::IsHtmx,
    models::Policy,
    rejections::{AppError, ResultExt},
    views::{self, policy as policy_views},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/policies/{id}", get(policy_page))
        .route("/policies/{id}/quiz", get(quiz_page).post(quiz_submit))
}

async fn find(state: &AppState, id: &str) -> Result<Policy, AppError> {
    state
        .store
        .find_policy(id)
        .await
        .reject("could not load policy")?
        .ok_or(AppError::NotFound)
}

async fn policy_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(id): Path<String>,
) -> Result<Markup, AppError> {
    let policy = find(&state, &id).await?;
    Ok(views::render(is_htmx, &policy.title, policy_views::detail(&policy)))
}

async fn quiz_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(id): Path<String>,
) -> Result<Markup, AppError> {
    let policy = find(&state, &id).await?;
    Ok(views::render(
        is_htmx,
        &policy.title,
        policy_views::quiz(&policy, &Answers::new(), None),
    ))
}

async fn quiz_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Markup, AppError> {
    let policy = find(&state, &id).await?;
    let answers = answers_from_form(&fields);
    let result = evaluate(&policy.questions, &answers);

    tracing::debug!(
        "quiz for policy {id}: {}/{} (passed: {})",
        result.score,
        result.total,
        result.passed()
    );

    Ok(views::titled(
        &policy.title,
        policy_views::quiz(&policy, &answers, Some(result)),
    ))
}
