use axum::{
    extract::{Form, Path, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use maud::Markup;
use serde::Deserialize;

use crate::{
    course::{CourseError, CourseState, Submission},
    extractors::{CourseToken, IsHtmx},
    models::{bundle_policies, Policy},
    names,
    rejections::{AppError, ResultExt},
    utils,
    views::{
        self,
        components::Notice,
        course::{self as course_views, PlayerData},
        home as home_views,
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bundles/{id}/start", post(start_course))
        .route("/bundles/{id}/guide", get(instructor_guide))
        .route(names::COURSE_URL, get(course_page))
        .route(names::COURSE_QUIZ_URL, post(take_quiz))
        .route(names::COURSE_READ_URL, post(show_reading))
        .route(names::COURSE_ANSWER_URL, post(select_answer))
        .route(names::COURSE_SUBMIT_URL, post(submit_quiz))
        .route(names::COURSE_RETRY_URL, post(retry_quiz))
        .route(names::COURSE_EXIT_URL, post(exit_course))
}

async fn player(
    state: &AppState,
    course: &CourseState,
    policies: &[Policy],
    notice: Option<&Notice>,
) -> Result<Markup, AppError> {
    let bundle = state
        .store
        .find_bundle(course.bundle_id())
        .await
        .reject("could not load bundle")?;
    let bundle_title = bundle
        .as_ref()
        .map(|b| b.title.as_str())
        .unwrap_or(course.bundle_id());

    Ok(course_views::player(PlayerData {
        bundle_title,
        state: course,
        policy: course.current_policy(policies),
        notice,
    }))
}

async fn start_course(
    State(state): State<AppState>,
    CourseToken(previous): CourseToken,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let bundle = state
        .store
        .find_bundle(&id)
        .await
        .reject("could not load bundle")?
        .ok_or(AppError::NotFound)?;

    if bundle.policy_ids.is_empty() {
        return Err(AppError::Input("this bundle has no policies"));
    }

    if let Some(previous) = previous {
        state.courses.end(&previous).await;
    }

    let policies = state
        .store
        .list_policies()
        .await
        .reject("could not load policies")?;

    let course = CourseState::start(&bundle);
    let token = state.courses.start(course.clone()).await;
    let cookie = utils::cookie(names::COURSE_SESSION_COOKIE_NAME, &token, state.secure_cookies);

    let body = player(&state, &course, &policies, None).await?;
    Ok(([(SET_COOKIE, cookie)], views::titled(&bundle.title, body)).into_response())
}

async fn course_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    CourseToken(token): CourseToken,
) -> Result<Response, AppError> {
    let course = match token {
        Some(token) => state.courses.get(&token).await,
        None => None,
    };
    let Some(course) = course else {
        return Ok(Redirect::to(names::HOME_URL).into_response());
    };

    let policies = state
        .store
        .list_policies()
        .await
        .reject("could not load policies")?;
    let body = player(&state, &course, &policies, None).await?;

    Ok(views::render(is_htmx, "Course", body).into_response())
}

/// Run one state machine event against the learner's course and re-render
/// the player. Rejected events are shown as an error notice.
async fn apply<T>(
    state: &AppState,
    token: Option<String>,
    event: impl FnOnce(&mut CourseState, &[Policy]) -> Result<T, CourseError>,
) -> Result<Response, AppError> {
    let policies = state
        .store
        .list_policies()
        .await
        .reject("could not load policies")?;

    let updated = match token {
        Some(token) => {
            state
                .courses
                .update(&token, |course| event(course, &policies))
                .await
        }
        None => None,
    };

    let Some((outcome, course)) = updated else {
        // No running course, e.g. after a restart. Send the learner home.
        return Ok([("HX-Redirect", names::HOME_URL)].into_response());
    };

    let notice = outcome.err().map(|e| {
        tracing::warn!("course event rejected for bundle {}: {e}", course.bundle_id());
        Notice::Error(e.to_string())
    });

    let body = player(state, &course, &policies, notice.as_ref()).await?;
    Ok(views::titled("Course", body).into_response())
}

async fn take_quiz(
    State(state): State<AppState>,
    CourseToken(token): CourseToken,
) -> Result<Response, AppError> {
    apply(&state, token, |course, _| course.take_quiz()).await
}

async fn show_reading(
    State(state): State<AppState>,
    CourseToken(token): CourseToken,
) -> Result<Response, AppError> {
    apply(&state, token, |course, _| course.show_reading()).await
}

#[derive(Deserialize)]
struct AnswerPost {
    question: usize,
    option: usize,
}

async fn select_answer(
    State(state): State<AppState>,
    CourseToken(token): CourseToken,
    Form(body): Form<AnswerPost>,
) -> Result<Response, AppError> {
    apply(&state, token, |course, policies| {
        course.select_answer(policies, body.question, body.option)
    })
    .await
}

async fn submit_quiz(
    State(state): State<AppState>,
    CourseToken(token): CourseToken,
) -> Result<Response, AppError> {
    apply(&state, token, |course, policies| {
        let submission = course.submit(policies)?;
        match submission {
            Submission::Advanced { index } => {
                tracing::info!("bundle {}: advanced to module {}", course.bundle_id(), index + 1)
            }
            Submission::Completed => tracing::info!("bundle {}: course completed", course.bundle_id()),
            Submission::Failed(result) => tracing::debug!(
                "bundle {}: quiz failed with {}/{}",
                course.bundle_id(),
                result.score,
                result.total
            ),
        }
        Ok(submission)
    })
    .await
}

async fn retry_quiz(
    State(state): State<AppState>,
    CourseToken(token): CourseToken,
) -> Result<Response, AppError> {
    apply(&state, token, |course, _| course.retry()).await
}

/// Always allowed: the attempt is discarded and the learner lands on the library.
async fn exit_course(
    State(state): State<AppState>,
    CourseToken(token): CourseToken,
) -> Result<Response, AppError> {
    if let Some(token) = token {
        state.courses.end(&token).await;
    }

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

    let cookie = utils::expired_cookie(names::COURSE_SESSION_COOKIE_NAME);
    Ok((
        [(SET_COOKIE, cookie)],
        views::titled("Library", home_views::home(&policies, &bundles, "")),
    )
        .into_response())
}

async fn instructor_guide(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(id): Path<String>,
) -> Result<Markup, AppError> {
    let bundle = state
        .store
        .find_bundle(&id)
        .await
        .reject("could not load bundle")?
        .ok_or(AppError::NotFound)?;
    let policies = state
        .store
        .list_policies()
        .await
        .reject("could not load policies")?;

    let resolved = bundle_policies(&bundle, &policies);
    Ok(views::render(
        is_htmx,
        &bundle.title,
        course_views::instructor_guide(&bundle, &resolved),
    ))
}
