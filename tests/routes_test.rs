mod common;

use axum::{
    body::Body,
    http::{header::LOCATION, Method, Request, StatusCode},
};
use common::{app, body_text, create_test_db, form, htmx, send, set_cookie, state_on};
use policy_portal::{
    config::AppConfig,
    router,
    services::policy::{KeyValueStore, POLICY_KEY},
};

#[tokio::test]
async fn library_lists_seed_policy_and_bundle() {
    let (app, _) = app().await;

    let req = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Airway Management"));
    assert!(html.contains("Orientation Essentials"));
}

#[tokio::test]
async fn search_matches_code_and_hides_bundles() {
    let (app, _) = app().await;

    let hit = body_text(send(&app, htmx(Method::GET, "/policies/search?q=rt-01", None, None)).await).await;
    assert!(hit.contains("Airway Management"));
    assert!(!hit.contains("Orientation Essentials"));

    let miss = body_text(send(&app, htmx(Method::GET, "/policies/search?q=zzz", None, None)).await).await;
    assert!(miss.contains("No policies match your search."));
}

#[tokio::test]
async fn policy_detail_and_missing_policy() {
    let (app, _) = app().await;

    let resp = send(&app, htmx(Method::GET, "/policies/demo-001", None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Prepare suction."));
    assert!(!html.contains("<!DOCTYPE html>"), "htmx requests get a fragment");

    let resp = send(&app, htmx(Method::GET, "/policies/nope", None, None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn standalone_quiz_scores_submitted_answers() {
    let (app, _) = app().await;

    let pass = send(
        &app,
        htmx(Method::POST, "/policies/demo-001/quiz", None, Some("q0=1&q1=0")),
    )
    .await;
    assert_eq!(pass.status(), StatusCode::OK);
    assert!(body_text(pass).await.contains("Passed!"));

    let fail = body_text(
        send(
            &app,
            htmx(Method::POST, "/policies/demo-001/quiz", None, Some("q0=0&q1=0")),
        )
        .await,
    )
    .await;
    assert!(fail.contains("Not yet."));
    assert!(fail.contains("You scored 1 of 2 (50%)"));
    assert!(fail.contains("option-incorrect"));
}

#[tokio::test]
async fn state_changing_requests_need_hx_request() {
    let (app, _) = app().await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/bundles/bundle-1/start")
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn course_runs_from_start_to_summary() {
    let (app, _) = app().await;

    let resp = send(&app, htmx(Method::POST, "/bundles/bundle-1/start", None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = set_cookie(&resp);
    assert!(cookie.starts_with("course_session="));
    let html = body_text(resp).await;
    assert!(html.contains("Module 1 of 1"));
    assert!(html.contains("Prepare suction."));

    let post = |uri: &'static str, body: Option<&'static str>| {
        let app = app.clone();
        let cookie = cookie.clone();
        async move { body_text(send(&app, htmx(Method::POST, uri, Some(&cookie), body)).await).await }
    };

    // Answering before the quiz is open is rejected with a notice.
    let html = post("/course/answer", Some("question=0&option=1")).await;
    assert!(html.contains("no quiz is in progress"));

    let html = post("/course/quiz", None).await;
    assert!(html.contains("/course/answer"));

    let html = post("/course/answer", Some("question=99&option=42")).await;
    assert!(html.contains("that answer is not part of this quiz"));

    post("/course/answer", Some("question=0&option=0")).await;
    post("/course/answer", Some("question=1&option=0")).await;
    let html = post("/course/submit", None).await;
    assert!(html.contains("Not yet."));
    assert!(html.contains("Module 1 of 1"));
    assert!(html.contains("/course/retry"));

    let html = post("/course/answer", Some("question=0&option=1")).await;
    assert!(html.contains("answers are locked"));

    let html = post("/course/retry", None).await;
    assert!(!html.contains("Not yet."));

    post("/course/answer", Some("question=0&option=1")).await;
    post("/course/answer", Some("question=1&option=0")).await;
    let html = post("/course/submit", None).await;
    assert!(html.contains("Course complete"));
    assert!(html.contains("Print certificate"));
    assert!(html.contains(r#"onclick="window.print()""#));

    let html = post("/course/quiz", None).await;
    assert!(html.contains("already complete"));
}

#[tokio::test]
async fn exit_discards_the_course() {
    let (app, _) = app().await;

    let resp = send(&app, htmx(Method::POST, "/bundles/bundle-1/start", None, None)).await;
    let cookie = set_cookie(&resp);

    let resp = send(&app, htmx(Method::POST, "/course/exit", Some(&cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(set_cookie(&resp).starts_with("course_session="));
    assert!(body_text(resp).await.contains("Orientation Essentials"));

    let req = Request::builder()
        .uri("/course")
        .header("cookie", &cookie)
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/");
}

#[tokio::test]
async fn course_blocks_on_a_deleted_policy() {
    let (app, state) = app().await;
    state.store.delete_policy("demo-001").await.unwrap();

    let resp = send(&app, htmx(Method::POST, "/bundles/bundle-1/start", None, None)).await;
    let cookie = set_cookie(&resp);
    assert!(body_text(resp).await.contains("no longer available"));

    send(&app, htmx(Method::POST, "/course/quiz", Some(&cookie), None)).await;
    let html = body_text(send(&app, htmx(Method::POST, "/course/submit", Some(&cookie), None)).await).await;
    assert!(html.contains("the current policy is no longer available"));
    assert!(html.contains("Module 1 of 1"));
}

#[tokio::test]
async fn course_events_without_a_session_redirect_home() {
    let (app, _) = app().await;

    let resp = send(
        &app,
        htmx(Method::POST, "/course/submit", Some("course_session=unknown"), None),
    )
    .await;

    assert_eq!(resp.headers()["HX-Redirect"], "/");
}

#[tokio::test]
async fn instructor_guide_shows_answer_key() {
    let (app, _) = app().await;

    let resp = send(&app, htmx(Method::GET, "/bundles/bundle-1/guide", None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Answer key"));
    assert!(html.contains(r#"<li class="answer-key">Head tilt/chin lift"#));

    let resp = send(&app, htmx(Method::GET, "/bundles/missing/guide", None, None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_stylesheet_is_embedded() {
    let (app, _) = app().await;

    let req = Request::builder()
        .uri("/static/index.css")
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/css");
}

#[tokio::test]
async fn search_form_encoding_round_trips() {
    let (app, _) = app().await;
    let query = form(&[("q", "Airway Management")]);

    let html = body_text(send(&app, htmx(Method::GET, &format!("/policies/search?{query}"), None, None)).await).await;

    assert!(html.contains("1 records"));
}

#[tokio::test]
async fn corrupt_collection_is_reported_by_name() {
    let db = create_test_db().await;
    db.set(POLICY_KEY, "{not json").await.unwrap();
    let app = router(state_on(db.clone(), AppConfig::default()));

    let req = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(html.contains("DATA_CORRUPTED"));
    assert!(html.contains("stored njra_policies is not valid JSON"));

    // The broken record is left for repair, not replaced with seed data.
    assert_eq!(db.get(POLICY_KEY).await.unwrap().as_deref(), Some("{not json"));
}
