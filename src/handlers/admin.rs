use axum::{
    extract::{Form, Multipart, Path, State},
    routing::{delete, get, patch, post},
    Router,
};
use maud::Markup;
use rust_i18n::t;
use serde::Deserialize;

use crate::{
    extractors::{AdminGuard, IsHtmx},
    models::{Bundle, Category, Policy, Question},
    names,
    rejections::{AppError, ResultExt},
    views::{
        self,
        admin::{self as admin_views, DashboardData},
        components::Notice,
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_URL, get(admin_dashboard))
        .route(names::ADMIN_POLICIES_URL, post(create_policy))
        .route("/admin/policies/{id}", delete(delete_policy))
        .route("/admin/policies/{id}/category", patch(update_category))
        .route(names::ADMIN_BUNDLES_URL, post(create_bundle))
        .route("/admin/bundles/{id}", delete(delete_bundle))
        .route(names::ADMIN_GENERATE_URL, post(generate_policy))
        .route(names::ADMIN_UPLOAD_URL, post(upload_documents))
}

async fn dashboard(state: &AppState, notice: Option<Notice>) -> Result<Markup, AppError> {
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
    let metadata = state
        .store
        .metadata()
        .await
        .reject("could not load metadata")?;

    Ok(admin_views::dashboard(DashboardData {
        policies: &policies,
        bundles: &bundles,
        metadata: &metadata,
        notice: notice.as_ref(),
    }))
}

/// Re-render the dashboard after a mutation, refreshing the last-updated marker first.
async fn after_mutation(state: &AppState, notice: Notice) -> Result<Markup, AppError> {
    state
        .store
        .touch_metadata()
        .await
        .reject("could not update metadata")?;
    Ok(views::titled("Admin Dashboard", dashboard(state, Some(notice)).await?))
}

async fn rejected(state: &AppState, message: String) -> Result<Markup, AppError> {
    tracing::warn!("admin input rejected: {message}");
    Ok(views::titled(
        "Admin Dashboard",
        dashboard(state, Some(Notice::Error(message))).await?,
    ))
}

async fn admin_dashboard(
    _guard: AdminGuard,
    IsHtmx(is_htmx): IsHtmx,
    State(state): State<AppState>,
) -> Result<Markup, AppError> {
    Ok(views::render(
        is_htmx,
        "Admin Dashboard",
        dashboard(&state, None).await?,
    ))
}

#[derive(Deserialize)]
struct PolicyPost {
    title: String,
    #[serde(default)]
    code: String,
    category: String,
    content: String,
    questions: String,
}

fn check_questions(questions: &[Question]) -> Result<(), String> {
    for (idx, question) in questions.iter().enumerate() {
        question.validate().map_err(|reason| {
            t!("admin.invalid_question", number = idx + 1, reason = reason).to_string()
        })?;
    }
    Ok(())
}

fn parse_questions(raw: &str) -> Result<Vec<Question>, String> {
    let questions: Vec<Question> =
        serde_json::from_str(raw).map_err(|_| t!("admin.invalid_questions").to_string())?;
    check_questions(&questions)?;
    Ok(questions)
}

async fn create_policy(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Form(body): Form<PolicyPost>,
) -> Result<Markup, AppError> {
    if body.title.trim().is_empty() {
        return rejected(&state, t!("admin.missing_title").to_string()).await;
    }
    let questions = match parse_questions(&body.questions) {
        Ok(questions) => questions,
        Err(message) => return rejected(&state, message).await,
    };

    let code = body.code.trim();
    let policy = Policy {
        id: String::new(),
        code: (!code.is_empty()).then(|| code.to_string()),
        title: body.title.trim().to_string(),
        category: Some(Category::from_label(&body.category)),
        content: body.content,
        questions,
    };

    let saved = state
        .store
        .save_policy(policy)
        .await
        .reject("could not save policy")?;
    tracing::info!("policy {} created", saved.id);

    after_mutation(
        &state,
        Notice::Info(t!("admin.policy_saved", title = body.title.trim()).to_string()),
    )
    .await
}

async fn delete_policy(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Markup, AppError> {
    state
        .store
        .delete_policy(&id)
        .await
        .reject("could not delete policy")?;
    tracing::info!("policy {id} deleted");

    after_mutation(&state, Notice::Info(t!("admin.policy_deleted").to_string())).await
}

#[derive(Deserialize)]
struct CategoryPatch {
    category: String,
}

async fn update_category(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(body): Form<CategoryPatch>,
) -> Result<Markup, AppError> {
    let category = Category::from_label(&body.category);
    state
        .store
        .update_category(&id, category)
        .await
        .reject("could not update category")?;
    tracing::info!("policy {id} moved to {}", category.label());

    after_mutation(&state, Notice::Info(t!("admin.category_updated").to_string())).await
}

#[derive(Deserialize)]
struct BundlePost {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    policy_ids: Vec<String>,
}

async fn create_bundle(
    _guard: AdminGuard,
    State(state): State<AppState>,
    axum_extra::extract::Form(body): axum_extra::extract::Form<BundlePost>,
) -> Result<Markup, AppError> {
    let title = body.title.trim();
    if title.is_empty() {
        return rejected(&state, t!("admin.missing_title").to_string()).await;
    }

    let bundle = Bundle {
        id: String::new(),
        title: title.to_string(),
        description: body.description.trim().to_string(),
        policy_ids: body.policy_ids,
    };

    let saved = state
        .store
        .save_bundle(bundle)
        .await
        .reject("could not save bundle")?;
    tracing::info!("bundle {} created", saved.id);

    after_mutation(
        &state,
        Notice::Info(t!("admin.bundle_saved", title = title).to_string()),
    )
    .await
}

async fn delete_bundle(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Markup, AppError> {
    state
        .store
        .delete_bundle(&id)
        .await
        .reject("could not delete bundle")?;
    tracing::info!("bundle {id} deleted");

    after_mutation(&state, Notice::Info(t!("admin.bundle_deleted").to_string())).await
}

#[derive(Deserialize)]
struct GeneratePost {
    topic: String,
}

async fn generate_policy(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Form(body): Form<GeneratePost>,
) -> Result<Markup, AppError> {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return Ok(views::titled("Admin Dashboard", dashboard(&state, None).await?));
    }

    let mut draft = match state.ai().generate_policy(topic).await {
        Ok(draft) => draft,
        Err(e) => return rejected(&state, e.to_string()).await,
    };
    draft.title = draft.title.trim().to_string();
    if draft.title.is_empty() {
        return rejected(&state, t!("admin.missing_title").to_string()).await;
    }
    if let Err(message) = check_questions(&draft.questions) {
        return rejected(&state, message).await;
    }
    // Drafts are always stored as new records.
    draft.id = String::new();
    let title = draft.title.clone();

    let saved = state
        .store
        .save_policy(draft)
        .await
        .reject("could not save generated policy")?;
    tracing::info!("policy {} drafted from topic '{topic}'", saved.id);

    after_mutation(
        &state,
        Notice::Info(t!("admin.generated", title = &title).to_string()),
    )
    .await
}

/// Files are counted and dropped; nothing is stored or parsed.
async fn upload_documents(
    _guard: AdminGuard,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut count = 0usize;
    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("could not read upload")?
    {
        if field.file_name().is_some_and(|name| !name.is_empty()) {
            count += 1;
        }
    }

    if count == 0 {
        return rejected(&state, t!("admin.upload_empty").to_string()).await;
    }

    tracing::info!("received {count} document(s) for upload; no backend pipeline configured");
    Ok(views::titled(
        "Admin Dashboard",
        dashboard(
            &state,
            Some(Notice::Info(t!("admin.upload_received", count = count).to_string())),
        )
        .await?,
    ))
}
