pub const HOME_URL: &str = "/";
pub const SEARCH_URL: &str = "/policies/search";
pub const LOGIN_URL: &str = "/login";
pub const LOGOUT_URL: &str = "/logout";
pub const ADMIN_URL: &str = "/admin";
pub const ADMIN_POLICIES_URL: &str = "/admin/policies";
pub const ADMIN_BUNDLES_URL: &str = "/admin/bundles";
pub const ADMIN_GENERATE_URL: &str = "/admin/generate";
pub const ADMIN_UPLOAD_URL: &str = "/admin/upload";

pub const COURSE_URL: &str = "/course";
pub const COURSE_QUIZ_URL: &str = "/course/quiz";
pub const COURSE_READ_URL: &str = "/course/read";
pub const COURSE_ANSWER_URL: &str = "/course/answer";
pub const COURSE_SUBMIT_URL: &str = "/course/submit";
pub const COURSE_RETRY_URL: &str = "/course/retry";
pub const COURSE_EXIT_URL: &str = "/course/exit";

pub const ADMIN_SESSION_COOKIE_NAME: &str = "admin_session";
pub const COURSE_SESSION_COOKIE_NAME: &str = "course_session";

pub fn policy_url(id: &str) -> String {
    format!("/policies/{id}")
}

pub fn policy_quiz_url(id: &str) -> String {
    format!("/policies/{id}/quiz")
}

pub fn start_course_url(bundle_id: &str) -> String {
    format!("/bundles/{bundle_id}/start")
}

pub fn instructor_guide_url(bundle_id: &str) -> String {
    format!("/bundles/{bundle_id}/guide")
}

pub fn admin_policy_url(id: &str) -> String {
    format!("/admin/policies/{id}")
}

pub fn admin_policy_category_url(id: &str) -> String {
    format!("/admin/policies/{id}/category")
}

pub fn admin_bundle_url(id: &str) -> String {
    format!("/admin/bundles/{id}")
}

/// Starter question offered in the manual policy form.
pub const DEFAULT_QUESTIONS_JSON: &str =
    r#"[{"text":"Competency question","options":["Option A","Option B"],"correctIndex":0}]"#;
pub const DEFAULT_POLICY_CONTENT: &str = "<p>New policy content...</p>";
