use serde::Deserialize;

/// Failures of calls to the optional backend. `Display` is the message shown
/// to the user.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("AI endpoint not configured. Set apiBaseUrl to a secured server.")]
    AiNotConfigured,
    #[error("Admin access is disabled. Configure a secure backend and enable adminAuthEnabled.")]
    AdminDisabled,
    #[error("{0}")]
    Rejected(String),
    #[error("could not reach the backend: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

/// HTTP client shared by the backend services. The cookie store plays the
/// part of browser credentials: the session set by a login is sent along
/// with later calls.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().cookie_store(true).build()
}

/// Turn a non-2xx response into a `Rejected` error, preferring the backend's
/// own `error` field.
pub(crate) async fn rejection(resp: reqwest::Response, fallback: &str) -> BackendError {
    let status = resp.status();
    let message = resp
        .json::<ErrorPayload>()
        .await
        .ok()
        .and_then(|payload| payload.error)
        .unwrap_or_else(|| fallback.to_string());

    tracing::warn!("backend returned {status}: {message}");
    BackendError::Rejected(message)
}
