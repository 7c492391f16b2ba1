use serde::Serialize;

use super::backend::{rejection, BackendError};
use crate::config::AppConfig;
use crate::models::Policy;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
}

/// Client for `POST {base}/ai/generate`.
pub struct AiService {
    http: reqwest::Client,
    config: AppConfig,
}

impl AiService {
    pub fn new(http: reqwest::Client, config: AppConfig) -> Self {
        Self { http, config }
    }

    /// Ask the backend to draft a policy about `topic`. The draft comes back
    /// without an id; storing it is up to the caller.
    pub async fn generate_policy(&self, topic: &str) -> Result<Policy, BackendError> {
        let base = self.config.backend_url().ok_or(BackendError::AiNotConfigured)?;

        let resp = self
            .http
            .post(format!("{base}/ai/generate"))
            .json(&GenerateRequest { topic })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp, "Unable to generate content").await);
        }

        let policy = resp.json::<Policy>().await?;
        tracing::info!("AI backend drafted policy '{}' for topic '{topic}'", policy.title);
        Ok(policy)
    }
}
