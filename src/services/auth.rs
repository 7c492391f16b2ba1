use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use ulid::Ulid;

use super::backend::{rejection, BackendError};
use crate::config::AppConfig;
use crate::utils::SESSION_MAX_AGE;

#[derive(Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Client for the backend's `/auth/login` and `/auth/logout`. Both are off
/// unless a backend URL is set and admin auth is enabled.
pub struct AdminAuthService {
    http: reqwest::Client,
    config: AppConfig,
}

impl AdminAuthService {
    pub fn new(http: reqwest::Client, config: AppConfig) -> Self {
        Self { http, config }
    }

    fn base(&self) -> Option<&str> {
        if self.config.admin_login_enabled() {
            self.config.backend_url()
        } else {
            None
        }
    }

    /// Returns whatever JSON the backend answered with on success.
    pub async fn login(&self, credentials: &Credentials) -> Result<serde_json::Value, BackendError> {
        let base = self.base().ok_or(BackendError::AdminDisabled)?;

        let resp = self
            .http
            .post(format!("{base}/auth/login"))
            .json(credentials)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp, "Login failed").await);
        }

        let body = resp.json::<serde_json::Value>().await?;
        tracing::info!("admin {} logged in through the backend", credentials.email);
        Ok(body)
    }

    /// Silent no-op when admin auth is disabled. The response is not inspected.
    pub async fn logout(&self) -> Result<(), BackendError> {
        let Some(base) = self.base() else {
            return Ok(());
        };

        self.http.post(format!("{base}/auth/logout")).send().await?;
        Ok(())
    }
}

/// Local admin sessions opened after a successful backend login. A session
/// expires with its cookie; expired ones are dropped when a new one opens.
#[derive(Clone)]
pub struct AdminSessions {
    inner: Arc<RwLock<HashMap<String, Instant>>>,
    max_age: Duration,
}

impl Default for AdminSessions {
    fn default() -> Self {
        Self::with_max_age(SESSION_MAX_AGE)
    }
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            inner: Arc::default(),
            max_age,
        }
    }

    pub async fn open(&self) -> String {
        let token = Ulid::new().to_string();
        let mut sessions = self.inner.write().await;
        sessions.retain(|_, opened| opened.elapsed() < self.max_age);
        sessions.insert(token.clone(), Instant::now());
        token
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.inner
            .read()
            .await
            .get(token)
            .is_some_and(|opened| opened.elapsed() < self.max_age)
    }

    pub async fn close(&self, token: &str) {
        self.inner.write().await.remove(token);
    }
}
