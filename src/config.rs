//! Portal configuration.
//!
//! Defaults are overlaid with an optional JSON file. The active value sits in
//! a watch channel so it can be replaced while the server runs; handlers take
//! a fresh snapshot per request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use color_eyre::{eyre::WrapErr, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Base URL of the secured backend. Empty disables every backend call.
    pub api_base_url: String,
    /// Gates the admin login flow.
    pub admin_auth_enabled: bool,
    /// Part of the default set; nothing reads it yet.
    pub enable_mock_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            admin_auth_enabled: false,
            enable_mock_data: true,
        }
    }
}

impl AppConfig {
    /// Overlay a JSON document on the defaults. Unknown keys are ignored.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("could not read config file {}", path.display()))?;
        Self::from_json(&raw).wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    /// The backend base URL without a trailing slash, if one is configured.
    pub fn backend_url(&self) -> Option<&str> {
        let url = self.api_base_url.trim().trim_end_matches('/');
        (!url.is_empty()).then_some(url)
    }

    pub fn admin_login_enabled(&self) -> bool {
        self.admin_auth_enabled && self.backend_url().is_some()
    }
}

/// Shared configuration. Requests take a snapshot with [`ConfigHandle::current`],
/// so a replacement applies from the next request on.
#[derive(Clone)]
pub struct ConfigHandle {
    tx: Arc<watch::Sender<AppConfig>>,
}

impl ConfigHandle {
    pub fn new(config: AppConfig) -> Self {
        let (tx, _rx) = watch::channel(config);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> AppConfig {
        self.tx.borrow().clone()
    }

    /// Swap in a new configuration for every later snapshot.
    pub fn replace(&self, config: AppConfig) {
        tracing::info!(
            backend = config.backend_url().unwrap_or("<none>"),
            admin_auth_enabled = config.admin_auth_enabled,
            "configuration updated"
        );
        self.tx.send_replace(config);
    }
}

/// Re-read `path` and publish it every time the process receives SIGHUP.
#[cfg(unix)]
pub fn reload_on_hangup(handle: ConfigHandle, path: PathBuf) -> Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    Ok(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            match AppConfig::load(Some(&path)).await {
                Ok(config) => handle.replace(config),
                Err(e) => tracing::error!("could not reload configuration: {e:#}"),
            }
        }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_the_backend() {
        let config = AppConfig::default();
        assert_eq!(config.backend_url(), None);
        assert!(!config.admin_login_enabled());
        assert!(config.enable_mock_data);
    }

    #[test]
    fn overlay_keeps_unset_defaults() {
        let config =
            AppConfig::from_json(r#"{"apiBaseUrl":"https://api.example.org/","extra":1}"#).unwrap();
        assert_eq!(config.backend_url(), Some("https://api.example.org"));
        assert!(!config.admin_auth_enabled);
        assert!(config.enable_mock_data);
    }

    #[test]
    fn admin_login_needs_both_flag_and_url() {
        let flag_only = AppConfig::from_json(r#"{"adminAuthEnabled":true}"#).unwrap();
        assert!(!flag_only.admin_login_enabled());

        let both =
            AppConfig::from_json(r#"{"adminAuthEnabled":true,"apiBaseUrl":"http://x"}"#).unwrap();
        assert!(both.admin_login_enabled());
    }

    #[tokio::test]
    async fn replace_reaches_every_clone() {
        let handle = ConfigHandle::new(AppConfig::default());
        let shared = handle.clone();
        let before = shared.current();

        let mut next = AppConfig::default();
        next.api_base_url = "http://backend".to_string();
        handle.replace(next.clone());

        assert_eq!(shared.current(), next);
        assert_eq!(before.api_base_url, "");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("policy-portal-no-such-config.json");
        assert!(AppConfig::load(Some(&path)).await.is_err());
    }
}
