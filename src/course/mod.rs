mod progress;
pub mod quiz;

pub use progress::{CourseError, CourseState, Mode, Submission};
pub use quiz::{evaluate, Answers, QuizResult};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use ulid::Ulid;

use crate::utils::SESSION_MAX_AGE;

struct Attempt {
    started: Instant,
    state: CourseState,
}

/// In-flight course attempts keyed by the learner's cookie token.
/// Lives only as long as the process; progress is never persisted.
///
/// An attempt expires together with its cookie. Expired attempts are
/// invisible to lookups and are dropped whenever a new one starts.
#[derive(Clone)]
pub struct CourseSessions {
    inner: Arc<RwLock<HashMap<String, Attempt>>>,
    max_age: Duration,
}

impl Default for CourseSessions {
    fn default() -> Self {
        Self::with_max_age(SESSION_MAX_AGE)
    }
}

impl CourseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            inner: Arc::default(),
            max_age,
        }
    }

    fn is_live(&self, attempt: &Attempt) -> bool {
        attempt.started.elapsed() < self.max_age
    }

    /// Store a fresh attempt and return its token.
    pub async fn start(&self, state: CourseState) -> String {
        let token = Ulid::new().to_string();
        tracing::info!("course started for bundle {}", state.bundle_id());

        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, attempt| self.is_live(attempt));
        if sessions.len() < before {
            tracing::debug!("evicted {} expired course attempt(s)", before - sessions.len());
        }

        sessions.insert(
            token.clone(),
            Attempt {
                started: Instant::now(),
                state,
            },
        );
        token
    }

    pub async fn get(&self, token: &str) -> Option<CourseState> {
        self.inner
            .read()
            .await
            .get(token)
            .filter(|attempt| self.is_live(attempt))
            .map(|attempt| attempt.state.clone())
    }

    /// Apply `f` to the attempt behind `token`, if there is a live one.
    pub async fn update<T>(
        &self,
        token: &str,
        f: impl FnOnce(&mut CourseState) -> T,
    ) -> Option<(T, CourseState)> {
        let mut sessions = self.inner.write().await;
        let attempt = sessions.get_mut(token)?;
        if !self.is_live(attempt) {
            sessions.remove(token);
            return None;
        }
        let out = f(&mut attempt.state);
        Some((out, attempt.state.clone()))
    }

    pub async fn end(&self, token: &str) -> Option<CourseState> {
        self.inner
            .write()
            .await
            .remove(token)
            .map(|attempt| attempt.state)
    }
}
