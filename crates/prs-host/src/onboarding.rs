//! One-time onboarding flag, behind an injected store.
//!
//! The dashboard only needs two operations: "has the user finished
//! onboarding?" and "record that they have". Where that bit lives is the
//! host's business.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Key-value persistence for the onboarding flag.
///
/// Object-safe so the host can hold a `Box<dyn OnboardingStore>`.
pub trait OnboardingStore: Send + Sync {
    fn has_completed_onboarding(&self) -> Result<bool>;

    /// Idempotent.
    fn mark_completed(&self) -> Result<()>;
}

/// Process-lifetime store (tests, ephemeral sessions).
#[derive(Debug, Default)]
pub struct InMemoryOnboardingStore {
    completed: AtomicBool,
}

impl InMemoryOnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OnboardingStore for InMemoryOnboardingStore {
    fn has_completed_onboarding(&self) -> Result<bool> {
        Ok(self.completed.load(Ordering::SeqCst))
    }

    fn mark_completed(&self) -> Result<()> {
        self.completed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// On-disk document written by [`FileOnboardingStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_utc: Option<DateTime<Utc>>,
}

/// JSON file store. A missing file means "not onboarded".
#[derive(Debug, Clone)]
pub struct FileOnboardingStore {
    path: PathBuf,
}

impl FileOnboardingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<OnboardingState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read onboarding state failed: {}", self.path.display()))?;
        let state: OnboardingState = serde_json::from_str(&raw).with_context(|| {
            format!(
                "onboarding state is not valid JSON: {}",
                self.path.display()
            )
        })?;
        Ok(Some(state))
    }
}

impl OnboardingStore for FileOnboardingStore {
    fn has_completed_onboarding(&self) -> Result<bool> {
        Ok(self.load()?.map(|s| s.completed).unwrap_or(false))
    }

    fn mark_completed(&self) -> Result<()> {
        // Keep the first completion time.
        if let Some(state) = self.load()? {
            if state.completed {
                return Ok(());
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("create onboarding state dir failed: {}", parent.display())
                })?;
            }
        }

        let state = OnboardingState {
            completed: true,
            completed_at_utc: Some(Utc::now()),
        };
        let body = serde_json::to_string_pretty(&state).context("serialize onboarding state")?;
        fs::write(&self.path, body)
            .with_context(|| format!("write onboarding state failed: {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), "onboarding marked completed");
        Ok(())
    }
}
