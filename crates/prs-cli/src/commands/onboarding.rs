use anyhow::Result;
use clap::Args;
use prs_host::{FileOnboardingStore, OnboardingStore};

/// Used when neither `--state-file` nor config names a location.
pub const DEFAULT_STATE_PATH: &str = ".prs/onboarding.json";

#[derive(Args)]
pub struct StoreArgs {
    /// Path of the onboarding state file
    #[arg(long = "state-file")]
    state_file: Option<String>,

    /// Layered config paths; `onboarding.state_path` is read from them
    #[arg(long = "config")]
    config_paths: Vec<String>,
}

impl StoreArgs {
    /// `--state-file` > config `onboarding.state_path` > default.
    pub fn resolve_path(&self) -> Result<String> {
        if let Some(p) = &self.state_file {
            return Ok(p.clone());
        }
        if !self.config_paths.is_empty() {
            let refs: Vec<&str> = self.config_paths.iter().map(|s| s.as_str()).collect();
            let loaded = prs_config::load_layered_yaml(&refs)?;
            if let Some(p) = loaded.onboarding_state_path() {
                return Ok(p.to_string());
            }
        }
        Ok(DEFAULT_STATE_PATH.to_string())
    }

    pub fn open(&self) -> Result<Box<dyn OnboardingStore>> {
        let path = self.resolve_path()?;
        tracing::debug!(path = %path, "using onboarding state file");
        Ok(Box::new(FileOnboardingStore::new(path)))
    }
}
