//! prs-host
//!
//! Host-side collaborators around the engine:
//! - Injected onboarding-flag store (memory / JSON file)
//! - Snapshot watermark (last snapshot wins)
//! - Dashboard: evaluate a snapshot, publish only the newest view

pub mod dashboard;
pub mod onboarding;
pub mod snapshot;

pub use dashboard::{Dashboard, DashboardView};
pub use onboarding::{FileOnboardingStore, InMemoryOnboardingStore, OnboardingState, OnboardingStore};
pub use snapshot::{Snapshot, SnapshotFreshness, SnapshotWatermark};
