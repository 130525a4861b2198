//! Synchronizer stages and their sequencing
//!
//! - `tags` - Identity setup, tag creation and push
//! - `releases` - Floating releases
//! - `latest` - Promotion of the full release to latest
//! - `stage` - Concurrent or ordered execution of one stage
//! - `orchestrator` - One run from tag to report

pub mod latest;
pub mod orchestrator;
pub mod releases;
pub mod stage;
pub mod tags;

pub use latest::{LatestReleasePromoter, Promotion};
pub use orchestrator::{SyncOptions, SyncOrchestrator};
pub use releases::{ExistingReleasePolicy, ReleaseAction, ReleaseEngine, ReleaseRequest, ReleaseResult};
pub use tags::GitTagSynchronizer;
