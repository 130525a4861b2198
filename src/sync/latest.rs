//! Re-flagging an existing release as the repository's latest.
//!
//! GitHub recomputes the "latest" designation only when a release changes, and
//! offers no call that sets it on an existing release without an edit. The
//! [touch protocol](LatestReleasePromoter::touch) works around that: it appends
//! an invisible marker to the body and then restores the original body, asking
//! for the latest designation both times. If the API ever grows a direct "set
//! latest" operation, `touch` is the only place that needs to change.

use crate::domain::{Release, ReleaseUpdate};
use crate::error::{FloatTagsError, Result};
use crate::executor::{Schedule, SharedExecutor};
use tracing::info;

/// Appended to the body during the first touch update
pub const TOUCH_MARKER: &str = "&nbsp;";

/// Result of a promotion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    AlreadyLatest { release_id: u64 },
    Promoted { release_id: u64 },
}

pub struct LatestReleasePromoter {
    executor: SharedExecutor,
}

impl LatestReleasePromoter {
    pub fn new(executor: SharedExecutor) -> Self {
        LatestReleasePromoter { executor }
    }

    /// Make the release at `tag` the repository's latest release.
    ///
    /// # Returns
    /// * `Ok(Promotion::AlreadyLatest)` - It already was; nothing was updated
    /// * `Ok(Promotion::Promoted)` - Two touch updates were sent
    /// * `Err(MissingRelease)` - There is no release at `tag`, or no latest release at all
    pub async fn promote(&self, tag: &str) -> Result<Promotion> {
        let target_placeholder = Some(dry_run_target(tag));
        let latest_placeholder = Some(dry_run_latest());

        let (target, latest) = match self.executor.schedule() {
            Schedule::Ordered => {
                let target = self.executor.release_by_tag(tag, target_placeholder).await;
                let latest = self.executor.latest_release(latest_placeholder).await;
                (target, latest)
            }
            Schedule::Concurrent => tokio::join!(
                self.executor.release_by_tag(tag, target_placeholder),
                self.executor.latest_release(latest_placeholder)
            ),
        };

        let target = target
            .map_err(|e| e.during(&format!("get-release-by-tag {}", tag)))?
            .ok_or_else(|| {
                FloatTagsError::missing_release(format!(
                    "Could not find an existing GitHub release for tag {}",
                    tag
                ))
            })?;
        let latest = latest
            .map_err(|e| e.during("get-latest-release"))?
            .ok_or_else(|| {
                FloatTagsError::missing_release(
                    "Could not find the latest GitHub release of the repository",
                )
            })?;

        if target.id == latest.id {
            info!(tag, id = target.id, "release is already latest");
            return Ok(Promotion::AlreadyLatest {
                release_id: target.id,
            });
        }

        self.touch(&target).await?;
        info!(tag, id = target.id, previous = latest.id, "marked release as latest");
        Ok(Promotion::Promoted {
            release_id: target.id,
        })
    }

    /// Two strictly ordered updates: body plus [`TOUCH_MARKER`], then the exact
    /// original body. Both request the latest designation. A missing body is
    /// restored as the empty string.
    pub async fn touch(&self, release: &Release) -> Result<()> {
        let original = release.body.clone().unwrap_or_default();

        let append = ReleaseUpdate {
            release_id: release.id,
            name: None,
            body: format!("{}{}", original, TOUCH_MARKER),
            make_latest: true,
        };
        let restore = ReleaseUpdate {
            release_id: release.id,
            name: None,
            body: original,
            make_latest: true,
        };

        self.executor.update_release(&append).await?;
        self.executor.update_release(&restore).await?;
        Ok(())
    }
}

/// Simulated release at the promoted tag
fn dry_run_target(tag: &str) -> Release {
    Release {
        id: 1234,
        tag_name: tag.to_string(),
        name: Some("Dry Run Testing".to_string()),
        body: Some("Dry Run Testing Body".to_string()),
    }
}

/// Simulated latest release; its id differs from the target so a dry run
/// always shows the touch updates.
fn dry_run_latest() -> Release {
    Release {
        id: 0,
        tag_name: String::new(),
        name: None,
        body: None,
    }
}
