use crate::domain::{NewRelease, Release, ReleaseUpdate};
use crate::error::{FloatTagsError, Result};
use crate::executor::{CommandExecutor, Invocation, Schedule};
use crate::git::GitRunner;
use crate::github::ReleaseStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Performs invocations against the real collaborators
pub struct LiveExecutor {
    git: Arc<dyn GitRunner>,
    releases: Option<Arc<dyn ReleaseStore>>,
}

impl LiveExecutor {
    /// Executor for git only; release operations fail with a configuration error
    pub fn new(git: Arc<dyn GitRunner>) -> Self {
        LiveExecutor {
            git,
            releases: None,
        }
    }

    pub fn with_releases(mut self, releases: Arc<dyn ReleaseStore>) -> Self {
        self.releases = Some(releases);
        self
    }

    fn store(&self) -> Result<&dyn ReleaseStore> {
        self.releases.as_deref().ok_or_else(|| {
            FloatTagsError::config("A GitHub token and repository are required for release operations")
        })
    }
}

#[async_trait]
impl CommandExecutor for LiveExecutor {
    fn schedule(&self) -> Schedule {
        Schedule::Concurrent
    }

    async fn git(&self, args: Vec<String>) -> Result<String> {
        debug!("Executing: `{}`", Invocation::git(&args));
        self.git.run(&args).await
    }

    async fn release_by_tag(
        &self,
        tag: &str,
        _placeholder: Option<Release>,
    ) -> Result<Option<Release>> {
        debug!("Executing: `{}`", Invocation::get_release_by_tag(tag));
        self.store()?.get_by_tag(tag).await
    }

    async fn latest_release(&self, _placeholder: Option<Release>) -> Result<Option<Release>> {
        debug!("Executing: `{}`", Invocation::get_latest_release());
        self.store()?.get_latest().await
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Option<Release>> {
        debug!("Executing: `{}`", Invocation::create_release(release));
        self.store()?.create(release).await.map(Some)
    }

    async fn update_release(&self, update: &ReleaseUpdate) -> Result<Option<Release>> {
        debug!("Executing: `{}`", Invocation::update_release(update));
        self.store()?.update(update).await.map(Some)
    }
}
