use crate::domain::{FloatingTag, NewRelease, ReleaseTemplate, ReleaseUpdate};
use crate::error::{FloatTagsError, Result};
use crate::executor::SharedExecutor;
use crate::sync::stage::run_stage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// What to do when a floating tag already has a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingReleasePolicy {
    /// Leave the release exactly as it is
    #[default]
    Keep,
    /// Rewrite title and body from the template when they differ
    Refresh,
}

impl FromStr for ExistingReleasePolicy {
    type Err = FloatTagsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(ExistingReleasePolicy::Keep),
            "refresh" => Ok(ExistingReleasePolicy::Refresh),
            other => Err(FloatTagsError::config(format!(
                "Unknown existing-release policy '{}' - expected keep or refresh",
                other
            ))),
        }
    }
}

/// Result of ensuring one floating release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    Created,
    Unchanged,
    Refreshed,
}

impl fmt::Display for ReleaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseAction::Created => f.write_str("created"),
            ReleaseAction::Unchanged => f.write_str("unchanged"),
            ReleaseAction::Refreshed => f.write_str("refreshed"),
        }
    }
}

/// A floating tag paired with the template for its release
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub tag: FloatingTag,
    pub template: ReleaseTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseResult {
    pub tag: String,
    pub action: ReleaseAction,
}

/// Creates the release for a floating tag when it does not exist yet.
///
/// New releases are never marked latest: a floating release must not take the
/// latest designation away from the full release.
#[derive(Clone)]
pub struct ReleaseEngine {
    executor: SharedExecutor,
    target_commitish: String,
    draft: bool,
    policy: ExistingReleasePolicy,
}

impl ReleaseEngine {
    pub fn new(executor: SharedExecutor, target_commitish: impl Into<String>, draft: bool) -> Self {
        ReleaseEngine {
            executor,
            target_commitish: target_commitish.into(),
            draft,
            policy: ExistingReleasePolicy::Keep,
        }
    }

    pub fn with_policy(mut self, policy: ExistingReleasePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ensure a release exists at `request.tag`.
    ///
    /// # Returns
    /// * `Ok(ReleaseAction::Created)` - No release existed; one was created from the template
    /// * `Ok(ReleaseAction::Unchanged)` - A release exists and was left alone
    /// * `Ok(ReleaseAction::Refreshed)` - A release exists and its text was rewritten
    ///   (only under [`ExistingReleasePolicy::Refresh`])
    /// * `Err` - The lookup failed for a reason other than "not found", or the write failed
    pub async fn ensure(&self, request: &ReleaseRequest) -> Result<ReleaseAction> {
        let tag = request.tag.name.as_str();
        let existing = self.executor.release_by_tag(tag, None).await?;
        debug!(tag, needs_release = existing.is_none(), "checked release");

        let (title, body) = request.template.render(tag);

        let Some(existing) = existing else {
            self.executor
                .create_release(&NewRelease {
                    tag_name: tag.to_string(),
                    target_commitish: self.target_commitish.clone(),
                    name: title,
                    body,
                    draft: self.draft,
                    make_latest: false,
                })
                .await?;
            info!(tag, draft = self.draft, "created release");
            return Ok(ReleaseAction::Created);
        };

        let drifted = existing.name.as_deref() != Some(title.as_str())
            || existing.body.as_deref() != Some(body.as_str());
        if self.policy == ExistingReleasePolicy::Keep || !drifted {
            info!(tag, id = existing.id, "release already exists");
            return Ok(ReleaseAction::Unchanged);
        }

        self.executor
            .update_release(&ReleaseUpdate {
                release_id: existing.id,
                name: Some(title),
                body,
                make_latest: false,
            })
            .await?;
        info!(tag, id = existing.id, "refreshed release text");
        Ok(ReleaseAction::Refreshed)
    }

    /// Ensure releases for several tags as one stage
    pub async fn ensure_all(&self, requests: Vec<ReleaseRequest>) -> Result<Vec<ReleaseResult>> {
        let engine = self.clone();
        run_stage(&self.executor, requests, move |_, request| {
            let engine = engine.clone();
            async move {
                let action = engine.ensure(&request).await?;
                Ok(ReleaseResult {
                    tag: request.tag.name,
                    action,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FloatingKind, Release};
    use crate::executor::LiveExecutor;
    use crate::git::MockGitRunner;
    use crate::github::InMemoryReleaseStore;
    use std::sync::Arc;

    fn engine(store: Arc<InMemoryReleaseStore>) -> ReleaseEngine {
        let executor = LiveExecutor::new(Arc::new(MockGitRunner::new())).with_releases(store);
        ReleaseEngine::new(Arc::new(executor), "abc123", false)
    }

    fn request(name: &str) -> ReleaseRequest {
        ReleaseRequest {
            tag: FloatingTag::new(FloatingKind::Major, name),
            template: ReleaseTemplate::new("Version ${version}", "Latest ${version} release"),
        }
    }

    #[tokio::test]
    async fn test_creates_missing_release() {
        let store = Arc::new(InMemoryReleaseStore::new());
        let action = engine(store.clone()).ensure(&request("v1")).await.unwrap();

        assert_eq!(action, ReleaseAction::Created);
        let creates = store.creates();
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].name, "Version v1");
        assert_eq!(creates[0].body, "Latest v1 release");
        assert_eq!(creates[0].target_commitish, "abc123");
        assert!(!creates[0].make_latest);
    }

    #[tokio::test]
    async fn test_second_run_is_noop() {
        let store = Arc::new(InMemoryReleaseStore::new());
        let engine = engine(store.clone());

        assert_eq!(engine.ensure(&request("v1")).await.unwrap(), ReleaseAction::Created);
        assert_eq!(engine.ensure(&request("v1")).await.unwrap(), ReleaseAction::Unchanged);
        assert_eq!(store.creates().len(), 1);
    }

    #[tokio::test]
    async fn test_keep_ignores_drift() {
        let store = Arc::new(InMemoryReleaseStore::new().with_release(Release {
            id: 4,
            tag_name: "v1".to_string(),
            name: Some("old".to_string()),
            body: Some("old".to_string()),
        }));

        let action = engine(store.clone()).ensure(&request("v1")).await.unwrap();
        assert_eq!(action, ReleaseAction::Unchanged);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_rewrites_drifted_text() {
        let store = Arc::new(InMemoryReleaseStore::new().with_release(Release {
            id: 4,
            tag_name: "v1".to_string(),
            name: Some("old".to_string()),
            body: Some("old".to_string()),
        }));
        let engine = engine(store.clone()).with_policy(ExistingReleasePolicy::Refresh);

        assert_eq!(engine.ensure(&request("v1")).await.unwrap(), ReleaseAction::Refreshed);
        assert_eq!(engine.ensure(&request("v1")).await.unwrap(), ReleaseAction::Unchanged);

        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].name.as_deref(), Some("Version v1"));
        assert!(!updates[0].make_latest);
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let store = Arc::new(InMemoryReleaseStore::new().failing_lookups(500));
        let err = engine(store.clone()).ensure(&request("v1")).await.unwrap_err();
        assert!(matches!(err, FloatTagsError::GitHub { status: Some(500), .. }));
        assert!(store.creates().is_empty());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("keep".parse::<ExistingReleasePolicy>().unwrap(), ExistingReleasePolicy::Keep);
        assert_eq!(
            "Refresh".parse::<ExistingReleasePolicy>().unwrap(),
            ExistingReleasePolicy::Refresh
        );
        assert!("update".parse::<ExistingReleasePolicy>().is_err());
    }
}
