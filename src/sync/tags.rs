use crate::domain::FloatingTags;
use crate::error::Result;
use crate::executor::SharedExecutor;
use crate::sync::stage::run_stage;
use tracing::info;

/// Moves floating tags to the current commit and publishes them.
///
/// Each method is one stage: all of its git commands settle before it returns.
pub struct GitTagSynchronizer {
    executor: SharedExecutor,
    remote: String,
}

impl GitTagSynchronizer {
    pub fn new(executor: SharedExecutor, remote: impl Into<String>) -> Self {
        GitTagSynchronizer {
            executor,
            remote: remote.into(),
        }
    }

    /// Configure the committer identity used for tagging.
    ///
    /// The two writes always run one after the other: `git config` takes a
    /// lock on the config file, so concurrent writes can fail.
    pub async fn setup_identity(&self, actor: &str) -> Result<()> {
        info!(actor, "configuring git identity");
        for args in [
            git_args(&["config", "user.name", actor]),
            git_args(&["config", "user.email", &noreply_email(actor)]),
        ] {
            self.executor.git(args).await?;
        }
        Ok(())
    }

    /// Force-create each tag at the current commit, replacing existing tags
    pub async fn create_tags(&self, tags: &FloatingTags) -> Result<()> {
        let commands = tags
            .iter()
            .map(|tag| git_args(&["tag", "--force", &tag.name]))
            .collect();
        self.run_git_stage(commands).await?;
        info!(tags = ?tags.names(), "created tags");
        Ok(())
    }

    /// Force-push each tag, overwriting the remote ref
    pub async fn push_tags(&self, tags: &FloatingTags) -> Result<()> {
        let commands = tags
            .iter()
            .map(|tag| git_args(&["push", "--force", &self.remote, &tag.name]))
            .collect();
        self.run_git_stage(commands).await?;
        info!(tags = ?tags.names(), remote = %self.remote, "pushed tags");
        Ok(())
    }

    async fn run_git_stage(&self, commands: Vec<Vec<String>>) -> Result<()> {
        run_stage(&self.executor, commands, |executor, args| async move {
            executor.git(args).await
        })
        .await?;
        Ok(())
    }
}

/// The GitHub no-reply address for `actor`
pub fn noreply_email(actor: &str) -> String {
    format!("{}@users.noreply.github.com", actor)
}

fn git_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionPattern;
    use crate::executor::{DryRunExecutor, LiveExecutor};
    use crate::git::{GitRunner, MockGitRunner};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Tracks how many commands are in flight at once
    #[derive(Default)]
    struct OverlapCounter {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl GitRunner for OverlapCounter {
        async fn run(&self, _args: &[String]) -> Result<String> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(String::new())
        }
    }

    fn floating(tag: &str) -> FloatingTags {
        let version = VersionPattern::new("v?", "").unwrap().parse(tag).unwrap();
        FloatingTags::compute(&version, true, true).unwrap()
    }

    #[tokio::test]
    async fn test_stages_in_dry_run() {
        let dry_run = Arc::new(DryRunExecutor::new());
        let sync = GitTagSynchronizer::new(dry_run.clone(), "origin");
        let tags = floating("v2.5.1");

        sync.setup_identity("octocat").await.unwrap();
        sync.create_tags(&tags).await.unwrap();
        sync.push_tags(&tags).await.unwrap();

        assert_eq!(
            dry_run.trace().lines(),
            &[
                "git config user.name octocat",
                "git config user.email octocat@users.noreply.github.com",
                "git tag --force v2",
                "git tag --force v2.5",
                "git push --force origin v2",
                "git push --force origin v2.5",
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_remote() {
        let git = Arc::new(MockGitRunner::new());
        let sync = GitTagSynchronizer::new(Arc::new(LiveExecutor::new(git.clone())), "upstream");

        sync.push_tags(&floating("1.0.0")).await.unwrap();
        let pushes = git.calls_for("push");
        assert_eq!(pushes.len(), 2);
        assert!(pushes.iter().all(|c| c[2] == "upstream"));
    }

    #[tokio::test]
    async fn test_push_failure_propagates() {
        let git = Arc::new(MockGitRunner::new().fail_on("push"));
        let sync = GitTagSynchronizer::new(Arc::new(LiveExecutor::new(git.clone())), "origin");
        let tags = floating("1.0.0");

        sync.create_tags(&tags).await.unwrap();
        assert!(sync.push_tags(&tags).await.is_err());
        assert_eq!(git.calls_for("tag").len(), 2);
    }

    #[tokio::test]
    async fn test_identity_writes_never_overlap() {
        let git = Arc::new(OverlapCounter::default());
        let sync = GitTagSynchronizer::new(Arc::new(LiveExecutor::new(git.clone())), "origin");

        sync.setup_identity("octocat").await.unwrap();
        assert_eq!(git.peak.load(Ordering::SeqCst), 1);

        // Tag creation still fans out
        sync.create_tags(&floating("1.0.0")).await.unwrap();
        assert_eq!(git.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_identity_order_in_live_mode() {
        let git = Arc::new(MockGitRunner::new());
        let sync = GitTagSynchronizer::new(Arc::new(LiveExecutor::new(git.clone())), "origin");

        sync.setup_identity("octocat").await.unwrap();
        assert_eq!(
            git.calls(),
            vec![
                git_args(&["config", "user.name", "octocat"]),
                git_args(&["config", "user.email", "octocat@users.noreply.github.com"]),
            ]
        );
    }
}
