//! Git access layer
//!
//! Tag movement goes through the system `git` binary behind the [GitRunner]
//! trait, so the same credential helpers and remotes the caller configured for
//! `git push` apply here. Read-only repository facts (HEAD commit, remote URL)
//! come from `git2` in [context].
//!
//! - [cli::GitCli]: runs `git` as a child process
//! - [mock::MockGitRunner]: records invocations for tests

pub mod cli;
pub mod context;
pub mod mock;

pub use cli::GitCli;
pub use context::{RepoContext, RepoSlug};
pub use mock::MockGitRunner;

use crate::error::Result;
use async_trait::async_trait;

/// Runs git commands.
///
/// ## Error Handling
///
/// A non-zero exit status is an error carrying the exit code and the captured
/// output. Implementations must be `Send + Sync` because stage operations are
/// spawned as independent tasks.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` and return its standard output.
    ///
    /// # Example
    /// ```rust
    /// # use float_tags::git::GitRunner;
    /// # async fn example<G: GitRunner>(git: &G) -> float_tags::Result<()> {
    /// git.run(&["tag".to_string(), "--force".to_string(), "v1".to_string()]).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn run(&self, args: &[String]) -> Result<String>;
}
