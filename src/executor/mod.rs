//! The single seam between the synchronizer and the outside world
//!
//! Every git command and every release-store request goes through a
//! [CommandExecutor]. Two implementations exist:
//!
//! - [live::LiveExecutor]: performs the operation against a [GitRunner](crate::git::GitRunner)
//!   and a [ReleaseStore](crate::github::ReleaseStore)
//! - [dry_run::DryRunExecutor]: performs nothing, appends the normalized
//!   [Invocation] to an [ExecutionTrace] and hands back the caller's placeholder
//!
//! Callers never branch on the mode. The only mode-dependent input they supply
//! is a placeholder value for lookups whose result drives later steps.

pub mod dry_run;
pub mod live;

pub use dry_run::DryRunExecutor;
pub use live::LiveExecutor;

use crate::domain::{NewRelease, Release, ReleaseUpdate};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Which collaborator an invocation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Git,
    GitHub,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Git => f.write_str("git"),
            Category::GitHub => f.write_str("github"),
        }
    }
}

/// A logical operation: category, verb and ordered string arguments.
///
/// Its `Display` form (`<category> <verb> <args...>` joined by single spaces)
/// is the line recorded in an [ExecutionTrace].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub category: Category,
    pub verb: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `git <args>`; the first argument is the verb
    pub fn git(args: &[String]) -> Self {
        let (verb, rest) = match args.split_first() {
            Some((verb, rest)) => (verb.clone(), rest.to_vec()),
            None => (String::new(), Vec::new()),
        };
        Invocation {
            category: Category::Git,
            verb,
            args: rest,
        }
    }

    pub fn get_release_by_tag(tag: &str) -> Self {
        Self::github("get-release-by-tag", vec![tag.to_string()])
    }

    pub fn get_latest_release() -> Self {
        Self::github("get-latest-release", Vec::new())
    }

    pub fn create_release(release: &NewRelease) -> Self {
        Self::github(
            "create-release",
            vec![
                release.tag_name.clone(),
                release.name.clone(),
                release.body.clone(),
                release.draft.to_string(),
            ],
        )
    }

    pub fn update_release(update: &ReleaseUpdate) -> Self {
        let mut args = vec![update.release_id.to_string(), update.body.clone()];
        if let Some(name) = &update.name {
            args.push(name.clone());
        }
        Self::github("update-release", args)
    }

    fn github(verb: &str, args: Vec<String>) -> Self {
        Invocation {
            category: Category::GitHub,
            verb: verb.to_string(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.verb)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Ordered record of simulated invocations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionTrace {
    lines: Vec<String>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, invocation: &Invocation) {
        self.lines.push(invocation.to_string());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The trace as a newline-joined string
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// How operations grouped into one stage may be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Operations of a stage may be in flight together and finish in any order
    Concurrent,
    /// Operations run one after another in the order they were listed
    Ordered,
}

/// Executes (or simulates) every externally observable operation.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    fn schedule(&self) -> Schedule;

    /// Run `git <args>` and return its standard output
    async fn git(&self, args: Vec<String>) -> Result<String>;

    /// Look up the release at `tag`; `placeholder` is the simulated answer
    async fn release_by_tag(&self, tag: &str, placeholder: Option<Release>)
        -> Result<Option<Release>>;

    /// Look up the repository's latest release; `placeholder` is the simulated answer
    async fn latest_release(&self, placeholder: Option<Release>) -> Result<Option<Release>>;

    /// Create a release; the simulated answer is `None`
    async fn create_release(&self, release: &NewRelease) -> Result<Option<Release>>;

    /// Update a release; the simulated answer is `None`
    async fn update_release(&self, update: &ReleaseUpdate) -> Result<Option<Release>>;
}

pub type SharedExecutor = Arc<dyn CommandExecutor>;
