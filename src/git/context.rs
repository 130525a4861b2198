use crate::error::{FloatTagsError, Result};
use git2::Repository;
use std::fmt;
use std::path::Path;

/// A GitHub repository identifier (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoSlug {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse the `owner/repo` form used by `GITHUB_REPOSITORY`
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoSlug::new(owner, repo))
            }
            _ => Err(FloatTagsError::config(format!(
                "Invalid repository '{}' - expected owner/repo",
                slug
            ))),
        }
    }

    /// Derive the slug from a GitHub remote URL.
    ///
    /// Handles `https://github.com/owner/repo(.git)`, `git@github.com:owner/repo(.git)`
    /// and `ssh://git@github.com/owner/repo(.git)`.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim().trim_end_matches('/');
        let path = if let Some((_, rest)) = url.split_once("://") {
            // Drop the host (and any credentials) in front of the path.
            rest.split_once('/')?.1
        } else {
            // scp-like syntax: user@host:owner/repo
            url.split_once(':')?.1
        };

        let path = path.trim_end_matches(".git");
        let mut parts = path.rsplitn(2, '/');
        let repo = parts.next()?;
        let owner = parts.next()?.rsplit('/').next()?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(RepoSlug::new(owner, repo))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Facts about the local repository needed to create releases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContext {
    /// Repository slug derived from the remote URL
    pub slug: Option<RepoSlug>,
    /// Commit currently checked out
    pub head_sha: Option<String>,
}

impl RepoContext {
    /// Read HEAD and the remote URL from the repository containing `path`.
    ///
    /// A detached or unborn HEAD, or a missing remote, leaves the matching
    /// field empty rather than failing.
    ///
    /// # Returns
    /// * `Ok(RepoContext)` - Whatever could be read
    /// * `Err` - If `path` is not inside a git repository
    pub fn discover<P: AsRef<Path>>(path: P, remote: &str) -> Result<Self> {
        let repo = Repository::discover(path)?;

        let head_sha = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .map(|commit| commit.id().to_string());

        let slug = repo
            .find_remote(remote)
            .ok()
            .and_then(|r| r.url().and_then(RepoSlug::from_remote_url));

        Ok(RepoContext { slug, head_sha })
    }
}
