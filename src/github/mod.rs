//! GitHub Releases access
//!
//! Only the four release operations the synchronizer needs are exposed. A
//! lookup that the API answers with `404 Not Found` is `Ok(None)`; every other
//! failure is an error.
//!
//! - [client::GitHubReleases]: REST client built on `reqwest`
//! - [mock::InMemoryReleaseStore]: in-process store for tests and local runs

pub mod client;
pub mod mock;

pub use client::GitHubReleases;
pub use mock::{InMemoryReleaseStore, StoreCall};

use crate::domain::{NewRelease, Release, ReleaseUpdate};
use crate::error::Result;
use async_trait::async_trait;

/// Remote release store
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Find the release attached to exactly `tag`
    async fn get_by_tag(&self, tag: &str) -> Result<Option<Release>>;

    /// The release the store currently designates as latest
    async fn get_latest(&self) -> Result<Option<Release>>;

    async fn create(&self, release: &NewRelease) -> Result<Release>;

    async fn update(&self, update: &ReleaseUpdate) -> Result<Release>;
}
