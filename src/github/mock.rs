use crate::domain::{NewRelease, Release, ReleaseUpdate};
use crate::error::{FloatTagsError, Result};
use crate::github::ReleaseStore;
use async_trait::async_trait;
use std::sync::Mutex;

/// A request received by [`InMemoryReleaseStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetByTag(String),
    GetLatest,
    Create(NewRelease),
    Update(ReleaseUpdate),
}

#[derive(Default)]
struct StoreState {
    releases: Vec<Release>,
    latest: Option<u64>,
    next_id: u64,
    calls: Vec<StoreCall>,
    lookup_failure: Option<u16>,
    latest_failure: Option<u16>,
}

/// Release store kept in memory.
///
/// Follows the GitHub rule that matters here: the latest designation only
/// moves when a create or update asks for it with `make_latest`.
pub struct InMemoryReleaseStore {
    state: Mutex<StoreState>,
}

impl InMemoryReleaseStore {
    pub fn new() -> Self {
        InMemoryReleaseStore {
            state: Mutex::new(StoreState {
                next_id: 1,
                ..StoreState::default()
            }),
        }
    }

    /// Seed an existing release
    pub fn with_release(self, release: Release) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.next_id = state.next_id.max(release.id + 1);
            state.releases.push(release);
        }
        self
    }

    /// Designate an existing release as latest
    pub fn with_latest(self, id: u64) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.latest = Some(id);
        }
        self
    }

    /// Make every latest-release lookup fail with the given HTTP status
    pub fn failing_latest(self, status: u16) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.latest_failure = Some(status);
        }
        self
    }

    /// Make every tag lookup fail with the given HTTP status
    pub fn failing_lookups(self, status: u16) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.lookup_failure = Some(status);
        }
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    pub fn creates(&self) -> Vec<NewRelease> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Create(release) => Some(release),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<ReleaseUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Update(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    pub fn release(&self, tag: &str) -> Option<Release> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.releases.iter().find(|r| r.tag_name == tag).cloned())
    }

    pub fn latest_id(&self) -> Option<u64> {
        self.state.lock().ok().and_then(|s| s.latest)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| FloatTagsError::github(None, "release store lock poisoned"))?;
        f(&mut state)
    }
}

impl Default for InMemoryReleaseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseStore for InMemoryReleaseStore {
    async fn get_by_tag(&self, tag: &str) -> Result<Option<Release>> {
        self.with_state(|state| {
            state.calls.push(StoreCall::GetByTag(tag.to_string()));
            if let Some(status) = state.lookup_failure {
                return Err(FloatTagsError::github(Some(status), "lookup failed"));
            }
            Ok(state.releases.iter().find(|r| r.tag_name == tag).cloned())
        })
    }

    async fn get_latest(&self) -> Result<Option<Release>> {
        self.with_state(|state| {
            state.calls.push(StoreCall::GetLatest);
            if let Some(status) = state.latest_failure {
                return Err(FloatTagsError::github(Some(status), "lookup failed"));
            }
            let latest = state.latest;
            Ok(latest.and_then(|id| state.releases.iter().find(|r| r.id == id).cloned()))
        })
    }

    async fn create(&self, release: &NewRelease) -> Result<Release> {
        self.with_state(|state| {
            state.calls.push(StoreCall::Create(release.clone()));
            if state.releases.iter().any(|r| r.tag_name == release.tag_name) {
                return Err(FloatTagsError::github(
                    Some(422),
                    format!("Release for tag {} already exists", release.tag_name),
                ));
            }

            let created = Release {
                id: state.next_id,
                tag_name: release.tag_name.clone(),
                name: Some(release.name.clone()),
                body: Some(release.body.clone()),
            };
            state.next_id += 1;
            if release.make_latest {
                state.latest = Some(created.id);
            }
            state.releases.push(created.clone());
            Ok(created)
        })
    }

    async fn update(&self, update: &ReleaseUpdate) -> Result<Release> {
        self.with_state(|state| {
            state.calls.push(StoreCall::Update(update.clone()));
            let release = state
                .releases
                .iter_mut()
                .find(|r| r.id == update.release_id)
                .ok_or_else(|| FloatTagsError::github(Some(404), "Not Found"))?;

            release.body = Some(update.body.clone());
            if let Some(name) = &update.name {
                release.name = Some(name.clone());
            }
            let updated = release.clone();
            if update.make_latest {
                state.latest = Some(updated.id);
            }
            Ok(updated)
        })
    }
}
