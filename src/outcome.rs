use crate::sync::latest::Promotion;
use crate::sync::releases::{ReleaseAction, ReleaseResult};
use std::fmt;

/// Reasons a run ends early without doing anything.
/// These are successful terminations, reported to the user as information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The tag does not match the version pattern and mismatches are tolerated
    NonSemverTag { tag: String, pattern: String },
    /// Neither the major nor the minor floating tag was requested
    NothingRequested,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonSemverTag { tag, pattern } => write!(
                f,
                "Version tag '{}' does not match (semver) regex '{}'",
                tag, pattern
            ),
            SkipReason::NothingRequested => write!(
                f,
                "Neither `update-major` nor `update-minor` is set. Nothing to do..."
            ),
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Floating tags that were moved and pushed, major first
    pub tags: Vec<String>,
    /// One entry per floating release that was checked
    pub releases: Vec<ReleaseResult>,
    pub promotion: Option<Promotion>,
}

impl SyncReport {
    /// Tags whose release was created during this run
    pub fn created_releases(&self) -> Vec<&str> {
        self.releases
            .iter()
            .filter(|r| r.action == ReleaseAction::Created)
            .map(|r| r.tag.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Skipped(SkipReason),
    Synced(SyncReport),
}

impl SyncOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SyncOutcome::Skipped(_))
    }

    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            SyncOutcome::Synced(report) => Some(report),
            SyncOutcome::Skipped(_) => None,
        }
    }
}
