use crate::domain::version::VersionTag;
use std::fmt;

/// Which component a floating tag tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatingKind {
    Major,
    Minor,
}

impl FloatingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloatingKind::Major => "major",
            FloatingKind::Minor => "minor",
        }
    }
}

impl fmt::Display for FloatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movable tag such as `v1` or `v1.2`
#[derive(Debug, Clone)]
pub struct FloatingTag {
    pub kind: FloatingKind,
    pub name: String,
}

impl FloatingTag {
    pub fn new(kind: FloatingKind, name: impl Into<String>) -> Self {
        FloatingTag {
            kind,
            name: name.into(),
        }
    }
}

// Floating tags have no identity beyond their name.
impl PartialEq for FloatingTag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FloatingTag {}

impl fmt::Display for FloatingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The floating tags requested for one release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingTags {
    pub major: Option<FloatingTag>,
    pub minor: Option<FloatingTag>,
}

impl FloatingTags {
    /// Derive the requested floating tags from a validated version tag.
    ///
    /// The tag is split on `.`: the major tag is the first component, the minor
    /// tag the first two joined by `.`. Any prefix stays attached, so `v1.2.3`
    /// yields `v1` and `v1.2`.
    ///
    /// # Returns
    /// * `Some(FloatingTags)` - At least one of the flags was set
    /// * `None` - Neither major nor minor was requested
    pub fn compute(version: &VersionTag, update_major: bool, update_minor: bool) -> Option<Self> {
        if !update_major && !update_minor {
            return None;
        }

        let (major_name, minor_name) = split_version(version);

        Some(FloatingTags {
            major: update_major.then(|| FloatingTag::new(FloatingKind::Major, major_name)),
            minor: update_minor.then(|| FloatingTag::new(FloatingKind::Minor, minor_name)),
        })
    }

    /// The requested tags, major always before minor
    pub fn iter(&self) -> impl Iterator<Item = &FloatingTag> {
        self.major.iter().chain(self.minor.iter())
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|t| t.name.clone()).collect()
    }

    pub fn get(&self, kind: FloatingKind) -> Option<&FloatingTag> {
        match kind {
            FloatingKind::Major => self.major.as_ref(),
            FloatingKind::Minor => self.minor.as_ref(),
        }
    }
}

/// Split a version tag into its major and minor floating tag names
pub fn split_version(version: &VersionTag) -> (String, String) {
    let components = version.components();
    // The validated triplet guarantees at least three components.
    let major = components[0].to_string();
    let minor = format!("{}.{}", components[0], components[1]);
    (major, minor)
}
