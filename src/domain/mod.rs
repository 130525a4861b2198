//! Domain logic - pure rules for versions, floating tags and releases

pub mod release;
pub mod tag;
pub mod version;

pub use release::{NewRelease, Release, ReleaseTemplate, ReleaseUpdate, VERSION_PLACEHOLDER};
pub use tag::{FloatingKind, FloatingTag, FloatingTags};
pub use version::{VersionPattern, VersionTag};
