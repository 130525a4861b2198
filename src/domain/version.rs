use crate::error::{FloatTagsError, Result};
use regex::Regex;
use std::fmt;

const VERSION_CORE: &str = r"[0-9]+\.[0-9]+\.[0-9]+";

/// A release tag that passed [`VersionPattern`] validation.
///
/// Holds the raw tag exactly as pushed, prefix and suffix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    raw: String,
}

impl VersionTag {
    /// The tag as it was pushed, e.g. `v1.2.3-rc`
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Components of the raw tag split on `.`
    pub fn components(&self) -> Vec<&str> {
        self.raw.split('.').collect()
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Matcher for semver-shaped release tags.
///
/// Equivalent to `^<prefix>[0-9]+\.[0-9]+\.[0-9]+<suffix>$`. The caller-supplied
/// prefix and suffix are regex fragments; each is wrapped in a non-capturing
/// group so an alternation inside one of them stays local to it. Digits are
/// never converted to numbers, so components of any length match.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
    source: String,
}

impl VersionPattern {
    /// Compile a pattern from optional prefix and suffix regex fragments.
    ///
    /// # Returns
    /// * `Ok(VersionPattern)` - The compiled matcher
    /// * `Err` - If either fragment is not a valid regex
    pub fn new(prefix: &str, suffix: &str) -> Result<Self> {
        let compiled = format!("^(?:{}){}(?:{})$", prefix, VERSION_CORE, suffix);
        let regex = Regex::new(&compiled).map_err(|e| {
            FloatTagsError::config(format!(
                "Invalid version pattern (prefix '{}', suffix '{}'): {}",
                prefix, suffix, e
            ))
        })?;
        Ok(VersionPattern {
            regex,
            source: format!("^{}{}{}$", prefix, VERSION_CORE, suffix),
        })
    }

    /// The pattern as reported in mismatch errors, without the grouping
    /// added around the prefix and suffix
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    /// Wrap `tag` in a [`VersionTag`], or `None` if it does not match.
    pub fn parse(&self, tag: &str) -> Option<VersionTag> {
        self.is_match(tag).then(|| VersionTag {
            raw: tag.to_string(),
        })
    }

    /// Like [`parse`](Self::parse), but a mismatch becomes
    /// [`FloatTagsError::NonSemverTag`] naming the tag and the pattern.
    pub fn validate(&self, tag: &str) -> Result<VersionTag> {
        self.parse(tag).ok_or_else(|| FloatTagsError::NonSemverTag {
            tag: tag.to_string(),
            pattern: self.source().to_string(),
        })
    }
}
