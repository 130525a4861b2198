use crate::domain::ReleaseTemplate;
use crate::error::{FloatTagsError, Result};
use crate::github::client::DEFAULT_GITHUB_API_BASE_URL;
use crate::sync::{ExistingReleasePolicy, SyncOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "float-tags.toml";

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Represents the complete configuration file for float-tags.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub releases: ReleasesConfig,
}

/// How a version tag is recognized.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct VersionConfig {
    /// Regex fragment allowed before the numeric version
    #[serde(default)]
    pub prefix: String,

    /// Regex fragment allowed after the numeric version
    #[serde(default)]
    pub suffix: String,

    #[serde(default)]
    pub fail_on_non_semver_tag: bool,
}

fn default_true() -> bool {
    true
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Which floating tags to move and where to push them.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_true")]
    pub update_major: bool,

    #[serde(default = "default_true")]
    pub update_minor: bool,

    #[serde(default)]
    pub skip_repo_setup: bool,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            update_major: true,
            update_minor: true,
            skip_repo_setup: false,
            remote: default_remote(),
        }
    }
}

/// Title and body of a floating release; `${version}` is replaced by the tag name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TemplateConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_body")]
    pub body: String,
}

fn default_title() -> String {
    "${version}".to_string()
}

fn default_body() -> String {
    "Floating release that always points at the newest ${version} version.".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            title: default_title(),
            body: default_body(),
        }
    }
}

/// Release management settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ReleasesConfig {
    #[serde(default)]
    pub create: bool,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub update_full_release: bool,

    #[serde(default)]
    pub existing: ExistingReleasePolicy,

    #[serde(default)]
    pub major: TemplateConfig,

    #[serde(default)]
    pub minor: TemplateConfig,
}

/// Loads the configuration file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `float-tags.toml` in current directory
/// 3. `float-tags.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(FileConfig)` - Loaded or default configuration
/// * `Err` - If the file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<FileConfig> {
    let path = match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => default_config_path(),
    };

    match path {
        Some(path) => read_config(&path),
        None => Ok(FileConfig::default()),
    }
}

fn default_config_path() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        FloatTagsError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| FloatTagsError::config(format!("Invalid {}: {}", path.display(), e)))
}

/// The tag named by `explicit`, or else by a `refs/tags/<tag>` ref.
///
/// Blank values count as absent; a ref outside `refs/tags/` yields nothing.
pub fn resolve_tag(explicit: Option<&str>, git_ref: Option<&str>) -> Option<String> {
    if let Some(tag) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(tag.to_string());
    }
    git_ref
        .and_then(|r| r.strip_prefix(TAG_REF_PREFIX))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Variables provided by the GitHub Actions runner, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionEnv {
    pub github_ref: Option<String>,
    /// Stands in for `GITHUB_REF` during dry runs
    pub test_github_ref: Option<String>,
    pub github_actor: Option<String>,
    pub github_repository: Option<String>,
    pub github_sha: Option<String>,
    pub github_api_url: Option<String>,
    pub github_token: Option<String>,
    pub github_output: Option<PathBuf>,
    pub github_actions: bool,
    pub runner_debug: bool,
}

impl ActionEnv {
    pub fn capture() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        ActionEnv {
            github_ref: var("GITHUB_REF"),
            test_github_ref: var("TEST_GITHUB_REF"),
            github_actor: var("GITHUB_ACTOR"),
            github_repository: var("GITHUB_REPOSITORY"),
            github_sha: var("GITHUB_SHA"),
            github_api_url: var("GITHUB_API_URL"),
            github_token: var("GITHUB_TOKEN"),
            github_output: var("GITHUB_OUTPUT").map(PathBuf::from),
            github_actions: var("GITHUB_ACTIONS").as_deref() == Some("true"),
            runner_debug: var("RUNNER_DEBUG").as_deref() == Some("1"),
        }
    }

    /// Ref the tag is taken from when none is given explicitly
    pub fn tag_ref(&self, dry_run: bool) -> Option<&str> {
        if dry_run {
            self.test_github_ref.as_deref()
        } else {
            self.github_ref.as_deref()
        }
    }

    pub fn api_base_url(&self) -> &str {
        self.github_api_url
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_API_BASE_URL)
    }
}

/// Values given on the command line or as action inputs.
///
/// `None` means "not given"; the config file or the built-in default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub tag: Option<String>,
    pub prefix_regex: Option<String>,
    pub suffix_regex: Option<String>,
    pub fail_on_non_semver_tag: Option<bool>,
    pub update_major: Option<bool>,
    pub update_minor: Option<bool>,
    pub skip_repo_setup: Option<bool>,
    pub remote: Option<String>,
    pub create_release: Option<bool>,
    pub create_release_as_draft: Option<bool>,
    pub update_full_release: Option<bool>,
    pub existing_release: Option<ExistingReleasePolicy>,
    pub major_release_title: Option<String>,
    pub major_release_body: Option<String>,
    pub minor_release_title: Option<String>,
    pub minor_release_body: Option<String>,
    pub dry_run: bool,
}

impl Inputs {
    /// Merge inputs over the file configuration over built-in defaults.
    ///
    /// A tag that cannot be resolved is left empty; the orchestrator rejects it.
    /// `target_commitish` comes from `GITHUB_SHA` and may still be empty.
    pub fn resolve(self, file: &FileConfig, env: &ActionEnv) -> SyncOptions {
        let tag = resolve_tag(self.tag.as_deref(), env.tag_ref(self.dry_run)).unwrap_or_default();

        let major_template = ReleaseTemplate::new(
            self.major_release_title
                .unwrap_or_else(|| file.releases.major.title.clone()),
            self.major_release_body
                .unwrap_or_else(|| file.releases.major.body.clone()),
        );
        let minor_template = ReleaseTemplate::new(
            self.minor_release_title
                .unwrap_or_else(|| file.releases.minor.title.clone()),
            self.minor_release_body
                .unwrap_or_else(|| file.releases.minor.body.clone()),
        );

        SyncOptions {
            tag,
            prefix_regex: self
                .prefix_regex
                .unwrap_or_else(|| file.version.prefix.clone()),
            suffix_regex: self
                .suffix_regex
                .unwrap_or_else(|| file.version.suffix.clone()),
            fail_on_non_semver_tag: self
                .fail_on_non_semver_tag
                .unwrap_or(file.version.fail_on_non_semver_tag),
            update_major: self.update_major.unwrap_or(file.tags.update_major),
            update_minor: self.update_minor.unwrap_or(file.tags.update_minor),
            skip_repo_setup: self.skip_repo_setup.unwrap_or(file.tags.skip_repo_setup),
            actor: env
                .github_actor
                .clone()
                .unwrap_or_else(|| "nobody".to_string()),
            remote: self.remote.unwrap_or_else(|| file.tags.remote.clone()),
            create_release: self.create_release.unwrap_or(file.releases.create),
            create_release_as_draft: self
                .create_release_as_draft
                .unwrap_or(file.releases.draft),
            update_full_release: self
                .update_full_release
                .unwrap_or(file.releases.update_full_release),
            existing_release: self.existing_release.unwrap_or(file.releases.existing),
            major_template: Some(major_template),
            minor_template: Some(minor_template),
            target_commitish: env.github_sha.clone().unwrap_or_default(),
        }
    }
}
