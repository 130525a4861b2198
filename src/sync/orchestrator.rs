//! Per-invocation sequencing of the synchronizer stages
//!
//! Stages run strictly one after another; a failure anywhere stops the run and
//! leaves the stages that already completed (such as pushed tags) in place.

use crate::domain::{FloatingKind, FloatingTags, ReleaseTemplate, VersionPattern};
use crate::error::{FloatTagsError, Result};
use crate::executor::SharedExecutor;
use crate::outcome::{SkipReason, SyncOutcome, SyncReport};
use crate::sync::latest::LatestReleasePromoter;
use crate::sync::releases::{ExistingReleasePolicy, ReleaseEngine, ReleaseRequest};
use crate::sync::tags::GitTagSynchronizer;
use crate::ui;
use tracing::info;

/// Fully resolved inputs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// The pushed release tag, e.g. `v1.2.3`
    pub tag: String,
    pub prefix_regex: String,
    pub suffix_regex: String,
    pub fail_on_non_semver_tag: bool,
    pub update_major: bool,
    pub update_minor: bool,
    pub skip_repo_setup: bool,
    /// Name used for the git committer identity
    pub actor: String,
    pub remote: String,
    pub create_release: bool,
    pub create_release_as_draft: bool,
    pub update_full_release: bool,
    pub existing_release: ExistingReleasePolicy,
    pub major_template: Option<ReleaseTemplate>,
    pub minor_template: Option<ReleaseTemplate>,
    /// Commit new releases point at
    pub target_commitish: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            tag: String::new(),
            prefix_regex: String::new(),
            suffix_regex: String::new(),
            fail_on_non_semver_tag: false,
            update_major: true,
            update_minor: true,
            skip_repo_setup: false,
            actor: "nobody".to_string(),
            remote: "origin".to_string(),
            create_release: false,
            create_release_as_draft: false,
            update_full_release: false,
            existing_release: ExistingReleasePolicy::Keep,
            major_template: None,
            minor_template: None,
            target_commitish: String::new(),
        }
    }
}

impl SyncOptions {
    fn template(&self, kind: FloatingKind) -> Option<&ReleaseTemplate> {
        match kind {
            FloatingKind::Major => self.major_template.as_ref(),
            FloatingKind::Minor => self.minor_template.as_ref(),
        }
    }
}

pub struct SyncOrchestrator {
    executor: SharedExecutor,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(executor: SharedExecutor, options: SyncOptions) -> Self {
        SyncOrchestrator { executor, options }
    }

    /// Run every requested stage.
    ///
    /// 1. Validate input and the version tag
    /// 2. Compose floating tags
    /// 3. Configure the git identity (unless skipped)
    /// 4. Create, then push, the floating tags
    /// 5. Create missing floating releases (if requested)
    /// 6. Mark the full release as latest (if requested)
    ///
    /// # Returns
    /// * `Ok(SyncOutcome::Skipped)` - Tolerated non-semver tag, or nothing requested
    /// * `Ok(SyncOutcome::Synced)` - All requested stages completed
    /// * `Err` - Configuration error or collaborator failure
    pub async fn run(&self) -> Result<SyncOutcome> {
        let options = &self.options;

        let pattern = {
            let _group = ui::Group::start("Validating input");
            if options.tag.trim().is_empty() {
                return Err(FloatTagsError::config(
                    "Input `tag` was not set and GITHUB_REF is not a valid tag ref",
                ));
            }
            VersionPattern::new(&options.prefix_regex, &options.suffix_regex)?
        };

        let version = {
            let _group = ui::Group::start("Validate version");
            if options.fail_on_non_semver_tag {
                pattern.validate(&options.tag)?
            } else {
                match pattern.parse(&options.tag) {
                    Some(version) => version,
                    None => {
                        let reason = SkipReason::NonSemverTag {
                            tag: options.tag.clone(),
                            pattern: pattern.source().to_string(),
                        };
                        info!("{}", reason);
                        return Ok(SyncOutcome::Skipped(reason));
                    }
                }
            }
        };

        let tags = {
            let _group = ui::Group::start("Compose tags");
            match FloatingTags::compute(&version, options.update_major, options.update_minor) {
                Some(tags) => tags,
                None => {
                    let reason = SkipReason::NothingRequested;
                    info!("{}", reason);
                    return Ok(SyncOutcome::Skipped(reason));
                }
            }
        };
        info!(version = %version, tags = ?tags.names(), "composed floating tags");

        let synchronizer = GitTagSynchronizer::new(self.executor.clone(), options.remote.clone());
        if !options.skip_repo_setup {
            let _group = ui::Group::start("Setting up repo");
            synchronizer.setup_identity(&options.actor).await?;
        }
        {
            let _group = ui::Group::start("Create tags");
            synchronizer.create_tags(&tags).await?;
        }
        {
            let _group = ui::Group::start("Push tags");
            synchronizer.push_tags(&tags).await?;
        }

        let mut report = SyncReport {
            tags: tags.names(),
            ..SyncReport::default()
        };

        if options.create_release {
            let _group = ui::Group::start("Create releases");
            let requests: Vec<ReleaseRequest> = tags
                .iter()
                .filter_map(|tag| {
                    options.template(tag.kind).map(|template| ReleaseRequest {
                        tag: tag.clone(),
                        template: template.clone(),
                    })
                })
                .collect();

            let engine = ReleaseEngine::new(
                self.executor.clone(),
                options.target_commitish.clone(),
                options.create_release_as_draft,
            )
            .with_policy(options.existing_release);
            report.releases = engine.ensure_all(requests).await?;
        }

        if options.update_full_release {
            let _group = ui::Group::start("Update full release");
            let promoter = LatestReleasePromoter::new(self.executor.clone());
            report.promotion = Some(promoter.promote(version.as_str()).await?);
        }

        Ok(SyncOutcome::Synced(report))
    }
}
