use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use float_tags::config::{self, ActionEnv, Inputs};
use float_tags::executor::{DryRunExecutor, LiveExecutor, SharedExecutor};
use float_tags::git::{GitCli, RepoContext, RepoSlug};
use float_tags::github::GitHubReleases;
use float_tags::outcome::SyncOutcome;
use float_tags::sync::{ExistingReleasePolicy, SyncOptions, SyncOrchestrator};
use float_tags::{ui, FloatTagsError};

#[derive(clap::Parser)]
#[command(
    name = "float-tags",
    version,
    about = "Move floating major and minor tags (v1, v1.2) to a newly pushed version tag"
)]
struct Args {
    #[arg(long, env = "INPUT_TAG", help = "Version tag to float from (default: tag of GITHUB_REF)")]
    tag: Option<String>,

    #[arg(long, env = "INPUT_PREFIX-REGEX", help = "Regex allowed before the version number")]
    prefix_regex: Option<String>,

    #[arg(long, env = "INPUT_SUFFIX-REGEX", help = "Regex allowed after the version number")]
    suffix_regex: Option<String>,

    #[arg(
        long,
        env = "INPUT_FAIL-ON-NON-SEMVER-TAG",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Fail instead of skipping when the tag is not a version"
    )]
    fail_on_non_semver_tag: Option<bool>,

    #[arg(
        long,
        env = "INPUT_UPDATE-MAJOR",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Move the major tag (v1)"
    )]
    update_major: Option<bool>,

    #[arg(
        long,
        env = "INPUT_UPDATE-MINOR",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Move the minor tag (v1.2)"
    )]
    update_minor: Option<bool>,

    #[arg(
        long,
        env = "INPUT_SKIP-REPO-SETUP",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Do not configure the git user name and email"
    )]
    skip_repo_setup: Option<bool>,

    #[arg(long, help = "Remote the tags are pushed to (default: origin)")]
    remote: Option<String>,

    #[arg(
        long,
        env = "INPUT_CREATE-RELEASE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Create a release for floating tags that have none"
    )]
    create_release: Option<bool>,

    #[arg(
        long,
        env = "INPUT_CREATE-RELEASE-AS-DRAFT",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Create floating releases as drafts"
    )]
    create_release_as_draft: Option<bool>,

    #[arg(
        long,
        env = "INPUT_UPDATE-FULL-RELEASE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Mark the release of the version tag as latest"
    )]
    update_full_release: Option<bool>,

    #[arg(long, help = "Existing floating releases: keep or refresh")]
    existing_release: Option<ExistingReleasePolicy>,

    #[arg(long, env = "INPUT_MAJOR-RELEASE-TITLE")]
    major_release_title: Option<String>,

    #[arg(long, env = "INPUT_MAJOR-RELEASE-BODY")]
    major_release_body: Option<String>,

    #[arg(long, env = "INPUT_MINOR-RELEASE-TITLE")]
    minor_release_title: Option<String>,

    #[arg(long, env = "INPUT_MINOR-RELEASE-BODY")]
    minor_release_body: Option<String>,

    #[arg(
        long,
        env = "INPUT_DRY-RUN",
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "false",
        help = "Record the commands instead of running them"
    )]
    dry_run: bool,

    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Log filter, e.g. debug or float_tags=trace")]
    log_level: Option<String>,
}

impl Args {
    fn into_inputs(self) -> Inputs {
        Inputs {
            tag: self.tag,
            prefix_regex: self.prefix_regex,
            suffix_regex: self.suffix_regex,
            fail_on_non_semver_tag: self.fail_on_non_semver_tag,
            update_major: self.update_major,
            update_minor: self.update_minor,
            skip_repo_setup: self.skip_repo_setup,
            remote: self.remote,
            create_release: self.create_release,
            create_release_as_draft: self.create_release_as_draft,
            update_full_release: self.update_full_release,
            existing_release: self.existing_release,
            major_release_title: self.major_release_title,
            major_release_body: self.major_release_body,
            minor_release_title: self.minor_release_title,
            minor_release_body: self.minor_release_body,
            dry_run: self.dry_run,
        }
    }
}

fn init_tracing(level: Option<&str>, runner_debug: bool) {
    let default = if runner_debug { "debug" } else { "info" };
    let filter = EnvFilter::try_new(level.unwrap_or(default))
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let env = ActionEnv::capture();

    init_tracing(args.log_level.as_deref(), env.runner_debug);
    ui::use_workflow_commands(env.github_actions);

    if let Err(e) = run(args, env).await {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args, env: ActionEnv) -> Result<()> {
    let file = config::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let token = args
        .github_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| env.github_token.clone());

    let inputs = args.into_inputs();
    let dry_run = inputs.dry_run;
    let mut options = inputs.resolve(&file, &env);

    if dry_run {
        ui::display_status("Dry run: commands are recorded, not executed");
        let recorder = Arc::new(DryRunExecutor::new());
        let outcome = SyncOrchestrator::new(recorder.clone(), options).run().await?;
        report(&outcome);

        let trace = recorder.trace();
        ui::set_output("executed-commands", &trace.render(), env.github_output.as_deref())
            .context("Failed to write the executed-commands output")?;
        return Ok(());
    }

    let workdir = std::env::current_dir().context("Cannot determine the working directory")?;
    let executor = live_executor(&workdir, &mut options, &env, token)?;
    let outcome = SyncOrchestrator::new(executor, options).run().await?;
    report(&outcome);
    Ok(())
}

/// Wire the git runner and, when release work is requested, the GitHub client.
fn live_executor(
    workdir: &Path,
    options: &mut SyncOptions,
    env: &ActionEnv,
    token: Option<String>,
) -> Result<SharedExecutor> {
    let executor = LiveExecutor::new(Arc::new(GitCli::new(workdir)));
    if !options.create_release && !options.update_full_release {
        return Ok(Arc::new(executor));
    }

    let context = match RepoContext::discover(workdir, &options.remote) {
        Ok(context) => context,
        Err(e) => {
            warn!("Could not inspect the local repository: {}", e);
            RepoContext::default()
        }
    };
    debug!(?context, "repository context");

    let token = token.ok_or_else(|| {
        FloatTagsError::config("A GitHub token is required to manage releases (--github-token or GITHUB_TOKEN)")
    })?;

    let slug = match env.github_repository.as_deref() {
        Some(slug) => RepoSlug::parse(slug)?,
        None => context.slug.clone().ok_or_else(|| {
            FloatTagsError::config(format!(
                "Cannot determine the GitHub repository: GITHUB_REPOSITORY is unset and remote '{}' is not a GitHub URL",
                options.remote
            ))
        })?,
    };

    if options.target_commitish.is_empty() {
        options.target_commitish = context.head_sha.clone().unwrap_or_default();
    }
    if options.create_release && options.target_commitish.is_empty() {
        return Err(FloatTagsError::config(
            "Cannot determine the commit for new releases: GITHUB_SHA is unset and HEAD has no commit",
        )
        .into());
    }

    let releases = GitHubReleases::new(env.api_base_url(), slug, token)?;
    Ok(Arc::new(executor.with_releases(Arc::new(releases))))
}

fn report(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Skipped(reason) => ui::display_skip(reason),
        SyncOutcome::Synced(report) => ui::display_summary(report),
    }
}
