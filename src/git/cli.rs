use crate::error::{FloatTagsError, Result};
use crate::git::GitRunner;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Runs the system `git` binary inside a working directory
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        GitCli {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn run(&self, args: &[String]) -> Result<String> {
        let command_line = args.join(" ");
        debug!(command = %command_line, workdir = %self.workdir.display(), "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(|e| FloatTagsError::git(format!("Failed to execute git {}: {}", command_line, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FloatTagsError::git(format!(
                "git {} failed with exit code {}\nStdout: {}\nStderr: {}",
                command_line,
                output.status.code().unwrap_or(-1),
                stdout.trim_end(),
                stderr.trim_end()
            )));
        }

        Ok(stdout)
    }
}
