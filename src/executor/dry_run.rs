use crate::domain::{NewRelease, Release, ReleaseUpdate};
use crate::error::Result;
use crate::executor::{CommandExecutor, ExecutionTrace, Invocation, Schedule};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

/// Records invocations instead of performing them.
///
/// Always schedules stages in listed order, so two runs over the same inputs
/// produce identical traces.
#[derive(Default)]
pub struct DryRunExecutor {
    trace: Mutex<ExecutionTrace>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn trace(&self) -> ExecutionTrace {
        self.trace.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn record(&self, invocation: Invocation) {
        debug!("Would execute: `{}`", invocation);
        if let Ok(mut trace) = self.trace.lock() {
            trace.record(&invocation);
        }
    }
}

#[async_trait]
impl CommandExecutor for DryRunExecutor {
    fn schedule(&self) -> Schedule {
        Schedule::Ordered
    }

    async fn git(&self, args: Vec<String>) -> Result<String> {
        self.record(Invocation::git(&args));
        Ok(String::new())
    }

    async fn release_by_tag(
        &self,
        tag: &str,
        placeholder: Option<Release>,
    ) -> Result<Option<Release>> {
        self.record(Invocation::get_release_by_tag(tag));
        Ok(placeholder)
    }

    async fn latest_release(&self, placeholder: Option<Release>) -> Result<Option<Release>> {
        self.record(Invocation::get_latest_release());
        Ok(placeholder)
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Option<Release>> {
        self.record(Invocation::create_release(release));
        Ok(None)
    }

    async fn update_release(&self, update: &ReleaseUpdate) -> Result<Option<Release>> {
        self.record(Invocation::update_release(update));
        Ok(None)
    }
}
