use crate::error::{FloatTagsError, Result};
use crate::git::GitRunner;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mock git runner for testing without spawning processes
pub struct MockGitRunner {
    calls: Mutex<Vec<Vec<String>>>,
    failing_verbs: HashSet<String>,
}

impl MockGitRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        MockGitRunner {
            calls: Mutex::new(Vec::new()),
            failing_verbs: HashSet::new(),
        }
    }

    /// Make every command whose first argument is `verb` fail
    pub fn fail_on(mut self, verb: impl Into<String>) -> Self {
        self.failing_verbs.insert(verb.into());
        self
    }

    /// All recorded invocations, in completion order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded invocations whose first argument is `verb`
    pub fn calls_for(&self, verb: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| c.first().map(String::as_str) == Some(verb))
            .collect()
    }
}

impl Default for MockGitRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitRunner for MockGitRunner {
    async fn run(&self, args: &[String]) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(args.to_vec());
        }

        match args.first() {
            Some(verb) if self.failing_verbs.contains(verb) => Err(FloatTagsError::git(format!(
                "git {} failed with exit code 1",
                args.join(" ")
            ))),
            _ => Ok(String::new()),
        }
    }
}
