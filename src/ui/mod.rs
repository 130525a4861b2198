//! User interface module - log groups, status lines and step outputs.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Process-wide output style and the `GITHUB_OUTPUT` file

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_skip, display_status, display_success, display_summary,
};

static ANNOTATE: AtomicBool = AtomicBool::new(false);

/// Emit GitHub Actions workflow commands (`::group::`) instead of plain headers.
///
/// Called once by the binary after it has inspected its environment.
pub fn use_workflow_commands(enabled: bool) {
    ANNOTATE.store(enabled, Ordering::Relaxed);
}

fn annotate() -> bool {
    ANNOTATE.load(Ordering::Relaxed)
}

/// A titled block of output; the group closes when the value is dropped.
pub struct Group {
    annotate: bool,
}

impl Group {
    pub fn start(title: &str) -> Self {
        let annotate = annotate();
        println!("{}", formatter::group_header(title, annotate));
        Group { annotate }
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        if let Some(footer) = formatter::group_footer(self.annotate) {
            println!("{}", footer);
        }
    }
}

/// Render `name` and a possibly multi-line `value` in the `GITHUB_OUTPUT` heredoc form.
///
/// The delimiter is chosen so that it does not occur in the value.
pub fn format_output(name: &str, value: &str) -> String {
    let mut delimiter = String::from("EOF");
    let mut n = 0;
    while value.lines().any(|line| line == delimiter) {
        n += 1;
        delimiter = format!("EOF_{}", n);
    }
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Publish a step output.
///
/// Appends to the `GITHUB_OUTPUT` file when one is given, otherwise prints the
/// value to stdout.
pub fn set_output(name: &str, value: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(format_output(name, value).as_bytes())?;
        }
        None => println!("{}", value),
    }
    Ok(())
}
