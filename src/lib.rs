pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod git;
pub mod github;
pub mod outcome;
pub mod sync;
pub mod ui;

pub use error::{FloatTagsError, Result};
