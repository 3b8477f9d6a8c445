//! Error type for the simulation runtime.

use std::fmt;
use std::io;

/// Errors surfaced by the simulation runtime.
///
/// Store operations themselves never fail; these cover configuration, thread
/// lifecycle and report output.
#[derive(Debug)]
pub enum FeedError {
    /// A configuration value was rejected by the builder.
    InvalidConfig(String),
    /// The OS refused to spawn a worker thread.
    Spawn {
        /// Name of the task that failed to start.
        task: String,
        /// Underlying spawn error.
        source: io::Error,
    },
    /// A worker thread panicked and was observed when joining it.
    TaskPanicked(String),
    /// Writing a report failed.
    Io(io::Error),
    /// Encoding a report as JSON failed.
    Encode(serde_json::Error),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            FeedError::Spawn { task, source } => {
                write!(f, "failed to spawn worker '{task}': {source}")
            }
            FeedError::TaskPanicked(task) => write!(f, "worker '{task}' panicked"),
            FeedError::Io(e) => write!(f, "I/O error: {e}"),
            FeedError::Encode(e) => write!(f, "report encoding error: {e}"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Spawn { source, .. } => Some(source),
            FeedError::Io(e) => Some(e),
            FeedError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FeedError {
    fn from(err: io::Error) -> Self {
        FeedError::Io(err)
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Encode(err)
    }
}
