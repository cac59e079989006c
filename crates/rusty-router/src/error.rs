//! Error types for the router.
//!
//! There is no "no matching route" error: a miss is an ordinary
//! `None` from the matcher and renders the not-found view.

use thiserror::Error;

/// Failure reported by a module loader.
///
/// Cloneable because a single load result is shared by every render that
/// waits on the same lazy component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load module: {message}")]
pub struct LoadError {
    message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by router operations
#[derive(Debug, Error)]
pub enum RouterError {
    /// The history backend refused to push an entry
    #[error("history push to {url} failed: {reason}")]
    History { url: String, reason: String },

    /// A lazily loaded page or layout module failed to resolve
    #[error("module for {address} failed to load")]
    ModuleLoad {
        address: String,
        #[source]
        source: LoadError,
    },

    /// Invalid router configuration
    #[error("invalid router configuration: {0}")]
    Config(String),
}

pub type Result<T, E = RouterError> = std::result::Result<T, E>;
