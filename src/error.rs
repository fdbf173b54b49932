//! # Error Handling
//!
//! This module defines the single error type used by the `gitops-bootstrap`
//! library. It uses `thiserror` to describe every failure the bootstrap flow
//! can run into, each variant carrying the path, command or URL needed to
//! diagnose the failure.
//!
//! The variants group into three families:
//!
//! - Filesystem failures (`Filesystem`, `Io`) from copying, creating or
//!   deleting parts of the template tree.
//! - Subprocess failures (`Command`, `Substitution`) from the external
//!   stream editor used to detokenize files.
//! - Version-control failures (`GitCommand`, `BranchReference`, `Remote`).
//!
//! `Step` wraps any of the above with the position of the plan step that
//! failed. `Config` and `Yaml` cover loading of settings files.
//!
//! Every error is fatal to the enclosing call. Nothing in this crate retries
//! or rolls back.

use thiserror::Error;

/// Main error type for gitops-bootstrap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem operation on the template tree failed.
    #[error("Filesystem operation error for {path}: {message}")]
    Filesystem { path: String, message: String },

    /// An external command could not be spawned or exited unsuccessfully.
    #[error("Command failed: {command} - {stderr}")]
    Command { command: String, stderr: String },

    /// In-place text substitution on a file failed.
    #[error("Substitution error in {file} (pattern {pattern}): {message}")]
    Substitution {
        file: String,
        pattern: String,
        message: String,
    },

    /// A `git` invocation failed.
    #[error("Git command failed in {path}: {command} - {stderr}")]
    GitCommand {
        command: String,
        path: String,
        stderr: String,
    },

    /// A branch reference that had to be removed was missing or could not
    /// be deleted.
    #[error("Error removing previous git ref {reference}: {message}")]
    BranchReference { reference: String, message: String },

    /// Creating a remote failed, for example because it already exists.
    #[error("Error creating remote for URL={url}: {message}")]
    Remote { url: String, message: String },

    /// Configuration could not be built or parsed.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A plan step failed. `index` is zero-based.
    #[error("Step {index} ({step}) failed: {source}")]
    Step {
        index: usize,
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Returns the innermost error, looking through `Step` wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
