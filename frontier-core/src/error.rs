//! Error types for the frontier core library

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by frontier operations
#[derive(Error, Debug)]
pub enum FrontierError {
    /// The remote API has no function with the given name
    #[error("No such function exists: {name}")]
    NoSuchFunction { name: String },

    /// A function config was parsed but has no name
    #[error("name is required")]
    MissingFunctionName,

    /// The API described the function but returned no ARN for it
    #[error("Could not resolve ARN of function: {name}")]
    UnresolvedFunctionArn { name: String },

    /// The API answered with a non-success status
    #[error("CDN API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller's cancellation token fired before the operation completed
    #[error("Operation cancelled")]
    Cancelled,
}

impl FrontierError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FrontierError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a missing function
    pub fn is_no_such_function(&self) -> bool {
        matches!(self, FrontierError::NoSuchFunction { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrontierError>;
