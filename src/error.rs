// Error types for the site generator.
// Numeric cleanup failures are never errors; they become absent fields in the parser.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("cannot find data file: {0}")]
    MissingInput(PathBuf),

    #[error("failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("refusing to replace {0}: it is the working directory or contains the input")]
    UnsafeOutputDir(PathBuf),
}

impl SiteError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            source,
        }
    }
}

// Define a custom Result type using our SiteError
pub type SiteResult<T> = Result<T, SiteError>;
