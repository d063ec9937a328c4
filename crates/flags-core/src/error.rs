//! Error handling for the flags library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flag operations
pub type Result<T> = std::result::Result<T, FlagsError>;

/// Error type for flag configuration
#[derive(Error, Debug)]
pub enum FlagsError {
    /// The configuration passed to `init` was not an object
    #[error("Invalid flags configuration: expected an object, got {found}")]
    InvalidConfiguration {
        /// Kind of value that was supplied instead
        found: &'static str,
    },

    /// Reading a flags file failed
    #[error("Failed to read flags file {}: {source}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A flags file could not be parsed
    #[error("Failed to parse flags configuration: {details}")]
    Parse {
        /// Parser message
        details: String,
    },

    /// The logging subscriber could not be installed
    #[error("Logging setup failed: {details}")]
    Logging {
        /// What went wrong
        details: String,
    },
}

impl FlagsError {
    /// Create a new invalid configuration error
    pub fn invalid_configuration(found: &'static str) -> Self {
        Self::InvalidConfiguration { found }
    }

    /// Create a new parse error
    pub fn parse(details: impl Into<String>) -> Self {
        Self::Parse {
            details: details.into(),
        }
    }

    /// Create a new logging error
    pub fn logging(details: impl Into<String>) -> Self {
        Self::Logging {
            details: details.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the environment
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. } | Self::Parse { .. })
    }
}

impl From<toml::de::Error> for FlagsError {
    fn from(err: toml::de::Error) -> Self {
        Self::parse(err.to_string())
    }
}
