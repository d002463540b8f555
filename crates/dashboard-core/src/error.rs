//! Error types for the dashboard pages

use std::{error::Error as StdError, fmt};

/// Main error type shared by every dashboard crate
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// A required form field was blank or malformed
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The data-access collaborator rejected or failed a call
    Store(String),

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Mutation attempted on a record that only exists in the static seed
    ReadOnly {
        /// Record that cannot be changed
        resource: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Export generation failed
    Export(String),

    /// Push subscription could not be opened or was lost
    Subscription(String),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Store(msg) => write!(f, "Store error: {msg}"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::ReadOnly { resource } => write!(f, "Resource is read-only: {resource}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::Subscription(msg) => write!(f, "Subscription error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        assert!(matches!(app_error, Error::Io(_)));
        assert!(format!("{}", app_error).contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation("company", "Company name is required");

        assert_eq!(
            format!("{}", error),
            "Validation error: company - Company name is required"
        );
    }

    #[test]
    fn test_store_error_display() {
        let error = Error::Store("connection reset".to_string());
        assert_eq!(format!("{}", error), "Store error: connection reset");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_read_only_error() {
        let error = Error::ReadOnly {
            resource: "client seed-3".to_string(),
        };
        assert_eq!(format!("{}", error), "Resource is read-only: client seed-3");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let app_error = Error::from(json_error);

        assert!(matches!(app_error, Error::Serialization(_)));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_all_error_display_variants() {
        let test_cases = vec![
            (
                Error::Configuration {
                    message: "bad url".to_string(),
                },
                "Configuration error: bad url",
            ),
            (
                Error::NotFound {
                    resource: "idea idea9".to_string(),
                },
                "Resource not found: idea idea9",
            ),
            (Error::Export("empty".to_string()), "Export error: empty"),
            (
                Error::Subscription("closed".to_string()),
                "Subscription error: closed",
            ),
            (Error::Other("other error".to_string()), "other error"),
        ];

        for (error, expected) in test_cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
