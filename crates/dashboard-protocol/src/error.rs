//! Error types for form validation and export serialization

use thiserror::Error;

/// A form was submitted with blank or malformed required fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// One or more required fields are missing
    #[error("{message}")]
    Incomplete {
        /// User-facing message for the whole form
        message: String,
        /// Offending fields, sorted
        fields: Vec<String>,
    },
}

impl FormError {
    /// Offending field names
    #[must_use]
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Incomplete { fields, .. } => fields,
        }
    }

    /// User-facing message
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Incomplete { message, .. } => message,
        }
    }
}

/// Serializing an export failed
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV encoding failed
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Buffered CSV output could not be recovered
    #[error("CSV export failed: {0}")]
    Buffer(String),
}

impl From<FormError> for dashboard_core::Error {
    fn from(err: FormError) -> Self {
        let field = err
            .fields()
            .first()
            .cloned()
            .unwrap_or_else(|| "form".to_string());
        Self::Validation {
            field,
            message: err.message().to_string(),
        }
    }
}

impl From<ExportError> for dashboard_core::Error {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Json(json) => Self::Serialization(json),
            other => Self::Export(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_form_error_converts_to_validation() {
        let err = FormError::Incomplete {
            message: "Please enter a view name".to_string(),
            fields: vec!["name".to_string()],
        };
        assert_eq!(err.to_string(), "Please enter a view name");

        let core: dashboard_core::Error = err.into();
        match core {
            dashboard_core::Error::Validation { field, message } => {
                assert_eq!(field, "name");
                assert_eq!(message, "Please enter a view name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_export_error_display() {
        let err = ExportError::Buffer("writer poisoned".to_string());
        assert_eq!(err.to_string(), "CSV export failed: writer poisoned");

        let core: dashboard_core::Error = err.into();
        assert!(matches!(core, dashboard_core::Error::Export(_)));
    }
}
