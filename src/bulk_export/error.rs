//! Error types for the bulk export program

use thiserror::Error;

use super::format::FormatError;

/// Errors that can occur while loading or executing a bulk export
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// A serialized tuple did not split into a key and a format
    #[error("Malformed column tuple #{index}: {tuple:?}")]
    MalformedTuple { index: usize, tuple: String },

    #[error("Column #{index} has an empty property key")]
    EmptyKey { index: usize },

    #[error("Duplicate column key: {0}")]
    DuplicateKey(String),

    /// A key or format contains a reserved separator character
    #[error("Reserved separator in {field}: {value:?}")]
    ReservedSeparator { field: &'static str, value: String },

    #[error("Invalid format {pattern:?} for column {key}")]
    InvalidFormat {
        key: String,
        pattern: String,
        #[source]
        source: FormatError,
    },

    /// A path lacks a label the active columns require
    #[error("Path has no value labeled {label:?}")]
    MissingLabel { label: String },

    #[error("Format {pattern:?} cannot render column {key}")]
    FormatMismatch {
        key: String,
        pattern: String,
        #[source]
        source: FormatError,
    },

    /// The input attribute holds something other than traversers
    #[error("Property {key} holds {found}, expected traversers")]
    UnexpectedInput { key: String, found: &'static str },
}

impl ExportError {
    /// Raised while constructing or decoding a run configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ExportError::MalformedTuple { .. }
                | ExportError::EmptyKey { .. }
                | ExportError::DuplicateKey(_)
                | ExportError::ReservedSeparator { .. }
                | ExportError::InvalidFormat { .. }
        )
    }

    /// Raised by vertex data during execution
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ExportError::MissingLabel { .. }
                | ExportError::FormatMismatch { .. }
                | ExportError::UnexpectedInput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(ExportError: Send, Sync, std::error::Error);

    #[test]
    fn test_classification() {
        let config = ExportError::DuplicateKey("name".into());
        assert!(config.is_config_error());
        assert!(!config.is_data_error());

        let data = ExportError::MissingLabel {
            label: "missing".into(),
        };
        assert!(data.is_data_error());
        assert!(!data.is_config_error());
    }

    #[test]
    fn test_display() {
        let err = ExportError::MissingLabel {
            label: "missing".into(),
        };
        assert_eq!(err.to_string(), "Path has no value labeled \"missing\"");

        let err = ExportError::MalformedTuple {
            index: 1,
            tuple: "age".into(),
        };
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_format_source_is_kept() {
        use std::error::Error;

        let err = ExportError::InvalidFormat {
            key: "age".into(),
            pattern: "%q".into(),
            source: FormatError::UnknownConversion('q'),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("unknown conversion '%q'"));
    }
}
