//! Error types for the output core.
//!
//! Two taxonomies, one per component: [`OutputError`] for the writer factory
//! and the writers it produces, [`CursorError`] for the attribute cursor.
//! All errors are reported synchronously to the immediate caller and none is
//! retried internally — retry (for example re-opening a sink) is caller
//! policy. No error here is fatal to the process.

use std::io;

use thiserror::Error;

/// An error from the writer factory or a writer it produced.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The property name is not in the recognized set.
    #[error("property not supported: {0}")]
    UnsupportedProperty(String),

    /// The property name is recognized but the value was rejected.
    ///
    /// The only rejection in the recognized set is enabling
    /// `reuse-instance`: stream writers are not safe for reuse across
    /// threads, so the factory refuses to turn the setting on.
    #[error("invalid value for property {name}: {reason}")]
    InvalidPropertyValue {
        /// The property name as passed by the caller.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The output target cannot be realized as a writer.
    #[error("unsupported output target: {0}")]
    UnsupportedTarget(&'static str),

    /// The underlying sink could not be opened.
    #[error("failed to open output sink: {0}")]
    WriterConstruction(#[source] io::Error),

    /// A writer operation was called in a state that cannot accept it,
    /// such as writing an attribute with no start tag open.
    #[error("invalid writer state: {0}")]
    InvalidWriterState(&'static str),

    /// The sink rejected a write.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    /// The encoding label is not recognized.
    #[error("unknown encoding: {0}")]
    Encoding(String),
}

/// An error from the attribute cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor is exhausted; every attribute has been visited.
    #[error("no more attributes")]
    NoMoreElements,

    /// Removal was requested without a matching prior advance — either
    /// `advance` has not been called yet, or the attribute it returned was
    /// already removed.
    #[error("no attribute to remove: advance has not been called since the last removal")]
    InvalidState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_property_display() {
        let err = OutputError::UnsupportedProperty("no.such.property".to_string());
        assert_eq!(err.to_string(), "property not supported: no.such.property");
    }

    #[test]
    fn test_invalid_property_value_display() {
        let err = OutputError::InvalidPropertyValue {
            name: "reuse-instance".to_string(),
            reason: "not thread safe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for property reuse-instance: not thread safe"
        );
    }

    #[test]
    fn test_writer_construction_wraps_io_cause() {
        let cause = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = OutputError::WriterConstruction(cause);
        assert!(err.to_string().starts_with("failed to open output sink"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_cursor_error_display() {
        assert_eq!(CursorError::NoMoreElements.to_string(), "no more attributes");
        assert!(CursorError::InvalidState.to_string().contains("advance"));
    }

    #[test]
    fn test_errors_implement_error_trait() {
        let err = OutputError::UnsupportedTarget("empty stream result");
        let _: &dyn std::error::Error = &err;
        let _: &dyn std::error::Error = &CursorError::NoMoreElements;
    }
}
