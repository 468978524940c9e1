//! Result and error types for formprobe.

use thiserror::Error;

/// Result type for formprobe operations
pub type FormProbeResult<T> = Result<T, FormProbeError>;

/// Errors that can occur while exercising an edit page.
///
/// Two families matter to callers: configuration errors (the test or the
/// field schema is wrong, nothing transient about it) and assertion
/// failures (the page or the stored record did not match expectations).
#[derive(Debug, Error)]
pub enum FormProbeError {
    /// A field's kind has no built-in recipe and no custom handler claimed it
    #[error("field '{field}' of kind {kind} is not testable for {behavior}, found on {page}")]
    UnsupportedFieldKind {
        /// Field name
        field: String,
        /// Declared field kind
        kind: String,
        /// Behavior that was being dispatched
        behavior: String,
        /// Edit page the field belongs to
        page: String,
    },

    /// A required-visible-fields check did not find every requested name
    #[error("{page}: required fields not visible: {}", missing.join(", "))]
    MissingRequiredFields {
        /// Edit page that was checked
        page: String,
        /// Requested names absent from the resolved field list
        missing: Vec<String>,
    },

    /// An operation that needs the new record was invoked without one
    #[error("new record not provided")]
    NewRecordMissing,

    /// A handler read the new value during a behavior that never sets it
    #[error("new value for field '{field}' is not available in this behavior")]
    NewValueUnavailable {
        /// Field name
        field: String,
    },

    /// A handler asked for the browser handle during value comparison
    #[error("browser handle for field '{field}' is not available in this behavior")]
    BrowserUnavailable {
        /// Field name
        field: String,
    },

    /// A browser-visible or post-save expectation was not met
    #[error("assertion failed: {message}")]
    AssertionFailed {
        /// Human-readable description of the mismatch
        message: String,
    },

    /// The schema provider could not resolve an edit page
    #[error("schema error: {message}")]
    SchemaError {
        /// Error message
        message: String,
    },

    /// The browser driver reported a failure unrelated to an assertion
    #[error("driver error: {message}")]
    DriverError {
        /// Error message
        message: String,
    },

    /// The record store failed to refresh a record
    #[error("record refresh failed: {message}")]
    RefreshError {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormProbeError {
    /// Create an assertion failure with the given message
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether this error is a test-authoring/configuration problem rather
    /// than a mismatch observed in the browser or the store
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFieldKind { .. }
                | Self::MissingRequiredFields { .. }
                | Self::NewRecordMissing
                | Self::NewValueUnavailable { .. }
                | Self::BrowserUnavailable { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_kind_names_field_kind_and_page() {
        let err = FormProbeError::UnsupportedFieldKind {
            field: "status".to_string(),
            kind: "Foo".to_string(),
            behavior: "preview".to_string(),
            page: "EditUser".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("status"));
        assert!(msg.contains("Foo"));
        assert!(msg.contains("EditUser"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_missing_fields_lists_names() {
        let err = FormProbeError::MissingRequiredFields {
            page: "EditUser".to_string(),
            missing: vec!["email".to_string(), "role_id".to_string()],
        };
        assert!(err.to_string().contains("email, role_id"));
    }

    #[test]
    fn test_assertion_failure_is_not_configuration() {
        let err = FormProbeError::assertion("expected 'a', got 'b'");
        assert!(!err.is_configuration_error());
        assert!(err.to_string().contains("expected 'a', got 'b'"));
    }
}
