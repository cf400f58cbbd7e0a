//! Error types for the testing harness.
//!
//! Every variant is a precondition failure aimed at the test author: none is
//! retried or caught inside the harness, and each message carries enough
//! context (component path, row, column, counts) to locate the problem.

use std::fmt;
use std::path::PathBuf;

use lattice_probe_core::ObjectError;

/// Result type alias for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Why a component refused a simulated user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotInteractableReason {
    /// The component or one of its ancestors is hidden.
    NotVisible,
    /// The component itself is disabled.
    NotEnabled,
    /// The component is enabled but an ancestor is disabled.
    ParentDisabled,
    /// The component holds a value and is read-only.
    ReadOnly,
}

impl fmt::Display for NotInteractableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotVisible => write!(f, "it is not effectively visible"),
            Self::NotEnabled => write!(f, "it is not enabled"),
            Self::ParentDisabled => write!(f, "its parent is not enabled"),
            Self::ReadOnly => write!(f, "it is read-only"),
        }
    }
}

/// Errors raised by the harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A simulated interaction targeted a component the user could not act on.
    #[error("{component} is not interactable: {reason}")]
    NotInteractable {
        component: String,
        reason: NotInteractableReason,
    },

    /// A row index past the end of a data source.
    #[error("Requested row {requested} but the data source only has {actual} rows")]
    IndexOutOfRange { requested: usize, actual: usize },

    /// The operation is not supported by the target.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// The cell does not hold a renderer-produced component.
    #[error("No component in cell at row {row}, column '{column}'")]
    NoComponentInCell { row: usize, column: String },

    /// A lookup expected exactly one match.
    #[error("Expected exactly one match for {spec} but found {count}\n{tree}")]
    AmbiguousMatch {
        count: usize,
        spec: String,
        tree: String,
    },

    /// A lookup expected a match count within a range.
    #[error("Expected {expected} matches for {spec} but found {count}\n{tree}")]
    UnexpectedMatchCount {
        count: usize,
        expected: String,
        spec: String,
        tree: String,
    },

    /// A grid did not have the expected number of rows.
    #[error("Expected {expected} rows but found {actual}\n{dump}")]
    RowCountMismatch {
        expected: usize,
        actual: usize,
        dump: String,
    },

    /// No column with the given key.
    #[error("No column with key '{key}', available: {available:?}")]
    NoSuchColumn { key: String, available: Vec<String> },

    /// A value of the wrong kind was written to a field.
    #[error("{component} expects a {expected} value, got {got}")]
    ValueTypeMismatch {
        component: String,
        expected: &'static str,
        got: &'static str,
    },

    /// Navigation found no route and no error handler.
    #[error("No route found for '{location}', registered routes: {available:?}")]
    RouteNotFound {
        location: String,
        available: Vec<String>,
    },

    /// The test environment has not been set up on this thread.
    #[error("Test environment is not set up on this thread; call TestEnvironment::set_up first")]
    EnvironmentNotSetUp,

    /// The test environment was set up twice on this thread.
    #[error("Test environment is already set up on this thread")]
    EnvironmentAlreadySetUp,

    /// Configuration could not be read or parsed.
    #[error("Invalid harness configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// Object model error.
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),
}

impl HarnessError {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The reason carried by a [`HarnessError::NotInteractable`].
    pub fn not_interactable_reason(&self) -> Option<NotInteractableReason> {
        match self {
            Self::NotInteractable { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_names_both_values() {
        let err = HarnessError::IndexOutOfRange {
            requested: 7,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "Requested row 7 but the data source only has 7 rows"
        );
    }

    #[test]
    fn test_not_interactable_message() {
        let err = HarnessError::NotInteractable {
            component: "VerticalLayout > Button[caption='Save']".into(),
            reason: NotInteractableReason::ParentDisabled,
        };
        assert_eq!(
            err.to_string(),
            "VerticalLayout > Button[caption='Save'] is not interactable: its parent is not enabled"
        );
        assert_eq!(
            err.not_interactable_reason(),
            Some(NotInteractableReason::ParentDisabled)
        );
    }

    #[test]
    fn test_object_error_conversion() {
        let err: HarnessError = ObjectError::InvalidObjectId.into();
        assert!(matches!(err, HarnessError::Object(ObjectError::InvalidObjectId)));
    }
}
