//! Custom error types for Cashflow
//!
//! Every budget operation validates synchronously and fails with one of the
//! kinds below, leaving the session state untouched.

use thiserror::Error;

/// The main error type for Cashflow operations
#[derive(Error, Debug)]
pub enum CashflowError {
    /// An amount or income that must be positive (or in range) was not
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A node or asset label collides with an existing one
    #[error("{entity_type} already exists: {identifier}")]
    DuplicateLabel {
        entity_type: &'static str,
        identifier: String,
    },

    /// A referenced parent, node or asset does not exist
    #[error("{entity_type} not found: {identifier}")]
    UnknownLabel {
        entity_type: &'static str,
        identifier: String,
    },

    /// Attempt to edit, rename or remove the root income node
    #[error("The root '{0}' node cannot be changed directly; edit the planned income instead")]
    ProtectedRootOperation(String),

    /// A budget operation was attempted before `start`
    #[error("Budget not started")]
    NotStarted,

    /// `start` was called on a session that already has a budget
    #[error("Budget already started")]
    AlreadyStarted,

    /// Malformed input (empty label, unknown group, bad command syntax)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl CashflowError {
    /// Create a "not found" error for allocation nodes
    pub fn node_not_found(identifier: impl Into<String>) -> Self {
        Self::UnknownLabel {
            entity_type: "Node",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for parent nodes
    pub fn parent_not_found(identifier: impl Into<String>) -> Self {
        Self::UnknownLabel {
            entity_type: "Parent node",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for standalone assets
    pub fn asset_not_found(identifier: impl Into<String>) -> Self {
        Self::UnknownLabel {
            entity_type: "Asset",
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate error for allocation nodes
    pub fn duplicate_node(identifier: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            entity_type: "Node",
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate error for standalone assets
    pub fn duplicate_asset(identifier: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            entity_type: "Asset",
            identifier: identifier.into(),
        }
    }

    /// Check if this is an unknown-label error
    pub fn is_unknown_label(&self) -> bool {
        matches!(self, Self::UnknownLabel { .. })
    }

    /// Check if this is a duplicate-label error
    pub fn is_duplicate_label(&self) -> bool {
        matches!(self, Self::DuplicateLabel { .. })
    }

    /// Check if this is an input validation failure rather than an I/O fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::DuplicateLabel { .. }
                | Self::UnknownLabel { .. }
                | Self::ProtectedRootOperation(_)
                | Self::NotStarted
                | Self::AlreadyStarted
                | Self::Validation(_)
        )
    }
}

impl From<std::io::Error> for CashflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CashflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Cashflow operations
pub type CashflowResult<T> = Result<T, CashflowError>;
