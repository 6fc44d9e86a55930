//! Error types for availability-engine operations.

use thiserror::Error;

use crate::model::AvailabilitySlot;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid {field}: '{value}' (expected {expected})")]
    InvalidFormat {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Requested slot conflicts with {} existing booking(s)", conflicts.len())]
    Conflict {
        conflicts: Vec<String>,
        suggestions: Vec<AvailabilitySlot>,
    },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        BookingError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True for malformed input and rule violations. These are never retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidFormat { .. } | BookingError::Validation { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BookingError::NotFound { .. })
    }

    /// The input field an error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            BookingError::InvalidFormat { field, .. } | BookingError::Validation { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }
}

/// A data-access failure reported by one of the external stores.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Store error during {operation}: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
