//! Unified error type for registry operations
//!
//! One enum covers the whole error taxonomy so expected failures cross the
//! core boundary as typed results rather than opaque faults. `Integrity` is
//! the only fatal kind: it signals invariant breakage inside the store, not
//! normal contention, and callers are expected to abort loudly.

use serde::{Deserialize, Serialize};

/// Error type for all registry operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RegistryError {
    /// Declaration already registered for its chain and DID
    #[error("duplicate declaration: {message}")]
    Duplicate {
        /// Description of the colliding declaration
        message: String,
    },

    /// A chronologically later declaration for the chain already exists
    #[error("out of order: {message}")]
    OutOfOrder {
        /// Description of the ordering conflict
        message: String,
    },

    /// An invariant the engine assumes was violated in the store
    #[error("integrity violation: {message}")]
    Integrity {
        /// Description of the broken invariant
        message: String,
    },

    /// Lookup target does not exist
    #[error("not found: {message}")]
    NotFound {
        /// Description of what was missing
        message: String,
    },

    /// A declaration field does not fit its encoded representation
    #[error("encoding failed: {message}")]
    Encoding {
        /// Description of the offending field
        message: String,
    },

    /// Underlying store operation failed
    #[error("storage failed: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },
}

impl RegistryError {
    /// Create a duplicate-declaration error
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    /// Create an out-of-order error
    pub fn out_of_order(message: impl Into<String>) -> Self {
        Self::OutOfOrder {
            message: message.into(),
        }
    }

    /// Create an integrity-violation error
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Stable machine-readable tag for the API boundary
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "duplicate",
            Self::OutOfOrder { .. } => "out-of-order",
            Self::Integrity { .. } => "integrity",
            Self::NotFound { .. } => "not-found",
            Self::Encoding { .. } => "encoding",
            Self::Storage { .. } => "storage",
        }
    }

    /// Whether the caller may treat this as an expected, recoverable outcome
    ///
    /// Integrity and storage failures indicate breakage rather than
    /// contention; everything else is surfaced to the caller verbatim.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Integrity { .. } | Self::Storage { .. })
    }
}

/// Standard Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::duplicate("chain 2 did 42");
        assert_eq!(err.to_string(), "duplicate declaration: chain 2 did 42");
        assert_eq!(err.kind(), "duplicate");
    }

    #[test]
    fn test_recoverability_split() {
        assert!(RegistryError::duplicate("x").is_recoverable());
        assert!(RegistryError::out_of_order("x").is_recoverable());
        assert!(RegistryError::not_found("x").is_recoverable());
        assert!(RegistryError::encoding("x").is_recoverable());
        assert!(!RegistryError::integrity("x").is_recoverable());
        assert!(!RegistryError::storage("x").is_recoverable());
    }
}
