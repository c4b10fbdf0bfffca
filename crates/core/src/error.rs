//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested entity was absent.
    #[error("{0} not found")]
    NotFound(String),

    /// A part reference clashed case-insensitively with an existing one.
    #[error("a part with reference '{0}' already exists")]
    DuplicateReference(String),

    /// A part pointed at a supplier that does not exist.
    #[error("supplier not found for id '{0}'")]
    InvalidSupplier(String),

    /// Requested quantity exceeds what the catalog holds for the part.
    #[error("insufficient stock for part '{0}'")]
    InsufficientStock(String),

    /// Quantity was zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A selector matched more than one candidate.
    #[error("ambiguous selection: {0}")]
    Ambiguous(String),

    /// State forbids the operation (e.g. deleting a referenced record).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The acting user lacks the required capability.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn duplicate_reference(reference: impl Into<String>) -> Self {
        Self::DuplicateReference(reference.into())
    }

    pub fn invalid_supplier(id: impl Into<String>) -> Self {
        Self::InvalidSupplier(id.into())
    }

    pub fn insufficient_stock(part_name: impl Into<String>) -> Self {
        Self::InsufficientStock(part_name.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::Ambiguous(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
