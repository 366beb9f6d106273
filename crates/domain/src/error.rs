//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DeviceStoreError`] via `#[from]` or an explicit `From` impl.

/// Top-level error returned by services and repository ports.
#[derive(Debug, thiserror::Error)]
pub enum DeviceStoreError {
    /// The request carried invalid or missing input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A single-resource lookup found nothing.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The backing store failed (connectivity, constraint, decoding).
    #[error("{0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Client-input problems detected before or instead of touching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id is required")]
    MissingId,

    #[error("device id is not a valid field")]
    IdNotAllowed,

    #[error("device name must not be empty")]
    EmptyName,

    #[error("device brand must not be empty")]
    EmptyBrand,

    #[error("invalid update request")]
    NothingToUpdate,

    #[error("missing brand query parameter")]
    MissingBrandQuery,
}

/// A lookup by identifier matched no record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
