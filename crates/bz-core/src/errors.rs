//! Cross-cutting error types for Blue Zones.
//!
//! Domain-specific errors (`GeoError`, `PipelineError`, `ConfigError`) are
//! defined in their respective crates. The CLI converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by the core catalog and types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An epoch name that is not `past`, `present`, or `future`.
    #[error("Unknown epoch '{0}' (expected past, present, or future)")]
    UnknownEpoch(String),

    /// A layer id that is not part of the catalog.
    #[error("Unknown layer '{id}'")]
    UnknownLayer { id: String },

    /// Two layers of one epoch declare the same output column.
    #[error("Duplicate output column '{column}' in the {epoch} catalog")]
    DuplicateColumn { epoch: String, column: String },

    /// A declared column name that would break the namespacing scheme.
    #[error("Invalid column name '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}
