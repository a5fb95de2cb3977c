//! Store-level error type.
//!
//! Most repositories return `sqlx::Error` directly; `StoreError` exists for
//! the operations with failure modes of their own (job validation, particle
//! batch texture resolution).

use spindrift_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A particle batch referenced a texture name with no `textures` row.
    /// The whole batch is rejected; nothing is persisted.
    #[error("texture not found: {0}")]
    TextureNotFound(String),

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
