//! Texture reference entity model.

use serde::Serialize;
use sqlx::FromRow;

/// A row from the `textures` table. Reference data, populated out-of-band;
/// particle rows point at it by ID, never by name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Texture {
    pub id: i16,
    pub texture_name: String,
}
