//! Particle entity model and the generator-facing record DTO.

use serde::{Deserialize, Serialize};
use spindrift_core::scene::ParticlePoint;
use spindrift_core::types::DbId;
use sqlx::FromRow;

/// A row from the `particles` table. Append-only: a frame's particles are
/// written once, before the frame becomes eligible for rendering, and never
/// mutated afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Particle {
    pub id: DbId,
    pub job_id: DbId,
    pub frame_id: i32,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub size: f64,
    pub texture_id: i16,
}

impl Particle {
    /// Geometry needed to emit this particle into a scene file.
    pub fn point(&self) -> ParticlePoint {
        ParticlePoint {
            position: [self.position_x, self.position_y, self.position_z],
            size: self.size,
        }
    }
}

/// One particle as emitted by the external generator, textured by name.
/// Texture names are resolved to IDs at batch-insert time.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticleRecord {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub size: f64,
    pub texture: String,
}
