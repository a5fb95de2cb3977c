//! Render job entity model and DTOs.

use serde::{Deserialize, Serialize};
use spindrift_core::render_config::RenderConfig;
use spindrift_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `render_jobs` table.
///
/// The render configuration columns are immutable after creation; only
/// `status_id` moves, and only forward.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub job_name: String,
    pub status_id: StatusId,
    pub total_frames: i32,
    pub width: i32,
    pub height: i32,
    pub fps: i32,
    pub quality: i16,
    pub antialias: bool,
    pub antialias_depth: i16,
    pub antialias_threshold: f64,
    pub sampling_method: i16,
    pub created_at: Timestamp,
}

impl Job {
    /// The render settings shared by every frame of this job.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            quality: self.quality,
            antialias: self.antialias,
            antialias_depth: self.antialias_depth,
            antialias_threshold: self.antialias_threshold,
            sampling_method: self.sampling_method,
        }
    }
}

/// DTO for submitting a new render job.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRenderJob {
    pub job_name: String,
    pub total_frames: i32,
    #[serde(flatten)]
    pub config: RenderConfig,
}
