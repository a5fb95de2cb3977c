//! Generator manifest: the hand-off format between the external particle
//! generator and the submitter.
//!
//! The generator owns the physics; by the time a manifest reaches us, every
//! frame's particle snapshot is already materialized. We only validate the
//! coordination-level shape: frame numbers in range, one batch per frame.

use serde::Deserialize;
use spindrift_core::render_config::RenderConfig;
use spindrift_db::models::particle::ParticleRecord;

/// Error type for manifest parsing and shape validation.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame {frame} is outside 1..={total_frames}")]
    FrameOutOfRange { frame: i32, total_frames: i32 },

    #[error("frame {0} appears more than once; particle batches are written once per frame")]
    DuplicateFrame(i32),
}

/// One frame's pre-computed particle snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameBatch {
    pub frame: i32,
    pub particles: Vec<ParticleRecord>,
}

/// A complete job submission as emitted by the particle generator.
///
/// The render configuration fields sit at the top level of the JSON
/// document alongside the name and frame count.
#[derive(Debug, Clone, Deserialize)]
pub struct JobManifest {
    pub job_name: String,
    pub total_frames: i32,
    #[serde(flatten)]
    pub config: RenderConfig,
    /// Frames with particles. Frames absent from this list are still
    /// created; they render only static scene content.
    #[serde(default)]
    pub frames: Vec<FrameBatch>,
}

impl JobManifest {
    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.check_frames()?;
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub async fn from_file(path: &std::path::Path) -> Result<Self, ManifestError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Reject out-of-range and duplicated frame numbers.
    ///
    /// The store appends duplicate batches rather than deduplicating them,
    /// so this is the place that enforces "one batch per frame".
    fn check_frames(&self) -> Result<(), ManifestError> {
        let mut seen = std::collections::HashSet::with_capacity(self.frames.len());
        for batch in &self.frames {
            if batch.frame < 1 || batch.frame > self.total_frames {
                return Err(ManifestError::FrameOutOfRange {
                    frame: batch.frame,
                    total_frames: self.total_frames,
                });
            }
            if !seen.insert(batch.frame) {
                return Err(ManifestError::DuplicateFrame(batch.frame));
            }
        }
        Ok(())
    }
}
