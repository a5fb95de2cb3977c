//! Renderer invocation seam.
//!
//! The worker loop talks to a `FrameRenderer` trait object so tests can
//! substitute a stub; production wires in `PovRayRenderer`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use spindrift_core::povray::{self, RenderError};
use spindrift_core::render_config::RenderConfig;

/// Renders one frame from a prepared scene file. The exit status of the
/// underlying process is the sole success signal.
#[async_trait]
pub trait FrameRenderer: Send + Sync {
    async fn render(
        &self,
        config: &RenderConfig,
        scene_file: &Path,
        image_file: &Path,
    ) -> Result<(), RenderError>;
}

/// Production renderer: blocking POV-Ray subprocess with a kill timeout.
pub struct PovRayRenderer {
    binary: PathBuf,
    timeout: Duration,
}

impl PovRayRenderer {
    /// Resolve the renderer binary up front; a missing renderer is a
    /// startup failure, not a per-frame one.
    pub fn new(override_path: Option<&Path>, timeout: Duration) -> Result<Self, RenderError> {
        Ok(Self {
            binary: povray::resolve_renderer_binary(override_path)?,
            timeout,
        })
    }

    /// Path of the resolved renderer binary.
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl FrameRenderer for PovRayRenderer {
    async fn render(
        &self,
        config: &RenderConfig,
        scene_file: &Path,
        image_file: &Path,
    ) -> Result<(), RenderError> {
        povray::render_frame(&self.binary, config, scene_file, image_file, self.timeout).await
    }
}
