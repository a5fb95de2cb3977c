//! Scene-input building: merges the static scene template with the
//! generated particle object list for one frame.
//!
//! The template carries a `//PARTICLE_SYSTEM` marker line; the worker
//! replaces it with one `sphere` object per particle and writes the result
//! into the job's output directory. The file is fsynced before the renderer
//! is invoked so a crashed worker never leaves the renderer a torn input.

use std::path::Path;

use tokio::io::AsyncWriteExt;

/// Marker line in the scene template replaced by the particle objects.
pub const PARTICLE_MARKER: &str = "//PARTICLE_SYSTEM";

/// Error type for scene-input building.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene template not found: {0}")]
    TemplateNotFound(String),

    #[error("scene template has no {PARTICLE_MARKER} marker: {0}")]
    MissingMarker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal particle geometry needed to emit a renderer object.
///
/// The worker maps stored particle rows into these; velocity is part of the
/// stored snapshot but does not appear in the emitted geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePoint {
    pub position: [f64; 3],
    pub size: f64,
}

/// Format a particle partition as renderer object syntax.
///
/// One `sphere { <x, y, z>, size, 1 }` line per particle. An empty slice
/// formats to an empty string, which leaves the template's static content
/// untouched.
pub fn format_particle_objects(particles: &[ParticlePoint]) -> String {
    let mut out = String::with_capacity(particles.len() * 48);
    for p in particles {
        out.push_str(&format!(
            "sphere {{ <{}, {}, {}> , {}, 1 }}\n",
            p.position[0], p.position[1], p.position[2], p.size
        ));
    }
    out
}

/// Merge particle objects into the template content.
///
/// Fails if the template never contained the marker, since that would
/// silently render a frame with no particles.
pub fn merge_template(template: &str, particle_objects: &str) -> Result<String, SceneError> {
    if !template.contains(PARTICLE_MARKER) {
        return Err(SceneError::MissingMarker(PARTICLE_MARKER.to_string()));
    }
    Ok(template.replace(PARTICLE_MARKER, particle_objects))
}

/// Build the scene input file for one frame.
///
/// Reads the template, substitutes the particle objects, writes the result
/// to `scene_file`, and syncs it to stable storage before returning.
pub async fn build_scene_file(
    template_path: &Path,
    scene_file: &Path,
    particle_objects: &str,
) -> Result<(), SceneError> {
    let template = tokio::fs::read_to_string(template_path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SceneError::TemplateNotFound(template_path.to_string_lossy().to_string())
            }
            _ => SceneError::Io(e),
        })?;

    let content = merge_template(&template, particle_objects)?;

    let mut file = tokio::fs::File::create(scene_file).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    Ok(())
}
