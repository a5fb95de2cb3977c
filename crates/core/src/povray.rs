//! POV-Ray command construction and invocation.
//!
//! The renderer runs as a blocking subprocess; its exit code is the sole
//! success signal. A hung render is killed once the timeout elapses so a
//! worker never blocks indefinitely on one frame.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::render_config::RenderConfig;

/// Error type for renderer invocation.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer binary not found: {0}")]
    BinaryNotFound(String),

    #[error("renderer execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("renderer timed out after {0:?} and was killed")]
    TimedOut(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Locate the POV-Ray binary.
///
/// An explicit override wins; otherwise the first `povray` found on `$PATH`
/// is used. Resolution happens once at worker startup so a missing renderer
/// is a startup failure, not a per-frame one.
pub fn resolve_renderer_binary(override_path: Option<&Path>) -> Result<PathBuf, RenderError> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(RenderError::BinaryNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join("povray");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(RenderError::BinaryNotFound("povray (searched $PATH)".to_string()))
}

/// Build the renderer argument list for one frame.
///
/// `+I`/`+O` name the scene input and image output, `+W`/`+H`/`+Q` come
/// from the job configuration, and `+A`/`+R` are appended only when
/// antialiasing is on.
pub fn build_render_args(
    config: &RenderConfig,
    scene_file: &Path,
    image_file: &Path,
) -> Vec<String> {
    let mut args = vec![
        format!("+I{}", scene_file.display()),
        format!("+O{}", image_file.display()),
        format!("+W{}", config.width),
        format!("+H{}", config.height),
        format!("+Q{}", config.quality),
    ];
    if config.antialias {
        args.push("+A".to_string());
        args.push(format!("+R{}", config.antialias_depth));
    }
    args
}

/// Render one frame as a blocking subprocess.
///
/// Returns `Ok(())` only on exit code 0. If the child outlives `timeout`
/// it is killed and `RenderError::TimedOut` is returned.
pub async fn render_frame(
    binary: &Path,
    config: &RenderConfig,
    scene_file: &Path,
    image_file: &Path,
    timeout: Duration,
) -> Result<(), RenderError> {
    let args = build_render_args(config, scene_file, image_file);

    let child = tokio::process::Command::new(binary)
        .args(&args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                RenderError::BinaryNotFound(binary.to_string_lossy().to_string())
            }
            _ => RenderError::Io(e),
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        // Dropping the timed-out future kills the child (kill_on_drop).
        Err(_) => return Err(RenderError::TimedOut(timeout)),
    };

    if !output.status.success() {
        return Err(RenderError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}
