//! Video assembly: stitches a completed job's rendered frames into an MP4.
//!
//! Thin wrapper around `ffmpeg` with a numbered input glob. A nonzero exit
//! is a hard failure for the assembly stage only; it never touches frame or
//! job state.

use std::path::Path;

/// Error type for video assembly.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Build the ffmpeg argument list for stitching `total_frames` images into
/// a video at `fps`.
///
/// `-frames:v` caps the read at the job's frame count so a stray extra
/// image in the directory cannot lengthen the video.
pub fn build_assembly_args(
    fps: i32,
    image_pattern: &Path,
    total_frames: i32,
    video_file: &Path,
) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-framerate".to_string(),
        fps.to_string(),
        "-i".to_string(),
        image_pattern.display().to_string(),
        "-frames:v".to_string(),
        total_frames.to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        video_file.display().to_string(),
    ]
}

/// Run ffmpeg over the job's numbered frame images.
pub async fn assemble_video(
    fps: i32,
    image_pattern: &Path,
    total_frames: i32,
    video_file: &Path,
) -> Result<(), AssemblyError> {
    let args = build_assembly_args(fps, image_pattern, total_frames, video_file);

    let output = tokio::process::Command::new("ffmpeg")
        .args(&args)
        .output()
        .await
        .map_err(AssemblyError::NotFound)?;

    if !output.status.success() {
        return Err(AssemblyError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}
