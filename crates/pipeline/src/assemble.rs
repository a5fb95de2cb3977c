//! Video assembly stage: stitch a completed job's frames into an MP4.

use std::path::{Path, PathBuf};

use spindrift_core::assembly::{self, AssemblyError};
use spindrift_core::output::JobLayout;
use spindrift_db::models::job::Job;
use spindrift_db::repositories::JobRepo;
use spindrift_db::DbPool;

/// Error type for the assembly stage.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Assemble the next completed job, if any.
///
/// Returns the output video path, or `None` when no completed job exists.
/// A nonzero ffmpeg exit fails this stage only; job and frame state are
/// untouched either way.
pub async fn assemble_next(
    pool: &DbPool,
    output_root: &Path,
    template: &Path,
) -> Result<Option<PathBuf>, AssembleError> {
    let Some(job) = JobRepo::next_completed(pool).await? else {
        return Ok(None);
    };
    let video = assemble_job(&job, output_root, template).await?;
    Ok(Some(video))
}

/// Assemble one specific job's frames.
pub async fn assemble_job(
    job: &Job,
    output_root: &Path,
    template: &Path,
) -> Result<PathBuf, AssembleError> {
    let layout = JobLayout::new(output_root, &job.job_name, template);
    let video = layout.video_file();

    tracing::info!(
        job_id = job.id,
        job_name = %job.job_name,
        fps = job.fps,
        total_frames = job.total_frames,
        output = %video.display(),
        "assembling video"
    );
    assembly::assemble_video(job.fps, &layout.image_pattern(), job.total_frames, &video).await?;

    Ok(video)
}
