//! Job submission: manifest in, registered job out.
//!
//! Creates the job row, bulk-creates its frames, then ingests one particle
//! batch per manifest frame. Each batch is atomic in the store; a texture
//! resolution failure aborts the submission with the job left visibly
//! incomplete rather than silently half-ingested.

use spindrift_db::models::job::{CreateRenderJob, Job};
use spindrift_db::repositories::{FrameRepo, JobRepo, ParticleRepo};
use spindrift_db::{DbPool, StoreError};

use crate::manifest::{JobManifest, ManifestError};

/// Error type for job submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Log ingestion progress every this many frames.
const PROGRESS_EVERY: usize = 100;

/// Register the manifest's job and ingest its particle data.
///
/// On success the job is fully claimable: `total_frames` pending frames
/// exist and every manifest batch is persisted.
pub async fn submit_job(pool: &DbPool, manifest: &JobManifest) -> Result<Job, SubmitError> {
    let job = JobRepo::create(
        pool,
        &CreateRenderJob {
            job_name: manifest.job_name.clone(),
            total_frames: manifest.total_frames,
            config: manifest.config.clone(),
        },
    )
    .await?;
    tracing::info!(job_id = job.id, job_name = %job.job_name, "created job");

    let created = FrameRepo::create_for_job(pool, job.id, manifest.total_frames).await?;
    tracing::info!(job_id = job.id, frames = created, "created frames");

    let mut inserted_total = 0u64;
    for (i, batch) in manifest.frames.iter().enumerate() {
        inserted_total +=
            ParticleRepo::insert_batch(pool, job.id, batch.frame, &batch.particles).await?;
        if (i + 1) % PROGRESS_EVERY == 0 {
            tracing::info!(
                job_id = job.id,
                frames_ingested = i + 1,
                frames_with_particles = manifest.frames.len(),
                "ingesting particle data"
            );
        }
    }
    tracing::info!(
        job_id = job.id,
        particles = inserted_total,
        "particle ingestion complete"
    );

    Ok(job)
}
