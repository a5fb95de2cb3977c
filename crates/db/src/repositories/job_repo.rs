//! Repository for the `render_jobs` table.
//!
//! Uses the `JobStatus` enum from `models::status` for all status writes.
//! Job status only rolls forward: pending -> in_progress -> completed.

use spindrift_core::render_config::{
    validate_job_name, validate_render_config, validate_total_frames,
};
use spindrift_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::job::{CreateRenderJob, Job};
use crate::models::status::{FrameStatus, JobStatus};

/// Column list for `render_jobs` queries.
const COLUMNS: &str = "\
    id, job_name, status_id, total_frames, width, height, fps, quality, \
    antialias, antialias_depth, antialias_threshold, sampling_method, \
    created_at";

/// Provides operations for render jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a new pending job.
    ///
    /// The configuration is validated before anything is written; a bad
    /// job never reaches the database.
    pub async fn create(pool: &PgPool, input: &CreateRenderJob) -> Result<Job, StoreError> {
        validate_job_name(&input.job_name)?;
        validate_total_frames(input.total_frames)?;
        validate_render_config(&input.config)?;

        let query = format!(
            "INSERT INTO render_jobs \
                 (job_name, status_id, total_frames, width, height, fps, quality, \
                  antialias, antialias_depth, antialias_threshold, sampling_method) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(&input.job_name)
            .bind(JobStatus::Pending.id())
            .bind(input.total_frames)
            .bind(input.config.width)
            .bind(input.config.height)
            .bind(input.config.fps)
            .bind(input.config.quality)
            .bind(input.config.antialias)
            .bind(input.config.antialias_depth)
            .bind(input.config.antialias_threshold)
            .bind(input.config.sampling_method)
            .fetch_one(pool)
            .await?;
        Ok(job)
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM render_jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The lowest-ID job that still has work: pending or in progress.
    ///
    /// Workers started without an explicit job ID render this one.
    pub async fn next_unfinished(pool: &PgPool) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM render_jobs \
             WHERE status_id IN ($1, $2) \
             ORDER BY id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(JobStatus::Pending.id())
            .bind(JobStatus::InProgress.id())
            .fetch_optional(pool)
            .await
    }

    /// The lowest-ID completed job, for the video-assembly stage.
    pub async fn next_completed(pool: &PgPool) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM render_jobs \
             WHERE status_id = $1 \
             ORDER BY id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(JobStatus::Completed.id())
            .fetch_optional(pool)
            .await
    }

    /// Roll the job status forward from its frames, monotonically.
    ///
    /// - all frames exist and are terminal (rendered/error) => completed
    /// - any frame has left pending => at least in_progress
    ///
    /// A single conditional UPDATE, so concurrent reporters cannot regress
    /// the status; terminal frames never revert, so `completed` is stable.
    pub async fn recompute_status(pool: &PgPool, job_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE render_jobs j SET status_id = CASE \
                 WHEN EXISTS (SELECT 1 FROM frames f WHERE f.job_id = j.id) \
                      AND NOT EXISTS (SELECT 1 FROM frames f \
                                      WHERE f.job_id = j.id AND f.status_id NOT IN ($2, $3)) \
                     THEN $4 \
                 WHEN EXISTS (SELECT 1 FROM frames f \
                              WHERE f.job_id = j.id AND f.status_id <> $5) \
                     THEN GREATEST(j.status_id, $6) \
                 ELSE j.status_id \
             END \
             WHERE j.id = $1",
        )
        .bind(job_id)
        .bind(FrameStatus::Rendered.id())
        .bind(FrameStatus::Error.id())
        .bind(JobStatus::Completed.id())
        .bind(FrameStatus::Pending.id())
        .bind(JobStatus::InProgress.id())
        .execute(pool)
        .await?;
        Ok(())
    }
}
