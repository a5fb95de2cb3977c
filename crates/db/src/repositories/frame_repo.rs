//! Repository for the `frames` table, including the claim protocol.
//!
//! The claim is the only cross-worker synchronization point in the system,
//! so it is a single conditional UPDATE; everything else here is plain
//! status bookkeeping.

use std::time::Duration;

use spindrift_core::types::DbId;
use sqlx::PgPool;

use crate::models::frame::Frame;
use crate::models::status::FrameStatus;

/// Column list for `frames` queries.
const COLUMNS: &str = "\
    job_id, frame_id, status_id, claimed_by, claimed_at, heartbeat_at, \
    updated_at";

/// Provides frame bookkeeping and the exclusive claim operation.
pub struct FrameRepo;

impl FrameRepo {
    /// Bulk-insert `total_frames` pending rows, numbered 1..=total_frames.
    ///
    /// Not idempotent: calling this twice for the same job fails on the
    /// composite primary key rather than silently duplicating rows.
    pub async fn create_for_job(
        pool: &PgPool,
        job_id: DbId,
        total_frames: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO frames (job_id, frame_id, status_id) \
             SELECT $1, n, $2 FROM generate_series(1, $3) AS n",
        )
        .bind(job_id)
        .bind(FrameStatus::Pending.id())
        .bind(total_frames)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Atomically claim the next frame of a job for a worker node.
    ///
    /// Eligible frames are `pending`, plus `claimed`/`rendering` frames
    /// whose heartbeat is older than `lease` (their worker is presumed
    /// dead). Lowest frame number wins. `FOR UPDATE SKIP LOCKED` prevents
    /// double-dispatch when many workers pull concurrently: a racing
    /// claimer skips the locked row and takes the next one instead.
    ///
    /// Returns `None` when the job has no eligible frame.
    pub async fn claim_next(
        pool: &PgPool,
        job_id: DbId,
        node_id: DbId,
        lease: Duration,
    ) -> Result<Option<Frame>, sqlx::Error> {
        let query = format!(
            "UPDATE frames \
             SET status_id = $2, claimed_by = $3, claimed_at = NOW(), \
                 heartbeat_at = NOW(), updated_at = NOW() \
             WHERE job_id = $1 AND frame_id = ( \
                 SELECT frame_id FROM frames \
                 WHERE job_id = $1 \
                   AND (status_id = $4 \
                        OR (status_id IN ($2, $5) \
                            AND heartbeat_at < NOW() - ($6 * INTERVAL '1 second'))) \
                 ORDER BY frame_id \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Frame>(&query)
            .bind(job_id)
            .bind(FrameStatus::Claimed.id())
            .bind(node_id)
            .bind(FrameStatus::Pending.id())
            .bind(FrameStatus::Rendering.id())
            .bind(lease.as_secs_f64())
            .fetch_optional(pool)
            .await
    }

    /// Unconditional status write, bumping the heartbeat.
    ///
    /// Used to move claimed -> rendering -> rendered|error. Last write wins
    /// on terminal states, but a terminal frame is never handed out again
    /// by `claim_next`.
    pub async fn update_status(
        pool: &PgPool,
        job_id: DbId,
        frame_id: i32,
        status: FrameStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE frames \
             SET status_id = $3, heartbeat_at = NOW(), updated_at = NOW() \
             WHERE job_id = $1 AND frame_id = $2",
        )
        .bind(job_id)
        .bind(frame_id)
        .bind(status.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Sign of life from the worker rendering this frame; keeps the claim's
    /// lease from expiring mid-render.
    pub async fn heartbeat(pool: &PgPool, job_id: DbId, frame_id: i32) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE frames SET heartbeat_at = NOW() WHERE job_id = $1 AND frame_id = $2",
        )
        .bind(job_id)
        .bind(frame_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Fetch one frame.
    pub async fn find(
        pool: &PgPool,
        job_id: DbId,
        frame_id: i32,
    ) -> Result<Option<Frame>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM frames WHERE job_id = $1 AND frame_id = $2");
        sqlx::query_as::<_, Frame>(&query)
            .bind(job_id)
            .bind(frame_id)
            .fetch_optional(pool)
            .await
    }

    /// All frames of a job, ordered by frame number.
    pub async fn list_for_job(pool: &PgPool, job_id: DbId) -> Result<Vec<Frame>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM frames WHERE job_id = $1 ORDER BY frame_id");
        sqlx::query_as::<_, Frame>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Count frames of a job in a given status.
    pub async fn count_with_status(
        pool: &PgPool,
        job_id: DbId,
        status: FrameStatus,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM frames WHERE job_id = $1 AND status_id = $2")
                .bind(job_id)
                .bind(status.id())
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
