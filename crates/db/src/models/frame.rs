//! Frame entity model.

use serde::Serialize;
use spindrift_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `frames` table. Composite key `(job_id, frame_id)`;
/// `frame_id` is the 1-based frame number within the job.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Frame {
    pub job_id: DbId,
    pub frame_id: i32,
    pub status_id: StatusId,
    /// Node currently (or last) holding the claim.
    pub claimed_by: Option<DbId>,
    pub claimed_at: Option<Timestamp>,
    /// Last sign of life from the claiming worker. Drives lease expiry.
    pub heartbeat_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}
