//! Node registry entity model and DTOs.

use serde::{Deserialize, Serialize};
use spindrift_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `nodes` table: one machine's capability snapshot.
/// Advisory metadata for operational visibility and capacity-aware
/// scheduling; the claim protocol never consults it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Node {
    pub id: DbId,
    pub node_name: String,
    pub ip_address: String,
    pub cpu_cores: i32,
    pub memory_gb: f64,
    pub status_id: StatusId,
    pub role_id: StatusId,
    pub registered_at: Timestamp,
    pub last_seen_at: Timestamp,
}

/// DTO for registering (or refreshing) a node. Upsert keyed by `node_name`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterNode {
    pub node_name: String,
    pub ip_address: String,
    pub cpu_cores: i32,
    pub memory_gb: f64,
}
