//! Repository for the `nodes` registry table.

use spindrift_core::types::DbId;
use sqlx::PgPool;

use crate::models::node::{Node, RegisterNode};
use crate::models::status::{NodeRole, NodeStatus};

/// Column list for `nodes` queries.
const COLUMNS: &str = "\
    id, node_name, ip_address, cpu_cores, memory_gb, status_id, role_id, \
    registered_at, last_seen_at";

/// Provides node registration and status updates.
pub struct NodeRepo;

impl NodeRepo {
    /// Register a node, or refresh its snapshot if the name is known.
    ///
    /// Upsert keyed by `node_name`: a restarted worker reclaims its row and
    /// the capability snapshot plus `last_seen_at` are brought current.
    pub async fn register(
        pool: &PgPool,
        input: &RegisterNode,
        status: NodeStatus,
        role: NodeRole,
    ) -> Result<Node, sqlx::Error> {
        let query = format!(
            "INSERT INTO nodes \
                 (node_name, ip_address, cpu_cores, memory_gb, status_id, role_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (node_name) DO UPDATE SET \
                 ip_address = EXCLUDED.ip_address, \
                 cpu_cores = EXCLUDED.cpu_cores, \
                 memory_gb = EXCLUDED.memory_gb, \
                 status_id = EXCLUDED.status_id, \
                 role_id = EXCLUDED.role_id, \
                 last_seen_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(&input.node_name)
            .bind(&input.ip_address)
            .bind(input.cpu_cores)
            .bind(input.memory_gb)
            .bind(status.id())
            .bind(role.id())
            .fetch_one(pool)
            .await
    }

    /// Update a node's availability status, refreshing `last_seen_at`.
    pub async fn set_status(
        pool: &PgPool,
        node_id: DbId,
        status: NodeStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE nodes SET status_id = $2, last_seen_at = NOW() WHERE id = $1",
        )
        .bind(node_id)
        .bind(status.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// All nodes currently registered with the render role and active
    /// status, for operational visibility.
    pub async fn active_render_nodes(pool: &PgPool) -> Result<Vec<Node>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nodes WHERE role_id = $1 AND status_id = $2 ORDER BY node_name"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(NodeRole::Render.id())
            .bind(NodeStatus::Active.id())
            .fetch_all(pool)
            .await
    }
}
