//! Repository for the `particles` table.
//!
//! A frame's particles arrive as one batch, resolved and inserted inside a
//! single transaction: either every record lands or none do.

use std::collections::HashMap;

use spindrift_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::particle::{Particle, ParticleRecord};

/// Column list for `particles` queries.
const COLUMNS: &str = "\
    id, job_id, frame_id, position_x, position_y, position_z, \
    velocity_x, velocity_y, velocity_z, size, texture_id";

/// Provides batch insertion and per-texture reads of particle snapshots.
pub struct ParticleRepo;

impl ParticleRepo {
    /// Insert one frame's particle batch.
    ///
    /// Texture names are resolved in a single lookup before insertion; if
    /// any name has no `textures` row, the whole batch is rejected with
    /// `StoreError::TextureNotFound` and nothing is persisted.
    ///
    /// Calls are not deduplicated: a second batch for the same frame
    /// appends. Submitters call this exactly once per frame.
    pub async fn insert_batch(
        pool: &PgPool,
        job_id: DbId,
        frame_id: i32,
        records: &[ParticleRecord],
    ) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await.map_err(StoreError::Database)?;

        // One round-trip resolves every distinct texture name in the batch.
        let mut names: Vec<String> = records.iter().map(|r| r.texture.clone()).collect();
        names.sort();
        names.dedup();

        let rows: Vec<(i16, String)> = sqlx::query_as(
            "SELECT id, texture_name FROM textures WHERE texture_name = ANY($1)",
        )
        .bind(&names)
        .fetch_all(&mut *tx)
        .await
        .map_err(StoreError::Database)?;

        let by_name: HashMap<String, i16> =
            rows.into_iter().map(|(id, name)| (name, id)).collect();

        let mut texture_ids = Vec::with_capacity(records.len());
        for record in records {
            match by_name.get(&record.texture) {
                Some(&id) => texture_ids.push(id),
                // Dropping the open transaction rolls it back.
                None => return Err(StoreError::TextureNotFound(record.texture.clone())),
            }
        }

        let mut px = Vec::with_capacity(records.len());
        let mut py = Vec::with_capacity(records.len());
        let mut pz = Vec::with_capacity(records.len());
        let mut vx = Vec::with_capacity(records.len());
        let mut vy = Vec::with_capacity(records.len());
        let mut vz = Vec::with_capacity(records.len());
        let mut sizes = Vec::with_capacity(records.len());
        for record in records {
            px.push(record.position[0]);
            py.push(record.position[1]);
            pz.push(record.position[2]);
            vx.push(record.velocity[0]);
            vy.push(record.velocity[1]);
            vz.push(record.velocity[2]);
            sizes.push(record.size);
        }

        let result = sqlx::query(
            "INSERT INTO particles \
                 (job_id, frame_id, position_x, position_y, position_z, \
                  velocity_x, velocity_y, velocity_z, size, texture_id) \
             SELECT $1::BIGINT, $2::INTEGER, \
                 UNNEST($3::DOUBLE PRECISION[]), UNNEST($4::DOUBLE PRECISION[]), \
                 UNNEST($5::DOUBLE PRECISION[]), UNNEST($6::DOUBLE PRECISION[]), \
                 UNNEST($7::DOUBLE PRECISION[]), UNNEST($8::DOUBLE PRECISION[]), \
                 UNNEST($9::DOUBLE PRECISION[]), UNNEST($10::SMALLINT[])",
        )
        .bind(job_id)
        .bind(frame_id)
        .bind(&px)
        .bind(&py)
        .bind(&pz)
        .bind(&vx)
        .bind(&vy)
        .bind(&vz)
        .bind(&sizes)
        .bind(&texture_ids)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::Database)?;

        tx.commit().await.map_err(StoreError::Database)?;

        tracing::debug!(
            job_id,
            frame_id,
            particles = records.len(),
            "particle batch committed"
        );
        Ok(result.rows_affected())
    }

    /// One per-texture partition of a frame's particles.
    ///
    /// The worker iterates over all known textures to retrieve the full
    /// frame, grouped by material. An empty partition is valid.
    pub async fn for_frame_by_texture(
        pool: &PgPool,
        job_id: DbId,
        frame_id: i32,
        texture_id: i16,
    ) -> Result<Vec<Particle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM particles \
             WHERE job_id = $1 AND frame_id = $2 AND texture_id = $3 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Particle>(&query)
            .bind(job_id)
            .bind(frame_id)
            .bind(texture_id)
            .fetch_all(pool)
            .await
    }

    /// Count all particles stored for a frame.
    pub async fn count_for_frame(
        pool: &PgPool,
        job_id: DbId,
        frame_id: i32,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM particles WHERE job_id = $1 AND frame_id = $2")
                .bind(job_id)
                .bind(frame_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
