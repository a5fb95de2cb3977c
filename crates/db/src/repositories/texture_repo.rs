//! Repository for the `textures` reference table.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::models::texture::Texture;

/// Provides reads (and out-of-band population) of the texture catalog.
pub struct TextureRepo;

impl TextureRepo {
    /// All known textures, ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Texture>, sqlx::Error> {
        sqlx::query_as::<_, Texture>("SELECT id, texture_name FROM textures ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Register a texture name. Returns the existing row unchanged if the
    /// name is already present.
    pub async fn create(pool: &PgPool, texture_name: &str) -> Result<Texture, sqlx::Error> {
        sqlx::query_as::<_, Texture>(
            "INSERT INTO textures (texture_name) VALUES ($1) \
             ON CONFLICT (texture_name) DO UPDATE SET texture_name = EXCLUDED.texture_name \
             RETURNING id, texture_name",
        )
        .bind(texture_name)
        .fetch_one(pool)
        .await
    }

    /// Resolve a set of texture names to IDs in one round-trip.
    ///
    /// Names with no row are simply absent from the map; deciding whether
    /// that is an error belongs to the caller.
    pub async fn resolve_names(
        pool: &PgPool,
        names: &[String],
    ) -> Result<HashMap<String, i16>, sqlx::Error> {
        let rows: Vec<(i16, String)> = sqlx::query_as(
            "SELECT id, texture_name FROM textures WHERE texture_name = ANY($1)",
        )
        .bind(names)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id, name)| (name, id)).collect())
    }
}
