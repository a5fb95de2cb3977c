use std::path::PathBuf;

use anyhow::Context;
use spindrift_pipeline::assemble::assemble_next;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spindrift_pipeline=info,spindrift_assemble=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let output_root = PathBuf::from(
        std::env::var("SPINDRIFT_OUTPUT_ROOT").unwrap_or_else(|_| "output".into()),
    );
    let template = PathBuf::from(
        std::env::var("SPINDRIFT_TEMPLATE").unwrap_or_else(|_| "NewBeginning.pov".into()),
    );

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = spindrift_db::create_pool(&database_url).await?;
    spindrift_db::health_check(&pool).await?;

    match assemble_next(&pool, &output_root, &template).await? {
        Some(video) => tracing::info!(output = %video.display(), "video assembled"),
        None => tracing::info!("no completed job to assemble"),
    }

    pool.close().await;
    Ok(())
}
