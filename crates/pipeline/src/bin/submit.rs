use std::path::PathBuf;

use anyhow::Context;
use spindrift_pipeline::manifest::JobManifest;
use spindrift_pipeline::submit::submit_job;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spindrift_pipeline=info,spindrift_submit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let manifest_path: PathBuf = std::env::args()
        .nth(1)
        .context("usage: spindrift-submit <manifest.json>")?
        .into();

    let manifest = JobManifest::from_file(&manifest_path)
        .await
        .with_context(|| format!("reading manifest {}", manifest_path.display()))?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = spindrift_db::create_pool(&database_url).await?;
    spindrift_db::health_check(&pool).await?;
    spindrift_db::run_migrations(&pool).await?;

    let job = submit_job(&pool, &manifest).await?;
    tracing::info!(
        job_id = job.id,
        job_name = %job.job_name,
        total_frames = job.total_frames,
        "job submitted"
    );

    pool.close().await;
    Ok(())
}
