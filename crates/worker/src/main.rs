use spindrift_core::node_info;
use spindrift_db::models::node::RegisterNode;
use spindrift_db::models::status::{NodeRole, NodeStatus};
use spindrift_db::repositories::NodeRepo;
use spindrift_worker::{PovRayRenderer, Worker, WorkerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spindrift_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env()?;
    let renderer = PovRayRenderer::new(config.renderer_binary.as_deref(), config.render_timeout)?;
    tracing::info!(binary = %renderer.binary().display(), "renderer resolved");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = spindrift_db::create_pool(&database_url).await?;
    spindrift_db::health_check(&pool).await?;
    tracing::info!("database connection pool created");

    // Register this machine with the node registry.
    let snapshot = node_info::capture();
    let node = NodeRepo::register(
        &pool,
        &RegisterNode {
            node_name: config
                .node_name
                .clone()
                .unwrap_or_else(|| snapshot.hostname.clone()),
            ip_address: snapshot.ip_address,
            cpu_cores: snapshot.cpu_cores,
            memory_gb: snapshot.memory_gb,
        },
        NodeStatus::Active,
        NodeRole::Render,
    )
    .await?;
    tracing::info!(
        node_id = node.id,
        node_name = %node.node_name,
        cpu_cores = node.cpu_cores,
        memory_gb = node.memory_gb,
        "node registered"
    );

    // Ctrl-C stops the loop between frames.
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, finishing current frame");
            signal_token.cancel();
        }
    });

    let worker = Worker::new(pool.clone(), node.id, config, renderer);
    let result = worker.run(shutdown).await;

    NodeRepo::set_status(&pool, node.id, NodeStatus::Offline).await?;
    pool.close().await;

    result?;
    Ok(())
}
