//! Integration tests for job creation, validation, status roll-up, and the
//! end-to-end coordination scenario.

use std::time::Duration;

use assert_matches::assert_matches;
use sqlx::PgPool;
use spindrift_core::error::CoreError;
use spindrift_core::render_config::RenderConfig;
use spindrift_db::models::job::CreateRenderJob;
use spindrift_db::models::node::RegisterNode;
use spindrift_db::models::particle::ParticleRecord;
use spindrift_db::models::status::{FrameStatus, JobStatus, NodeRole, NodeStatus};
use spindrift_db::repositories::{FrameRepo, JobRepo, NodeRepo, ParticleRepo, TextureRepo};
use spindrift_db::StoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const LEASE: Duration = Duration::from_secs(600);

fn job_input(name: &str, total_frames: i32) -> CreateRenderJob {
    CreateRenderJob {
        job_name: name.to_string(),
        total_frames,
        config: RenderConfig {
            width: 640,
            height: 480,
            fps: 30,
            quality: 9,
            antialias: false,
            antialias_depth: 3,
            antialias_threshold: 0.3,
            sampling_method: 1,
        },
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_job_persists_configuration(pool: PgPool) {
    let job = JobRepo::create(&pool, &job_input("persists-config", 3))
        .await
        .unwrap();
    assert_eq!(job.status_id, JobStatus::Pending.id());
    assert_eq!(job.total_frames, 3);
    assert_eq!(job.width, 640);
    assert_eq!(job.quality, 9);
    assert!(!job.antialias);

    let found = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(found.job_name, "persists-config");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_job_rejects_zero_frames(pool: PgPool) {
    let err = JobRepo::create(&pool, &job_input("bad-frames", 0))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Validation(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_job_rejects_bad_dimensions(pool: PgPool) {
    let mut input = job_input("bad-dims", 3);
    input.config.width = 0;
    let err = JobRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, StoreError::Validation(CoreError::Validation(_)));

    // Nothing was persisted for the rejected job.
    let none = JobRepo::next_unfinished(&pool).await.unwrap();
    assert!(none.is_none());
}

// ---------------------------------------------------------------------------
// Status roll-up
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_job_status_rolls_forward_as_frames_finish(pool: PgPool) {
    let job = JobRepo::create(&pool, &job_input("rollup", 2)).await.unwrap();
    FrameRepo::create_for_job(&pool, job.id, 2).await.unwrap();

    // All frames pending: recompute leaves the job pending.
    JobRepo::recompute_status(&pool, job.id).await.unwrap();
    let j = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(j.status_id, JobStatus::Pending.id());

    // One frame claimed: job is in progress.
    let node = NodeRepo::register(
        &pool,
        &RegisterNode {
            node_name: "node-a".to_string(),
            ip_address: "10.0.0.1".to_string(),
            cpu_cores: 8,
            memory_gb: 32.0,
        },
        NodeStatus::Active,
        NodeRole::Render,
    )
    .await
    .unwrap();
    let frame = FrameRepo::claim_next(&pool, job.id, node.id, LEASE)
        .await
        .unwrap()
        .unwrap();
    JobRepo::recompute_status(&pool, job.id).await.unwrap();
    let j = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(j.status_id, JobStatus::InProgress.id());

    // First frame rendered, second errored: all terminal => completed.
    FrameRepo::update_status(&pool, job.id, frame.frame_id, FrameStatus::Rendered)
        .await
        .unwrap();
    let second = FrameRepo::claim_next(&pool, job.id, node.id, LEASE)
        .await
        .unwrap()
        .unwrap();
    FrameRepo::update_status(&pool, job.id, second.frame_id, FrameStatus::Error)
        .await
        .unwrap();
    JobRepo::recompute_status(&pool, job.id).await.unwrap();
    let j = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(j.status_id, JobStatus::Completed.id());

    // Completed is stable under further recomputes.
    JobRepo::recompute_status(&pool, job.id).await.unwrap();
    let j = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(j.status_id, JobStatus::Completed.id());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_job_without_frames_never_completes(pool: PgPool) {
    let job = JobRepo::create(&pool, &job_input("frameless", 3)).await.unwrap();
    JobRepo::recompute_status(&pool, job.id).await.unwrap();
    let j = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(j.status_id, JobStatus::Pending.id());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_next_unfinished_and_completed_selection(pool: PgPool) {
    let done = JobRepo::create(&pool, &job_input("done", 1)).await.unwrap();
    FrameRepo::create_for_job(&pool, done.id, 1).await.unwrap();
    FrameRepo::update_status(&pool, done.id, 1, FrameStatus::Rendered)
        .await
        .unwrap();
    JobRepo::recompute_status(&pool, done.id).await.unwrap();

    let open = JobRepo::create(&pool, &job_input("open", 1)).await.unwrap();
    FrameRepo::create_for_job(&pool, open.id, 1).await.unwrap();

    let unfinished = JobRepo::next_unfinished(&pool).await.unwrap().unwrap();
    assert_eq!(unfinished.id, open.id);

    let completed = JobRepo::next_completed(&pool).await.unwrap().unwrap();
    assert_eq!(completed.id, done.id);
}

// ---------------------------------------------------------------------------
// Node registry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_node_registration_upserts_by_name(pool: PgPool) {
    let input = RegisterNode {
        node_name: "render-01".to_string(),
        ip_address: "10.0.0.5".to_string(),
        cpu_cores: 8,
        memory_gb: 32.0,
    };
    let first = NodeRepo::register(&pool, &input, NodeStatus::Active, NodeRole::Render)
        .await
        .unwrap();

    // Same hostname, upgraded hardware: the row is refreshed, not duplicated.
    let upgraded = RegisterNode {
        cpu_cores: 16,
        memory_gb: 64.0,
        ..input
    };
    let second = NodeRepo::register(&pool, &upgraded, NodeStatus::Active, NodeRole::Render)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.cpu_cores, 16);

    let active = NodeRepo::active_render_nodes(&pool).await.unwrap();
    assert_eq!(active.len(), 1);

    NodeRepo::set_status(&pool, first.id, NodeStatus::Offline)
        .await
        .unwrap();
    let active = NodeRepo::active_render_nodes(&pool).await.unwrap();
    assert!(active.is_empty());
}

// ---------------------------------------------------------------------------
// End-to-end coordination scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_end_to_end_scenario(pool: PgPool) {
    // Submit: 3 frames at 640x480 Q9, no antialias.
    let job = JobRepo::create(&pool, &job_input("e2e", 3)).await.unwrap();
    FrameRepo::create_for_job(&pool, job.id, 3).await.unwrap();

    // Two particles for frame 1, both WaterTexture.
    let records = vec![
        ParticleRecord {
            position: [0.0, 1.0, 0.0],
            velocity: [0.1, 5.0, 0.0],
            size: 0.02,
            texture: "WaterTexture".to_string(),
        },
        ParticleRecord {
            position: [0.2, 1.1, -0.1],
            velocity: [-0.1, 4.5, 0.2],
            size: 0.03,
            texture: "WaterTexture".to_string(),
        },
    ];
    ParticleRepo::insert_batch(&pool, job.id, 1, &records)
        .await
        .unwrap();

    // Two workers pull concurrently: one gets frame 1, the other frame 2.
    let node_a = NodeRepo::register(
        &pool,
        &RegisterNode {
            node_name: "render-a".to_string(),
            ip_address: "10.0.0.1".to_string(),
            cpu_cores: 4,
            memory_gb: 16.0,
        },
        NodeStatus::Active,
        NodeRole::Render,
    )
    .await
    .unwrap();
    let node_b = NodeRepo::register(
        &pool,
        &RegisterNode {
            node_name: "render-b".to_string(),
            ip_address: "10.0.0.2".to_string(),
            cpu_cores: 4,
            memory_gb: 16.0,
        },
        NodeStatus::Active,
        NodeRole::Render,
    )
    .await
    .unwrap();

    let (claim_a, claim_b) = tokio::join!(
        FrameRepo::claim_next(&pool, job.id, node_a.id, LEASE),
        FrameRepo::claim_next(&pool, job.id, node_b.id, LEASE),
    );
    let frame_a = claim_a.unwrap().unwrap();
    let frame_b = claim_b.unwrap().unwrap();

    let mut claimed = vec![frame_a.frame_id, frame_b.frame_id];
    claimed.sort_unstable();
    assert_eq!(claimed, vec![1, 2], "no double-claim of frame 1");

    // The worker holding frame 1 fetches its particles grouped by texture.
    let textures = TextureRepo::list(&pool).await.unwrap();
    let water = textures
        .iter()
        .find(|t| t.texture_name == "WaterTexture")
        .unwrap();
    let partition = ParticleRepo::for_frame_by_texture(&pool, job.id, 1, water.id)
        .await
        .unwrap();
    assert_eq!(partition.len(), 2);

    // Simulated render success on frame 1.
    FrameRepo::update_status(&pool, job.id, 1, FrameStatus::Rendering)
        .await
        .unwrap();
    FrameRepo::update_status(&pool, job.id, 1, FrameStatus::Rendered)
        .await
        .unwrap();
    let row = FrameRepo::find(&pool, job.id, 1).await.unwrap().unwrap();
    assert_eq!(row.status_id, FrameStatus::Rendered.id());

    JobRepo::recompute_status(&pool, job.id).await.unwrap();
    let j = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(j.status_id, JobStatus::InProgress.id());
}
