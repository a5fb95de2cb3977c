//! The worker run loop: Idle -> Claim -> FetchParticles -> BuildSceneInput
//! -> InvokeRender -> Report -> Idle.
//!
//! A single frame failure never halts the loop; store connectivity
//! problems back off and retry without touching frame state, and the
//! shutdown token stops the loop cleanly between frames.

use std::time::Duration;

use spindrift_core::output::{FramePaths, JobLayout};
use spindrift_core::povray::RenderError;
use spindrift_core::scene::{self, SceneError};
use spindrift_core::scheduling::{poll_backoff, HEARTBEAT_INTERVAL_SECS};
use spindrift_core::types::DbId;
use spindrift_db::models::frame::Frame;
use spindrift_db::models::job::Job;
use spindrift_db::models::status::FrameStatus;
use spindrift_db::repositories::{FrameRepo, JobRepo, ParticleRepo, TextureRepo};
use spindrift_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::renderer::FrameRenderer;

/// Error type for the worker loop.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The configured job ID has no row; running on is pointless.
    #[error("job {0} does not exist")]
    JobNotFound(DbId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Why one frame ended in `error` status. Logged, never propagated.
#[derive(Debug, thiserror::Error)]
enum FrameFailure {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One node's render loop over the shared store.
pub struct Worker<R: FrameRenderer> {
    pool: DbPool,
    node_id: DbId,
    config: WorkerConfig,
    renderer: R,
}

impl<R: FrameRenderer> Worker<R> {
    pub fn new(pool: DbPool, node_id: DbId, config: WorkerConfig, renderer: R) -> Self {
        Self {
            pool,
            node_id,
            config,
            renderer,
        }
    }

    /// Run until the shutdown token fires.
    ///
    /// The token is checked between iterations, so an in-flight frame is
    /// finished and reported before the loop exits. Store errors back off
    /// and retry; an interrupted frame stays claimed and comes back via
    /// lease expiry.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), WorkerError> {
        let mut empty_polls: u32 = 0;

        while !shutdown.is_cancelled() {
            match self.tick().await {
                Ok(true) => empty_polls = 0,
                Ok(false) => {
                    self.idle(poll_backoff(empty_polls), &shutdown).await;
                    empty_polls = empty_polls.saturating_add(1);
                }
                Err(WorkerError::Database(e)) => {
                    tracing::warn!(error = %e, "store unreachable, backing off");
                    self.idle(poll_backoff(empty_polls), &shutdown).await;
                    empty_polls = empty_polls.saturating_add(1);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("shutdown requested, worker loop stopping");
        Ok(())
    }

    /// One loop iteration. `Ok(true)` means a frame was processed and the
    /// next claim should happen immediately.
    async fn tick(&self) -> Result<bool, WorkerError> {
        match self.claim_one().await? {
            Some((job, frame)) => {
                self.process_frame(&job, &frame).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pick the job to work on and claim its next frame.
    async fn claim_one(&self) -> Result<Option<(Job, Frame)>, WorkerError> {
        let job = match self.config.job_id {
            Some(id) => JobRepo::find_by_id(&self.pool, id)
                .await?
                .ok_or(WorkerError::JobNotFound(id))?,
            None => match JobRepo::next_unfinished(&self.pool).await? {
                Some(job) => job,
                None => return Ok(None),
            },
        };

        let frame =
            FrameRepo::claim_next(&self.pool, job.id, self.node_id, self.config.claim_lease)
                .await?;
        Ok(frame.map(|f| (job, f)))
    }

    /// Drive one claimed frame through to a terminal status.
    async fn process_frame(&self, job: &Job, frame: &Frame) -> Result<(), WorkerError> {
        tracing::info!(job_id = job.id, frame_id = frame.frame_id, "claimed frame");

        // Input building starts now; the lease bookkeeping can distinguish
        // "claimed but not started" from "actively rendering".
        FrameRepo::update_status(&self.pool, job.id, frame.frame_id, FrameStatus::Rendering)
            .await?;

        let particle_objects = self.fetch_particle_objects(job, frame).await?;

        let heartbeat = self.spawn_heartbeat(job.id, frame.frame_id);
        let outcome = self.build_and_render(job, frame, &particle_objects).await;
        heartbeat.cancel();

        let status = match &outcome {
            Ok(()) => FrameStatus::Rendered,
            Err(failure) => {
                tracing::warn!(
                    job_id = job.id,
                    frame_id = frame.frame_id,
                    error = %failure,
                    "frame failed"
                );
                FrameStatus::Error
            }
        };
        FrameRepo::update_status(&self.pool, job.id, frame.frame_id, status).await?;
        JobRepo::recompute_status(&self.pool, job.id).await?;

        tracing::info!(
            job_id = job.id,
            frame_id = frame.frame_id,
            status = ?status,
            "frame reported"
        );
        Ok(())
    }

    /// Fetch every per-texture particle partition for the frame and format
    /// it as renderer objects.
    ///
    /// An empty frame is valid; it renders only the template's static
    /// content. Store errors here propagate to the retry path and never
    /// mark the frame as failed.
    async fn fetch_particle_objects(&self, job: &Job, frame: &Frame) -> Result<String, WorkerError> {
        let textures = TextureRepo::list(&self.pool).await?;

        let mut particle_objects = String::new();
        let mut total = 0usize;
        for texture in &textures {
            let partition = ParticleRepo::for_frame_by_texture(
                &self.pool,
                job.id,
                frame.frame_id,
                texture.id,
            )
            .await?;
            total += partition.len();
            let points: Vec<_> = partition.iter().map(|p| p.point()).collect();
            particle_objects.push_str(&scene::format_particle_objects(&points));
        }

        tracing::debug!(
            job_id = job.id,
            frame_id = frame.frame_id,
            particles = total,
            "fetched particle partitions"
        );
        Ok(particle_objects)
    }

    /// Build the scene input and invoke the renderer. Everything in here
    /// is local to the frame.
    async fn build_and_render(
        &self,
        job: &Job,
        frame: &Frame,
        particle_objects: &str,
    ) -> Result<(), FrameFailure> {
        let layout = JobLayout::new(&self.config.output_root, &job.job_name, &self.config.template);
        let FramePaths {
            scene_file,
            image_file,
        } = layout.frame_paths(frame.frame_id);

        layout.ensure_job_dir().await.map_err(SceneError::Io)?;
        // The scene file is synced to disk before the renderer sees it.
        scene::build_scene_file(&self.config.template, &scene_file, particle_objects).await?;

        let config = job.render_config();
        self.renderer
            .render(&config, &scene_file, &image_file)
            .await?;
        Ok(())
    }

    /// Keep the claim's lease alive while the renderer runs.
    fn spawn_heartbeat(&self, job_id: DbId, frame_id: i32) -> CancellationToken {
        let token = CancellationToken::new();
        let child = token.clone();
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let interval = Duration::from_secs(HEARTBEAT_INTERVAL_SECS);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        if let Err(e) = FrameRepo::heartbeat(&pool, job_id, frame_id).await {
                            tracing::warn!(job_id, frame_id, error = %e, "heartbeat failed");
                        }
                    }
                }
            }
        });
        token
    }

    /// Sleep for `delay`, waking early on shutdown.
    async fn idle(&self, delay: Duration, shutdown: &CancellationToken) {
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
