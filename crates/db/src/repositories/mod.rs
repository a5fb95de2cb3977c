//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. All operations are atomic with
//! respect to concurrent callers; the frame claim is the system's single
//! cross-worker synchronization point.

pub mod frame_repo;
pub mod job_repo;
pub mod node_repo;
pub mod particle_repo;
pub mod texture_repo;

pub use frame_repo::FrameRepo;
pub use job_repo::JobRepo;
pub use node_repo::NodeRepo;
pub use particle_repo::ParticleRepo;
pub use texture_repo::TextureRepo;
