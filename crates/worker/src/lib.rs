//! Node-side worker daemon for the Spindrift render farm.
//!
//! Each worker process owns one run loop: claim a frame, fetch its particle
//! partitions, build the scene input, invoke the renderer, report the
//! outcome, repeat. Workers never talk to each other; the store's claim
//! operation is the only synchronization point.

pub mod config;
pub mod renderer;
pub mod run;

pub use config::WorkerConfig;
pub use renderer::{FrameRenderer, PovRayRenderer};
pub use run::Worker;
