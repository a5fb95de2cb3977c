//! Submitter-side orchestration for the Spindrift render farm.
//!
//! Turns a particle generator's manifest into a registered job with frames
//! and per-frame particle batches, and assembles completed jobs into
//! videos.

pub mod assemble;
pub mod manifest;
pub mod submit;
