//! Worker configuration, collected from the environment at startup.
//!
//! Connection parameters and paths are never hard-coded in the
//! coordination logic; everything tunable arrives through `SPINDRIFT_*`
//! variables with defaults from `core::scheduling`.

use std::path::PathBuf;
use std::time::Duration;

use spindrift_core::scheduling::{CLAIM_LEASE_SECS, RENDER_TIMEOUT_SECS};
use spindrift_core::types::DbId;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Everything a worker needs besides the database pool.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Render only this job when set; otherwise the worker picks the
    /// lowest-ID unfinished job.
    pub job_id: Option<DbId>,
    /// Static scene template carrying the particle-system marker.
    pub template: PathBuf,
    /// Root of the per-job output directories.
    pub output_root: PathBuf,
    /// Explicit renderer binary; `$PATH` is searched when unset.
    pub renderer_binary: Option<PathBuf>,
    /// Claim lease duration for stale-claim recovery.
    pub claim_lease: Duration,
    /// Kill a renderer invocation that outlives this.
    pub render_timeout: Duration,
    /// Registry name override; defaults to the machine hostname.
    pub node_name: Option<String>,
}

impl WorkerConfig {
    /// Load the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            job_id: parse_opt("SPINDRIFT_JOB_ID")?,
            template: PathBuf::from(
                std::env::var("SPINDRIFT_TEMPLATE").unwrap_or_else(|_| "NewBeginning.pov".into()),
            ),
            output_root: PathBuf::from(
                std::env::var("SPINDRIFT_OUTPUT_ROOT").unwrap_or_else(|_| "output".into()),
            ),
            renderer_binary: std::env::var("SPINDRIFT_POVRAY_BIN").ok().map(PathBuf::from),
            claim_lease: Duration::from_secs(
                parse_opt("SPINDRIFT_CLAIM_LEASE_SECS")?.unwrap_or(CLAIM_LEASE_SECS),
            ),
            render_timeout: Duration::from_secs(
                parse_opt("SPINDRIFT_RENDER_TIMEOUT_SECS")?.unwrap_or(RENDER_TIMEOUT_SECS),
            ),
            node_name: std::env::var("SPINDRIFT_NODE_NAME").ok(),
        })
    }
}

/// Parse an optional environment variable, erroring only on unparsable
/// values, never on absence.
fn parse_opt<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}
