//! Claim-lease constants, poll backoff, and the frame state machine.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and the worker daemon.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Lease / heartbeat constants
// ---------------------------------------------------------------------------

/// How long a claim stays valid without a heartbeat before any worker's
/// claim attempt may force the frame back into rotation.
pub const CLAIM_LEASE_SECS: u64 = 600;

/// How often a worker bumps the heartbeat on the frame it is rendering.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Hard ceiling on a single renderer invocation before the child process
/// is killed and the frame reported as errored.
pub const RENDER_TIMEOUT_SECS: u64 = 1800;

// ---------------------------------------------------------------------------
// Poll backoff
// ---------------------------------------------------------------------------

/// Delay before the first retry when a claim attempt returns no frame.
pub const POLL_BASE_DELAY_SECS: u64 = 2;

/// Ceiling for the poll backoff so an idle worker still notices new work
/// within a minute.
pub const POLL_MAX_DELAY_SECS: u64 = 60;

/// Compute the idle-poll delay after `empty_polls` consecutive claim
/// attempts that found nothing.
///
/// Doubles from `POLL_BASE_DELAY_SECS` up to `POLL_MAX_DELAY_SECS`. The
/// caller resets its counter to zero whenever a claim succeeds.
pub fn poll_backoff(empty_polls: u32) -> Duration {
    let shift = empty_polls.min(32);
    let delay = POLL_BASE_DELAY_SECS
        .saturating_mul(1u64 << shift.min(63))
        .min(POLL_MAX_DELAY_SECS);
    Duration::from_secs(delay)
}

// ---------------------------------------------------------------------------
// Frame state machine
// ---------------------------------------------------------------------------

/// Frame status IDs matching `frame_statuses` seed data (1-based SMALLSERIAL).
pub mod frame_state {
    /// Returns the set of valid target status IDs reachable from `from_status`.
    ///
    /// Terminal states (Rendered=4, Error=5) return an empty slice; a frame
    /// never leaves a terminal state automatically. Stale-claim recovery
    /// (Claimed/Rendering back to Pending) is the one backward edge, and it
    /// is only taken by the claim query when the lease has expired.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Pending -> Claimed
            1 => &[2],
            // Claimed -> Rendering, Error, Pending (lease expiry)
            2 => &[3, 5, 1],
            // Rendering -> Rendered, Error, Pending (lease expiry)
            3 => &[4, 5, 1],
            // Terminal states: Rendered, Error
            4 | 5 => &[],
            // Unknown status: no transitions allowed
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Whether a status ID is terminal (no further transitions).
    pub fn is_terminal(status: i16) -> bool {
        valid_transitions(status).is_empty() && matches!(status, 4 | 5)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
