//! Error types for the loop planner.
//!
//! `PlanError` is the `Err` side of every fallible core operation, from
//! `plan_loop` down to the individual component builders. Sub-components
//! that talk to a collaborator (the network loader) define their own
//! narrower error and convert it in at the orchestrator boundary, the same
//! split `dt-core::DtError` uses for framework vs. sub-crate errors.

use thiserror::Error;

/// Top-level error returned by [`crate::plan_loop`] and the component
/// builders it sequences.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Target distance non-positive, tolerance out of `[0, 1)`, a
    /// coordinate out of range, or a negative wind speed. Raised before any
    /// work is done.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The network loader reported a transient failure. Not recovered
    /// inside the core; callers decide whether to retry.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The network loader returned a graph with no junctions in range.
    #[error("network empty: {0}")]
    NetworkEmpty(String),

    /// No junction is reachable within `approach_max_m` of the supplied
    /// coordinate.
    #[error("start unreachable: {0}")]
    StartUnreachable(String),

    /// The enumerator finished (or timed out) with zero accepted
    /// candidates.
    #[error("no loop found: {0}")]
    NoLoopFound(String),

    /// An invariant was violated (e.g. a junction-edge bearing outside
    /// `[0, 360)`). Should never fire in production.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Error surface of a [`crate::loader::NetworkLoader`].
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Transient failure; the caller's retry policy applies.
    #[error("network unavailable: {0}")]
    Unavailable(String),
    /// Fatal for the request: nothing exists in the queried region.
    #[error("network empty: {0}")]
    Empty(String),
}

impl From<LoaderError> for PlanError {
    fn from(e: LoaderError) -> Self {
        match e {
            LoaderError::Unavailable(ctx) => PlanError::NetworkUnavailable(ctx),
            LoaderError::Empty(ctx) => PlanError::NetworkEmpty(ctx),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
