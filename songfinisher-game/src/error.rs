//! Error types for the Song Finisher engine.
//!
//! Every `GameError` is recoverable: session operations catch them at the
//! operation boundary, record them, and leave state untouched. `CatalogError`
//! only surfaces while loading static data.

use thiserror::Error;

use crate::timer::TimerState;
use crate::zone::Zone;

/// Errors raised by zone, challenge and timer operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("zone `{zone}` has no challenge catalog")]
    InvalidZone { zone: Zone },
    #[error("{field} must be positive (got {value})")]
    InvalidArgument { field: &'static str, value: i64 },
    #[error("cannot {action} a timer that is {state}")]
    InvalidStateTransition {
        action: &'static str,
        state: TimerState,
    },
    #[error("unknown {kind} id `{id}`")]
    UnknownId { kind: &'static str, id: String },
    #[error("cannot enter `{zone}` while standing in `{actual}`")]
    ZoneMismatch { zone: Zone, actual: Zone },
}

/// Errors raised when catalog data is malformed or violates a static invariant.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zone rectangles `{first}` and `{second}` overlap")]
    OverlappingZones { first: Zone, second: Zone },
    #[error("zone `{zone}` has an inverted rectangle")]
    InvalidRect { zone: Zone },
    #[error("grid bounds invalid (min {min} > max {max})")]
    InvalidBounds { min: i32, max: i32 },
    #[error("start position ({x}, {y}) lies outside the grid")]
    StartOutOfBounds { x: i32, y: i32 },
    #[error("start position must be neutral but lies in `{zone}`")]
    StartInZone { zone: Zone },
    #[error("zone `{zone}` has no challenges")]
    MissingChallenges { zone: Zone },
    #[error("challenge `{id}` must have a positive time limit")]
    InvalidTimeLimit { id: String },
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("card deck is empty")]
    EmptyDeck,
    #[error("no character entry for `{id}`")]
    MissingCharacter { id: String },
}

/// A broken session invariant, reported by `GameSession::check_invariants`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("session invariant violated: {0}")]
pub struct InvariantViolation(pub String);
