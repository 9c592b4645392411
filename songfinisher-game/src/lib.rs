//! Song Finisher Game Engine
//!
//! Platform-agnostic core logic for the Song Finisher board game: a square
//! grid split into four elemental zones, timed songwriting challenges issued
//! on zone entry, and character abilities that shape the rewards.
//! This crate provides all game mechanics without UI or platform-specific dependencies.

pub mod cards;
pub mod catalog;
pub mod challenges;
pub mod characters;
pub mod constants;
pub mod dice;
pub mod error;
pub mod session;
pub mod timer;
pub mod zone;

// Re-export commonly used types
pub use cards::{HeldCards, draw_card};
pub use catalog::{
    BoardConfig, Card, Catalog, Challenge, CharacterInfo, Mode, Rarity, RewardKind, Track,
    ZoneChallenges,
};
pub use challenges::ChallengePool;
pub use characters::{Ability, AbilityContext, CharacterId};
pub use dice::roll_die;
pub use error::{CatalogError, GameError, InvariantViolation};
pub use session::{
    ActiveChallenge, ChallengeOutcome, ChallengeRecord, ChallengeResolution, GameSession,
    MoveOutcome, RewardOutcome, SessionSnapshot, TickOutcome,
};
pub use timer::{ChallengeTimer, TimerState};
pub use zone::{Direction, GridBounds, Position, Zone, ZoneRect, ZoneTable, resolve_zone};
