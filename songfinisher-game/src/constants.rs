//! Centralized board and tuning constants for Song Finisher game logic.
//!
//! Catalog data (challenges, cards, characters) lives in the bundled JSON
//! asset; the values here are the fixed rules every catalog shares.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_ZONE_ENTER: &str = "log.zone.enter";
pub(crate) const LOG_ZONE_LEAVE: &str = "log.zone.leave";
pub(crate) const LOG_CHALLENGE_START: &str = "log.challenge.start";
pub(crate) const LOG_CHALLENGE_ABANDONED: &str = "log.challenge.abandoned";
pub(crate) const LOG_CHALLENGE_EXPIRED: &str = "log.challenge.expired";
pub(crate) const LOG_CHALLENGE_COMPLETE: &str = "log.challenge.complete";
pub(crate) const LOG_REWARD_MOMENTUM: &str = "log.reward.momentum";
pub(crate) const LOG_REWARD_CARD: &str = "log.reward.card";
pub(crate) const LOG_REWARD_ACHIEVEMENT: &str = "log.reward.achievement";
pub(crate) const LOG_REWARD_ACHIEVEMENT_REPEAT: &str = "log.reward.achievement-repeat";
pub(crate) const LOG_ABILITY_PREFIX: &str = "ability.";
pub(crate) const LOG_DIE_ROLLED: &str = "log.die.rolled";
pub(crate) const LOG_CARD_DRAWN: &str = "log.card.drawn";
pub(crate) const LOG_ERROR: &str = "log.error";

// Board --------------------------------------------------------------------
pub const GRID_MIN: i32 = 0;
pub const GRID_MAX: i32 = 10;
pub const START_X: i32 = 5;
pub const START_Y: i32 = 5;

// Dice ---------------------------------------------------------------------
pub const DIE_FACES: u8 = 6;

// Abilities ----------------------------------------------------------------
pub(crate) const SPIRIT_CONDUCTOR_MOMENTUM: u32 = 2;
pub(crate) const TRAIN_CONDUCTOR_CHALLENGE: &str = "rhythm";
pub(crate) const TRAIN_CONDUCTOR_BONUS_SECS: u32 = 60;
pub(crate) const BALANCED_MOMENTUM: u32 = 1;
pub(crate) const BALANCED_BONUS_SECS: u32 = 30;

// Rewards ------------------------------------------------------------------
pub(crate) const MOMENTUM_REWARD: u32 = 1;
