//! The game session: one player's board position, progress and active challenge.
//!
//! Every public operation runs to completion and is total. Recoverable
//! [`GameError`]s are caught here, logged, stored in [`GameSession::last_error`]
//! and leave the session exactly as it was.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cards::{HeldCards, draw_card};
use crate::catalog::{Card, Catalog, Challenge, RewardKind};
use crate::challenges::ChallengePool;
use crate::characters::{AbilityContext, CharacterId};
use crate::constants::{
    LOG_ABILITY_PREFIX, LOG_CARD_DRAWN, LOG_CHALLENGE_ABANDONED, LOG_CHALLENGE_COMPLETE,
    LOG_CHALLENGE_EXPIRED, LOG_CHALLENGE_START, LOG_DIE_ROLLED, LOG_ERROR, LOG_REWARD_ACHIEVEMENT,
    LOG_REWARD_ACHIEVEMENT_REPEAT, LOG_REWARD_CARD, LOG_REWARD_MOMENTUM, LOG_ZONE_ENTER,
    LOG_ZONE_LEAVE, MOMENTUM_REWARD,
};
use crate::dice::roll_die;
use crate::error::{GameError, InvariantViolation};
use crate::timer::{ChallengeTimer, TimerState};
use crate::zone::{Direction, Position, Zone, resolve_zone};

/// The challenge currently in play and the zone that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChallenge {
    pub zone: Zone,
    pub challenge: Challenge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeOutcome {
    Completed,
    Expired,
    /// Replaced by a new challenge before it was resolved.
    Abandoned,
}

/// How a challenge left the active slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub challenge_id: String,
    pub zone: Zone,
    pub outcome: ChallengeOutcome,
    pub seconds_left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    pub zone: Zone,
    pub zone_changed: bool,
    /// Challenge started by entering a new zone.
    pub challenge: Option<Challenge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// No challenge is counting down.
    Idle,
    Running { remaining: u32 },
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardOutcome {
    Momentum { total: u32 },
    Card(Card),
    /// The deck was empty so no card could be drawn.
    NoCard,
    Achievement { id: String, newly_unlocked: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResolution {
    pub challenge: Challenge,
    pub reward: RewardOutcome,
    pub ability_fired: bool,
    pub seconds_left: u32,
}

/// Serializable view of everything the presentation layer displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub character: CharacterId,
    pub track: String,
    pub mode: String,
    pub position: Position,
    pub zone: Zone,
    pub momentum: u32,
    pub cards: Vec<Card>,
    pub achievements: Vec<String>,
    pub challenge: Option<Challenge>,
    pub time_remaining: u32,
    pub timer: TimerState,
    pub last_roll: Option<u8>,
    pub last_card: Option<Card>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: Arc<Catalog>,
    rng: SmallRng,
    character: CharacterId,
    track: String,
    mode: String,
    position: Position,
    zone: Zone,
    momentum: u32,
    cards: HeldCards,
    achievements: Vec<String>,
    active: Option<ActiveChallenge>,
    timer: ChallengeTimer,
    last_roll: Option<u8>,
    last_card: Option<Card>,
    history: Vec<ChallengeRecord>,
    logs: Vec<String>,
    last_error: Option<GameError>,
}

impl GameSession {
    /// Start a session with an entropy-seeded random source.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_rng(catalog, SmallRng::from_entropy())
    }

    /// Start a session whose rolls, draws and picks are reproducible.
    #[must_use]
    pub fn with_seed(catalog: Arc<Catalog>, seed: u64) -> Self {
        Self::with_rng(catalog, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Arc<Catalog>, rng: SmallRng) -> Self {
        let track = catalog
            .tracks
            .first()
            .map_or_else(String::new, |t| t.id.clone());
        let mode = catalog
            .modes
            .first()
            .map_or_else(String::new, |m| m.id.clone());
        let position = catalog.board.start;
        let zone = resolve_zone(position, &catalog.board.zones);
        Self {
            catalog,
            rng,
            character: CharacterId::default(),
            track,
            mode,
            position,
            zone,
            momentum: 0,
            cards: HeldCards::new(),
            achievements: Vec::new(),
            active: None,
            timer: ChallengeTimer::new(),
            last_roll: None,
            last_card: None,
            history: Vec::new(),
            logs: Vec::new(),
            last_error: None,
        }
    }

    /// Return to the starting state, keeping the catalog and player selections.
    pub fn restart(&mut self) {
        let position = self.catalog.board.start;
        self.position = position;
        self.zone = resolve_zone(position, &self.catalog.board.zones);
        self.momentum = 0;
        self.cards.clear();
        self.achievements.clear();
        self.active = None;
        self.timer.reset();
        self.last_roll = None;
        self.last_card = None;
        self.history.clear();
        self.logs.clear();
        self.last_error = None;
        log::debug!("session restarted at {position}");
    }

    // Movement ---------------------------------------------------------------

    /// Move by a relative offset, clamped to the board.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        let target = self.position.offset(dx, dy);
        self.relocate(target)
    }

    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        let (dx, dy) = direction.delta();
        self.move_by(dx, dy)
    }

    /// Jump straight to a cell, clamped to the board.
    pub fn move_to(&mut self, target: Position) -> MoveOutcome {
        self.relocate(target)
    }

    fn relocate(&mut self, target: Position) -> MoveOutcome {
        let from = self.position;
        let to = self.catalog.board.bounds.clamp(target);
        self.position = to;

        let new_zone = resolve_zone(to, &self.catalog.board.zones);
        let zone_changed = new_zone != self.zone;
        let mut challenge = None;
        if zone_changed {
            if new_zone.is_elemental() {
                challenge = self.enter_zone(new_zone);
            } else {
                log::debug!("left {} for neutral ground", self.zone);
                self.push_log(LOG_ZONE_LEAVE);
            }
            // The cache always follows the position, even if entry failed.
            self.zone = new_zone;
        }

        MoveOutcome {
            from,
            to,
            zone: new_zone,
            zone_changed,
            challenge,
        }
    }

    /// Start a challenge for `zone` if it differs from the cached zone.
    ///
    /// Any unresolved challenge is recorded as abandoned and replaced.
    /// Returns the new challenge, or `None` when nothing happened.
    pub fn enter_zone(&mut self, zone: Zone) -> Option<Challenge> {
        if zone == self.zone {
            return None;
        }
        let result = self.try_enter_zone(zone);
        self.recover(result)
    }

    fn try_enter_zone(&mut self, zone: Zone) -> Result<Challenge, GameError> {
        let actual = resolve_zone(self.position, &self.catalog.board.zones);
        if actual != zone {
            return Err(GameError::ZoneMismatch { zone, actual });
        }

        let pool = ChallengePool::new(&self.catalog);
        let challenge = pool.pick_challenge(zone, &mut self.rng)?.clone();
        let mut timer = ChallengeTimer::new();
        timer.start(challenge.time_limit)?;

        if let Some(previous) = self.active.take() {
            log::debug!(
                "abandoning `{}` with {}s left",
                previous.challenge.id,
                self.timer.time_remaining()
            );
            self.history.push(ChallengeRecord {
                challenge_id: previous.challenge.id,
                zone: previous.zone,
                outcome: ChallengeOutcome::Abandoned,
                seconds_left: self.timer.time_remaining(),
            });
            self.push_log(LOG_CHALLENGE_ABANDONED);
        }

        log::debug!(
            "entered {zone}: `{}` ({}s)",
            challenge.id,
            challenge.time_limit
        );
        self.zone = zone;
        self.timer = timer;
        self.active = Some(ActiveChallenge {
            zone,
            challenge: challenge.clone(),
        });
        self.push_log(LOG_ZONE_ENTER);
        self.push_log(LOG_CHALLENGE_START);
        Ok(challenge)
    }

    // Clock ------------------------------------------------------------------

    /// Advance the active challenge's countdown by one second.
    ///
    /// When it runs out the challenge is forfeited: it leaves the active slot
    /// unrewarded and can no longer be completed.
    pub fn tick(&mut self) -> TickOutcome {
        if self.active.is_none() {
            return TickOutcome::Idle;
        }
        match self.timer.tick() {
            TimerState::Running => TickOutcome::Running {
                remaining: self.timer.time_remaining(),
            },
            TimerState::Expired => {
                if let Some(expired) = self.active.take() {
                    log::debug!("challenge `{}` expired", expired.challenge.id);
                    self.history.push(ChallengeRecord {
                        challenge_id: expired.challenge.id,
                        zone: expired.zone,
                        outcome: ChallengeOutcome::Expired,
                        seconds_left: 0,
                    });
                }
                self.push_log(LOG_CHALLENGE_EXPIRED);
                TickOutcome::Expired
            }
            TimerState::Idle | TimerState::Completed => TickOutcome::Idle,
        }
    }

    // Dice and cards ---------------------------------------------------------

    /// Roll the die. The roll is only recorded; it does not move momentum.
    pub fn roll_die(&mut self) -> u8 {
        let roll = roll_die(&mut self.rng);
        self.last_roll = Some(roll);
        self.push_log(LOG_DIE_ROLLED);
        roll
    }

    /// Draw a card for display. Only challenge rewards add cards to the hand.
    pub fn draw_card(&mut self) -> Option<Card> {
        let card = draw_card(&self.catalog.cards, &mut self.rng).cloned();
        if let Some(card) = &card {
            log::debug!("drew `{}` ({:?})", card.id, card.rarity);
            self.last_card = Some(card.clone());
            self.push_log(LOG_CARD_DRAWN);
        }
        card
    }

    // Challenge resolution ---------------------------------------------------

    /// Resolve the active challenge: run the character ability, pay the reward,
    /// then clear the challenge and return the timer to idle.
    ///
    /// Does nothing when no challenge is active.
    pub fn complete_challenge(&mut self) -> Option<ChallengeResolution> {
        let active = self.active.clone()?;
        if !self.timer.is_running() {
            // Unreachable while the active/running pairing holds.
            self.recover::<()>(Err(GameError::InvalidStateTransition {
                action: "complete",
                state: self.timer.state(),
            }));
            return None;
        }
        let challenge = active.challenge;

        let mut in_flight = if challenge.reward == RewardKind::Card {
            draw_card(&self.catalog.cards, &mut self.rng).cloned()
        } else {
            None
        };

        let ability = self.character.ability();
        let ability_fired = {
            let mut ctx = AbilityContext {
                zone: self.zone,
                challenge: &challenge,
                momentum: &mut self.momentum,
                timer: &mut self.timer,
                card: in_flight.as_mut(),
            };
            ability.apply(&mut ctx)
        };
        if ability_fired {
            self.push_log(&format!("{LOG_ABILITY_PREFIX}{}", ability.key()));
        }

        // Checked above; abilities only extend a running timer.
        let seconds_left = self.timer.complete().unwrap_or_default();

        let reward = match challenge.reward {
            RewardKind::Momentum => {
                self.momentum = self.momentum.saturating_add(MOMENTUM_REWARD);
                self.push_log(LOG_REWARD_MOMENTUM);
                RewardOutcome::Momentum {
                    total: self.momentum,
                }
            }
            RewardKind::Card => match in_flight {
                Some(card) => {
                    self.cards.insert(card.clone());
                    self.last_card = Some(card.clone());
                    self.push_log(LOG_REWARD_CARD);
                    RewardOutcome::Card(card)
                }
                None => RewardOutcome::NoCard,
            },
            RewardKind::Achievement => {
                let newly_unlocked = !self.achievements.contains(&challenge.id);
                if newly_unlocked {
                    self.achievements.push(challenge.id.clone());
                    self.push_log(LOG_REWARD_ACHIEVEMENT);
                } else {
                    self.push_log(LOG_REWARD_ACHIEVEMENT_REPEAT);
                }
                RewardOutcome::Achievement {
                    id: challenge.id.clone(),
                    newly_unlocked,
                }
            }
        };

        log::debug!("completed `{}` with {seconds_left}s left", challenge.id);
        self.history.push(ChallengeRecord {
            challenge_id: challenge.id.clone(),
            zone: active.zone,
            outcome: ChallengeOutcome::Completed,
            seconds_left,
        });
        self.active = None;
        self.timer.reset();
        self.push_log(LOG_CHALLENGE_COMPLETE);

        Some(ChallengeResolution {
            challenge,
            reward,
            ability_fired,
            seconds_left,
        })
    }

    // Selections -------------------------------------------------------------

    /// Switch the active character. Returns `false` for an unknown id.
    pub fn select_character(&mut self, id: &str) -> bool {
        let result = id.parse::<CharacterId>().and_then(|character| {
            self.catalog
                .character(character)
                .map(|_| character)
                .ok_or_else(|| GameError::UnknownId {
                    kind: "character",
                    id: id.to_string(),
                })
        });
        match self.recover(result) {
            Some(character) => {
                self.character = character;
                true
            }
            None => false,
        }
    }

    pub fn select_track(&mut self, id: &str) -> bool {
        let result = self
            .catalog
            .track(id)
            .map(|t| t.id.clone())
            .ok_or_else(|| GameError::UnknownId {
                kind: "track",
                id: id.to_string(),
            });
        self.recover(result).map(|track| self.track = track).is_some()
    }

    pub fn select_mode(&mut self, id: &str) -> bool {
        let result = self
            .catalog
            .mode(id)
            .map(|m| m.id.clone())
            .ok_or_else(|| GameError::UnknownId {
                kind: "mode",
                id: id.to_string(),
            });
        self.recover(result).map(|mode| self.mode = mode).is_some()
    }

    // Observers --------------------------------------------------------------

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    #[must_use]
    pub const fn momentum(&self) -> u32 {
        self.momentum
    }

    #[must_use]
    pub const fn cards(&self) -> &HeldCards {
        &self.cards
    }

    #[must_use]
    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    #[must_use]
    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active.as_ref().map(|a| &a.challenge)
    }

    #[must_use]
    pub const fn timer(&self) -> &ChallengeTimer {
        &self.timer
    }

    #[must_use]
    pub const fn time_remaining(&self) -> u32 {
        self.timer.time_remaining()
    }

    #[must_use]
    pub const fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    #[must_use]
    pub const fn last_card(&self) -> Option<&Card> {
        self.last_card.as_ref()
    }

    #[must_use]
    pub const fn character(&self) -> CharacterId {
        self.character
    }

    #[must_use]
    pub fn track(&self) -> &str {
        &self.track
    }

    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    #[must_use]
    pub fn history(&self) -> &[ChallengeRecord] {
        &self.history
    }

    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Hand accumulated log keys to the caller, leaving the log empty.
    pub fn drain_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            character: self.character,
            track: self.track.clone(),
            mode: self.mode.clone(),
            position: self.position,
            zone: self.zone,
            momentum: self.momentum,
            cards: self.cards.iter().cloned().collect(),
            achievements: self.achievements.clone(),
            challenge: self.active_challenge().cloned(),
            time_remaining: self.timer.time_remaining(),
            timer: self.timer.state(),
            last_roll: self.last_roll,
            last_card: self.last_card.clone(),
        }
    }

    /// Verify the structural invariants every operation must preserve.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let board = &self.catalog.board;
        if !board.bounds.contains(self.position) {
            return Err(InvariantViolation(format!(
                "position {} outside the board",
                self.position
            )));
        }
        let resolved = resolve_zone(self.position, &board.zones);
        if resolved != self.zone {
            return Err(InvariantViolation(format!(
                "cached zone {} but position {} is in {resolved}",
                self.zone, self.position
            )));
        }
        if self.active.is_some() != self.timer.is_running() {
            return Err(InvariantViolation(format!(
                "active challenge {:?} paired with {} timer",
                self.active_challenge().map(|c| c.id.as_str()),
                self.timer.state()
            )));
        }
        if self.timer.is_running() && self.timer.time_remaining() > self.timer.limit() {
            return Err(InvariantViolation(format!(
                "{}s remaining exceeds {}s limit",
                self.timer.time_remaining(),
                self.timer.limit()
            )));
        }
        if let Some(active) = &self.active
            && self.timer.limit() != active.challenge.time_limit
        {
            return Err(InvariantViolation(format!(
                "timer limit {} does not match `{}`",
                self.timer.limit(),
                active.challenge.id
            )));
        }
        for (i, id) in self.achievements.iter().enumerate() {
            if self.achievements[..i].contains(id) {
                return Err(InvariantViolation(format!("duplicate achievement `{id}`")));
            }
        }
        Ok(())
    }

    // Internals --------------------------------------------------------------

    fn push_log(&mut self, key: &str) {
        self.logs.push(key.to_string());
    }

    fn recover<T>(&mut self, result: Result<T, GameError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("operation ignored: {err}");
                self.push_log(LOG_ERROR);
                self.last_error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rarity;

    fn session(seed: u64) -> GameSession {
        GameSession::with_seed(Catalog::builtin(), seed)
    }

    fn catalog_with(edit: impl FnOnce(&mut Catalog)) -> Arc<Catalog> {
        let mut catalog = Catalog::load_from_static().unwrap();
        edit(&mut catalog);
        Arc::new(catalog)
    }

    #[test]
    fn new_session_starts_neutral_and_empty() {
        let s = session(1);
        assert_eq!(s.position(), Position::new(5, 5));
        assert_eq!(s.zone(), Zone::Neutral);
        assert_eq!(s.momentum(), 0);
        assert!(s.cards().is_empty());
        assert!(s.achievements().is_empty());
        assert!(s.active_challenge().is_none());
        assert_eq!(s.timer().state(), TimerState::Idle);
        assert_eq!(s.character(), CharacterId::Eixi3);
        assert_eq!(s.track(), "earth");
        assert_eq!(s.mode(), "guitar");
        s.check_invariants().unwrap();
    }

    #[test]
    fn moving_into_earth_starts_an_earth_challenge() {
        let mut s = session(2);
        let outcome = s.move_by(-5, -5);
        assert_eq!(outcome.to, Position::new(0, 0));
        assert_eq!(outcome.zone, Zone::Earth);
        assert!(outcome.zone_changed);
        let challenge = outcome.challenge.unwrap();
        let (zone, listed) = s.catalog().challenge(&challenge.id).unwrap();
        assert_eq!(zone, Zone::Earth);
        assert_eq!(s.time_remaining(), listed.time_limit);
        assert!(s.timer().is_running());
        s.check_invariants().unwrap();
    }

    #[test]
    fn movement_is_clamped_silently() {
        let mut s = session(3);
        let outcome = s.move_by(40, -40);
        assert_eq!(outcome.to, Position::new(10, 0));
        assert_eq!(s.zone(), Zone::Water);
        let outcome = s.move_to(Position::new(-7, 99));
        assert_eq!(outcome.to, Position::new(0, 10));
        assert_eq!(s.zone(), Zone::Air);
        assert!(s.last_error().is_none());
    }

    #[test]
    fn moving_within_a_zone_does_not_restart_the_challenge() {
        let mut s = session(4);
        s.move_to(Position::new(8, 8));
        let first = s.active_challenge().cloned().unwrap();
        s.tick();
        let outcome = s.step(Direction::Right);
        assert!(!outcome.zone_changed);
        assert!(outcome.challenge.is_none());
        assert_eq!(s.active_challenge(), Some(&first));
        assert_eq!(s.time_remaining(), first.time_limit - 1);
    }

    #[test]
    fn stepping_into_neutral_keeps_the_challenge_running() {
        let mut s = session(5);
        s.move_to(Position::new(4, 4));
        assert_eq!(s.zone(), Zone::Earth);
        let outcome = s.step(Direction::Right);
        assert_eq!(outcome.zone, Zone::Neutral);
        assert!(outcome.zone_changed);
        assert!(outcome.challenge.is_none());
        assert_eq!(s.zone(), Zone::Neutral);
        assert!(s.active_challenge().is_some());
        s.check_invariants().unwrap();
    }

    #[test]
    fn entering_a_new_zone_abandons_the_old_challenge() {
        let mut s = session(6);
        s.move_to(Position::new(0, 0));
        let earth = s.active_challenge().cloned().unwrap();
        s.move_to(Position::new(10, 10));
        let fire = s.active_challenge().cloned().unwrap();
        assert_eq!(s.catalog().challenge(&fire.id).unwrap().0, Zone::Fire);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].challenge_id, earth.id);
        assert_eq!(s.history()[0].outcome, ChallengeOutcome::Abandoned);
        assert_eq!(s.momentum(), 0);
        s.check_invariants().unwrap();
    }

    #[test]
    fn enter_zone_is_guarded() {
        let mut s = session(7);
        // Already cached as neutral.
        assert!(s.enter_zone(Zone::Neutral).is_none());
        assert!(s.last_error().is_none());

        // Not where the player stands.
        assert!(s.enter_zone(Zone::Fire).is_none());
        assert_eq!(
            s.last_error(),
            Some(&GameError::ZoneMismatch {
                zone: Zone::Fire,
                actual: Zone::Neutral
            })
        );
        assert!(s.active_challenge().is_none());
        s.check_invariants().unwrap();
    }

    #[test]
    fn complete_without_challenge_is_a_silent_no_op() {
        let mut s = session(8);
        let before = s.snapshot();
        assert!(s.complete_challenge().is_none());
        assert_eq!(s.snapshot(), before);
        assert!(s.last_error().is_none());
    }

    #[test]
    fn stopped_timer_blocks_completion_without_side_effects() {
        let mut s = session(21);
        assert!(s.select_character("sharkwitch"));
        s.move_to(Position::new(0, 0));
        s.timer.reset();
        let before = s.snapshot();
        let history = s.history().len();

        assert!(s.complete_challenge().is_none());
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.history().len(), history);
        assert_eq!(s.momentum(), 0);
        assert_eq!(
            s.last_error(),
            Some(&GameError::InvalidStateTransition {
                action: "complete",
                state: TimerState::Idle
            })
        );
        assert!(!s.logs().iter().any(|l| l.starts_with(LOG_ABILITY_PREFIX)));
    }

    #[test]
    fn momentum_reward_then_idle_timer() {
        let catalog = catalog_with(|c| {
            c.challenges.earth.retain(|ch| ch.reward == RewardKind::Momentum);
        });
        let mut s = GameSession::with_seed(catalog, 9);
        s.move_by(-5, -5);
        assert_eq!(s.active_challenge().unwrap().id, "chord-prog");
        let resolution = s.complete_challenge().unwrap();
        assert_eq!(resolution.reward, RewardOutcome::Momentum { total: 1 });
        assert!(!resolution.ability_fired);
        assert_eq!(resolution.seconds_left, 300);
        assert_eq!(s.momentum(), 1);
        assert!(s.active_challenge().is_none());
        assert_eq!(s.timer().state(), TimerState::Idle);
        assert_eq!(s.history()[0].outcome, ChallengeOutcome::Completed);
        s.check_invariants().unwrap();
    }

    #[test]
    fn card_reward_adds_to_hand() {
        let catalog = catalog_with(|c| {
            c.challenges.water.retain(|ch| ch.reward == RewardKind::Card);
        });
        let mut s = GameSession::with_seed(catalog, 10);
        s.move_to(Position::new(7, 1));
        let resolution = s.complete_challenge().unwrap();
        let RewardOutcome::Card(card) = resolution.reward else {
            panic!("expected a card reward");
        };
        assert!(s.cards().contains(&card.id));
        assert_eq!(s.last_card(), Some(&card));
    }

    #[test]
    fn dream_girl_upgrades_common_reward_cards_in_earth() {
        let catalog = catalog_with(|c| {
            c.challenges.earth.retain(|ch| ch.reward == RewardKind::Card);
            c.cards.retain(|card| card.rarity == Rarity::Common);
        });
        let mut s = GameSession::with_seed(catalog, 11);
        assert!(s.select_character("dream-girl"));
        s.move_to(Position::new(1, 1));
        let resolution = s.complete_challenge().unwrap();
        assert!(resolution.ability_fired);
        assert_eq!(s.cards().get("card-1").unwrap().rarity, Rarity::Uncommon);
        assert!(s.logs().iter().any(|l| l == "ability.music-conductor"));
    }

    #[test]
    fn plain_draws_do_not_touch_the_hand() {
        let mut s = session(12);
        let card = s.draw_card().unwrap();
        assert_eq!(s.last_card(), Some(&card));
        assert!(s.cards().is_empty());
    }

    #[test]
    fn achievements_are_never_duplicated() {
        let catalog = catalog_with(|c| {
            c.challenges.air.retain(|ch| ch.reward == RewardKind::Achievement);
        });
        let mut s = GameSession::with_seed(catalog, 13);
        for _ in 0..2 {
            s.move_to(Position::new(2, 8));
            let resolution = s.complete_challenge().unwrap();
            assert!(matches!(resolution.reward, RewardOutcome::Achievement { .. }));
            s.move_to(Position::new(5, 5));
        }
        assert_eq!(s.achievements(), ["audience".to_string()]);
        s.check_invariants().unwrap();
    }

    #[test]
    fn expiry_forfeits_the_challenge() {
        let mut s = session(14);
        s.move_to(Position::new(9, 9));
        let limit = s.active_challenge().unwrap().time_limit;
        for _ in 1..limit {
            assert!(matches!(s.tick(), TickOutcome::Running { .. }));
        }
        assert_eq!(s.tick(), TickOutcome::Expired);
        assert!(s.active_challenge().is_none());
        assert_eq!(s.timer().state(), TimerState::Expired);
        assert_eq!(s.history()[0].outcome, ChallengeOutcome::Expired);
        assert!(s.complete_challenge().is_none());
        assert_eq!(s.tick(), TickOutcome::Idle);
        s.check_invariants().unwrap();
    }

    #[test]
    fn die_rolls_do_not_change_momentum() {
        let mut s = session(15);
        for _ in 0..20 {
            let roll = s.roll_die();
            assert!((1..=6).contains(&roll));
            assert_eq!(s.last_roll(), Some(roll));
        }
        assert_eq!(s.momentum(), 0);
    }

    #[test]
    fn unknown_selections_are_rejected_without_change() {
        let mut s = session(16);
        assert!(!s.select_character("bard"));
        assert_eq!(s.character(), CharacterId::Eixi3);
        assert!(matches!(
            s.last_error(),
            Some(GameError::UnknownId { kind: "character", .. })
        ));
        assert!(!s.select_track("lava"));
        assert_eq!(s.track(), "earth");
        assert!(!s.select_mode("kazoo"));
        assert_eq!(s.mode(), "guitar");

        assert!(s.select_track("fire"));
        assert!(s.select_mode("ableton"));
        assert!(s.select_character("sharkwitch"));
        let snap = s.snapshot();
        assert_eq!(snap.track, "fire");
        assert_eq!(snap.mode, "ableton");
        assert_eq!(snap.character, CharacterId::Sharkwitch);
    }

    #[test]
    fn empty_zone_catalog_is_caught_and_zone_still_updates() {
        let catalog = Arc::new({
            let mut c = Catalog::load_from_static().unwrap();
            c.challenges.fire.clear();
            c
        });
        let mut s = GameSession::with_seed(catalog, 17);
        let outcome = s.move_to(Position::new(10, 10));
        assert!(outcome.challenge.is_none());
        assert_eq!(s.zone(), Zone::Fire);
        assert_eq!(
            s.last_error(),
            Some(&GameError::InvalidZone { zone: Zone::Fire })
        );
        s.check_invariants().unwrap();
    }

    #[test]
    fn restart_keeps_selections_and_clears_progress() {
        let mut s = session(18);
        s.select_mode("piano");
        s.move_to(Position::new(0, 0));
        s.complete_challenge();
        s.roll_die();
        s.restart();
        assert_eq!(s.position(), Position::new(5, 5));
        assert_eq!(s.zone(), Zone::Neutral);
        assert_eq!(s.momentum(), 0);
        assert!(s.history().is_empty());
        assert!(s.last_roll().is_none());
        assert_eq!(s.mode(), "piano");
        s.check_invariants().unwrap();
    }

    #[test]
    fn drain_logs_empties_the_buffer() {
        let mut s = session(19);
        s.move_to(Position::new(0, 0));
        let logs = s.drain_logs();
        assert_eq!(logs, vec!["log.zone.enter", "log.challenge.start"]);
        assert!(s.logs().is_empty());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut s = session(20);
        s.move_to(Position::new(0, 0));
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["zone"], "earth");
        assert_eq!(json["position"]["x"], 0);
        assert_eq!(json["timer"], "running");
        assert_eq!(json["character"], "eixi-3");
    }
}
