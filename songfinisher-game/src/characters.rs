//! Playable characters and their challenge-completion abilities.
//!
//! Each character owns exactly one [`Ability`]. The session runs it right
//! before a challenge reward is resolved, handing it mutable access to the
//! pieces of state an ability is allowed to touch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Card, Challenge, Rarity};
use crate::constants::{
    BALANCED_BONUS_SECS, BALANCED_MOMENTUM, SPIRIT_CONDUCTOR_MOMENTUM, TRAIN_CONDUCTOR_BONUS_SECS,
    TRAIN_CONDUCTOR_CHALLENGE,
};
use crate::error::GameError;
use crate::timer::ChallengeTimer;
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterId {
    #[default]
    #[serde(rename = "eixi-3")]
    Eixi3,
    #[serde(rename = "dj-jammy")]
    DjJammy,
    #[serde(rename = "dream-girl")]
    DreamGirl,
    #[serde(rename = "sharkwitch")]
    Sharkwitch,
}

impl CharacterId {
    pub const ALL: [Self; 4] = [Self::Eixi3, Self::DjJammy, Self::DreamGirl, Self::Sharkwitch];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eixi3 => "eixi-3",
            Self::DjJammy => "dj-jammy",
            Self::DreamGirl => "dream-girl",
            Self::Sharkwitch => "sharkwitch",
        }
    }

    #[must_use]
    pub fn ability(self) -> &'static dyn Ability {
        match self {
            Self::Eixi3 => &SpiritConductor,
            Self::DjJammy => &TrainConductor,
            Self::DreamGirl => &MusicConductor,
            Self::Sharkwitch => &BalancedApproach,
        }
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| GameError::UnknownId {
                kind: "character",
                id: s.to_string(),
            })
    }
}

/// State an ability may read or modify while a challenge resolves.
#[derive(Debug)]
pub struct AbilityContext<'a> {
    pub zone: Zone,
    pub challenge: &'a Challenge,
    pub momentum: &'a mut u32,
    pub timer: &'a mut ChallengeTimer,
    /// The card being drawn as this challenge's reward, if any.
    pub card: Option<&'a mut Card>,
}

pub trait Ability: Sync {
    /// Stable key used in the session log.
    fn key(&self) -> &'static str;

    /// Apply the ability. Returns `true` if it changed anything.
    fn apply(&self, ctx: &mut AbilityContext<'_>) -> bool;
}

/// Extra momentum in the fire zone.
#[derive(Debug, Clone, Copy)]
pub struct SpiritConductor;

impl Ability for SpiritConductor {
    fn key(&self) -> &'static str {
        "spirit-conductor"
    }

    fn apply(&self, ctx: &mut AbilityContext<'_>) -> bool {
        if ctx.zone != Zone::Fire {
            return false;
        }
        *ctx.momentum = ctx.momentum.saturating_add(SPIRIT_CONDUCTOR_MOMENTUM);
        true
    }
}

/// More time on the rhythm challenge.
#[derive(Debug, Clone, Copy)]
pub struct TrainConductor;

impl Ability for TrainConductor {
    fn key(&self) -> &'static str {
        "train-conductor"
    }

    fn apply(&self, ctx: &mut AbilityContext<'_>) -> bool {
        if ctx.challenge.id != TRAIN_CONDUCTOR_CHALLENGE {
            return false;
        }
        ctx.timer.extend(TRAIN_CONDUCTOR_BONUS_SECS) > 0
    }
}

/// Improves common card draws in the earth zone.
#[derive(Debug, Clone, Copy)]
pub struct MusicConductor;

impl Ability for MusicConductor {
    fn key(&self) -> &'static str {
        "music-conductor"
    }

    fn apply(&self, ctx: &mut AbilityContext<'_>) -> bool {
        if ctx.zone != Zone::Earth {
            return false;
        }
        match ctx.card.as_deref_mut() {
            Some(card) if card.rarity == Rarity::Common => {
                card.rarity = card.rarity.upgraded();
                true
            }
            _ => false,
        }
    }
}

/// A little momentum and a little time, everywhere.
#[derive(Debug, Clone, Copy)]
pub struct BalancedApproach;

impl Ability for BalancedApproach {
    fn key(&self) -> &'static str {
        "balanced-approach"
    }

    fn apply(&self, ctx: &mut AbilityContext<'_>) -> bool {
        *ctx.momentum = ctx.momentum.saturating_add(BALANCED_MOMENTUM);
        ctx.timer.extend(BALANCED_BONUS_SECS);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, RewardKind};

    struct Fixture {
        challenge: Challenge,
        momentum: u32,
        timer: ChallengeTimer,
        card: Card,
    }

    impl Fixture {
        fn new(challenge_id: &str, card_id: &str) -> Self {
            let catalog = Catalog::load_from_static().unwrap();
            let (_, challenge) = catalog.challenge(challenge_id).unwrap();
            let mut timer = ChallengeTimer::new();
            timer.start(challenge.time_limit).unwrap();
            Self {
                challenge: challenge.clone(),
                momentum: 0,
                timer,
                card: catalog.card(card_id).unwrap().clone(),
            }
        }

        fn run(&mut self, id: CharacterId, zone: Zone, with_card: bool) -> bool {
            let mut ctx = AbilityContext {
                zone,
                challenge: &self.challenge,
                momentum: &mut self.momentum,
                timer: &mut self.timer,
                card: if with_card { Some(&mut self.card) } else { None },
            };
            id.ability().apply(&mut ctx)
        }
    }

    #[test]
    fn spirit_conductor_only_fires_in_fire_zone() {
        let mut fx = Fixture::new("stage", "card-1");
        assert!(!fx.run(CharacterId::Eixi3, Zone::Water, false));
        assert_eq!(fx.momentum, 0);
        assert!(fx.run(CharacterId::Eixi3, Zone::Fire, false));
        assert_eq!(fx.momentum, 2);
    }

    #[test]
    fn train_conductor_extends_rhythm_within_limit() {
        let mut fx = Fixture::new("rhythm", "card-1");
        assert_eq!(fx.challenge.reward, RewardKind::Card);
        // A fresh timer is already at its limit.
        assert!(!fx.run(CharacterId::DjJammy, Zone::Earth, false));
        for _ in 0..100 {
            fx.timer.tick();
        }
        assert!(fx.run(CharacterId::DjJammy, Zone::Earth, false));
        assert_eq!(fx.timer.time_remaining(), 140);

        let mut other = Fixture::new("structure", "card-1");
        other.timer.tick();
        assert!(!other.run(CharacterId::DjJammy, Zone::Earth, false));
    }

    #[test]
    fn music_conductor_upgrades_common_cards_in_earth() {
        let mut fx = Fixture::new("rhythm", "card-1");
        assert!(!fx.run(CharacterId::DreamGirl, Zone::Water, true));
        assert_eq!(fx.card.rarity, Rarity::Common);
        assert!(!fx.run(CharacterId::DreamGirl, Zone::Earth, false));
        assert!(fx.run(CharacterId::DreamGirl, Zone::Earth, true));
        assert_eq!(fx.card.rarity, Rarity::Uncommon);
        // Only common cards improve.
        assert!(!fx.run(CharacterId::DreamGirl, Zone::Earth, true));
        assert_eq!(fx.card.rarity, Rarity::Uncommon);
    }

    #[test]
    fn music_conductor_upgrade_is_one_rarity_step() {
        let mut fx = Fixture::new("rhythm", "card-1");
        let expected = fx.card.rarity.upgraded();
        assert!(fx.run(CharacterId::DreamGirl, Zone::Earth, true));
        assert_eq!(fx.card.rarity, expected);

        for rare in ["card-3", "card-4"] {
            let mut fx = Fixture::new("rhythm", rare);
            let before = fx.card.rarity;
            assert!(!fx.run(CharacterId::DreamGirl, Zone::Earth, true));
            assert_eq!(fx.card.rarity, before);
        }
    }

    #[test]
    fn balanced_approach_always_adds_momentum() {
        let mut fx = Fixture::new("mixing", "card-2");
        for _ in 0..50 {
            fx.timer.tick();
        }
        assert!(fx.run(CharacterId::Sharkwitch, Zone::Water, false));
        assert_eq!(fx.momentum, 1);
        assert_eq!(fx.timer.time_remaining(), 280);
    }

    #[test]
    fn ids_parse_and_display() {
        for id in CharacterId::ALL {
            assert_eq!(id.to_string().parse::<CharacterId>(), Ok(id));
        }
        assert!("bard".parse::<CharacterId>().is_err());
        let json = serde_json::to_string(&CharacterId::DjJammy).unwrap();
        assert_eq!(json, "\"dj-jammy\"");
    }

    #[test]
    fn every_character_has_a_distinct_ability() {
        let mut keys: Vec<_> = CharacterId::ALL
            .into_iter()
            .map(|id| id.ability().key())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CharacterId::ALL.len());
    }
}
