//! Static game catalogs: board layout, characters, tracks, modes, challenges and cards.
//!
//! The bundled catalog is parsed once from `assets/catalog.json` and shared
//! read-only by every session. Custom catalogs go through the same validation
//! via [`Catalog::from_json`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use crate::characters::CharacterId;
use crate::error::CatalogError;
use crate::zone::{GridBounds, Position, Zone, ZoneTable, resolve_zone};

pub const DEFAULT_CATALOG_DATA: &str = include_str!("../assets/catalog.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Momentum,
    Card,
    Achievement,
}

/// Card quality, ordered weakest to strongest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    /// One tier stronger; legendary stays legendary.
    #[must_use]
    pub const fn upgraded(self) -> Self {
        match self {
            Self::Common => Self::Uncommon,
            Self::Uncommon => Self::Rare,
            Self::Rare | Self::Legendary => Self::Legendary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub name: String,
    /// Countdown length in seconds.
    pub time_limit: u32,
    pub reward: RewardKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub element: Zone,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub id: CharacterId,
    pub name: String,
    pub element: Zone,
    pub specialty: String,
    #[serde(default)]
    pub description: String,
}

/// A songwriting phase the player focuses on, independent of board zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BoardConfig {
    #[serde(default)]
    pub bounds: GridBounds,
    #[serde(default)]
    pub start: Position,
    #[serde(default)]
    pub zones: ZoneTable,
}

/// Per-zone challenge lists. Neutral never has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ZoneChallenges {
    #[serde(default)]
    pub earth: Vec<Challenge>,
    #[serde(default)]
    pub water: Vec<Challenge>,
    #[serde(default)]
    pub air: Vec<Challenge>,
    #[serde(default)]
    pub fire: Vec<Challenge>,
}

impl ZoneChallenges {
    #[must_use]
    pub fn for_zone(&self, zone: Zone) -> &[Challenge] {
        match zone {
            Zone::Earth => &self.earth,
            Zone::Water => &self.water,
            Zone::Air => &self.air,
            Zone::Fire => &self.fire,
            Zone::Neutral => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub characters: Vec<CharacterInfo>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub challenges: ZoneChallenges,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the data breaks a catalog
    /// invariant (overlapping zones, empty challenge lists, duplicate ids...).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails validation.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_DATA)
    }

    /// Shared handle to the bundled catalog, parsed on first use.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();
        CATALOG
            .get_or_init(|| {
                let catalog = Self::load_from_static().unwrap_or_else(|err| {
                    log::error!("bundled catalog rejected: {err}");
                    Self::default()
                });
                Arc::new(catalog)
            })
            .clone()
    }

    /// Check every static invariant the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.board.bounds.validate()?;
        if !self.board.bounds.contains(self.board.start) {
            return Err(CatalogError::StartOutOfBounds {
                x: self.board.start.x,
                y: self.board.start.y,
            });
        }
        self.board.zones.validate()?;
        let start_zone = resolve_zone(self.board.start, &self.board.zones);
        if start_zone != Zone::Neutral {
            return Err(CatalogError::StartInZone { zone: start_zone });
        }

        let mut challenge_ids = HashSet::new();
        for zone in Zone::ELEMENTAL {
            let list = self.challenges.for_zone(zone);
            if list.is_empty() {
                return Err(CatalogError::MissingChallenges { zone });
            }
            for challenge in list {
                if challenge.time_limit == 0 {
                    return Err(CatalogError::InvalidTimeLimit {
                        id: challenge.id.clone(),
                    });
                }
                if !challenge_ids.insert(challenge.id.as_str()) {
                    return Err(CatalogError::DuplicateId {
                        kind: "challenge",
                        id: challenge.id.clone(),
                    });
                }
            }
        }

        if self.cards.is_empty() {
            return Err(CatalogError::EmptyDeck);
        }
        ensure_unique("card", self.cards.iter().map(|c| c.id.as_str()))?;
        ensure_unique("track", self.tracks.iter().map(|t| t.id.as_str()))?;
        ensure_unique("mode", self.modes.iter().map(|m| m.id.as_str()))?;
        ensure_unique("character", self.characters.iter().map(|c| c.id.as_str()))?;
        for id in CharacterId::ALL {
            if self.character(id).is_none() {
                return Err(CatalogError::MissingCharacter {
                    id: id.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn challenges_for(&self, zone: Zone) -> &[Challenge] {
        self.challenges.for_zone(zone)
    }

    /// Find a challenge by id along with the zone whose list holds it.
    #[must_use]
    pub fn challenge(&self, id: &str) -> Option<(Zone, &Challenge)> {
        Zone::ELEMENTAL.into_iter().find_map(|zone| {
            self.challenges_for(zone)
                .iter()
                .find(|c| c.id == id)
                .map(|c| (zone, c))
        })
    }

    #[must_use]
    pub fn character(&self, id: CharacterId) -> Option<&CharacterInfo> {
        self.characters.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn mode(&self, id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
