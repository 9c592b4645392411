//! Board geometry: positions, grid bounds and the elemental zone table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{GRID_MAX, GRID_MIN, START_X, START_Y};
use crate::error::{CatalogError, GameError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Earth,
    Water,
    Air,
    Fire,
    Neutral,
}

impl Zone {
    /// Zones with a rectangle and a challenge catalog, in resolution order.
    pub const ELEMENTAL: [Self; 4] = [Self::Earth, Self::Water, Self::Air, Self::Fire];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Earth => "earth",
            Self::Water => "water",
            Self::Air => "air",
            Self::Fire => "fire",
            Self::Neutral => "neutral",
        }
    }

    #[must_use]
    pub const fn is_elemental(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Zone {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earth" => Ok(Self::Earth),
            "water" => Ok(Self::Water),
            "air" => Ok(Self::Air),
            "fire" => Ok(Self::Fire),
            "neutral" => Ok(Self::Neutral),
            _ => Err(GameError::UnknownId {
                kind: "zone",
                id: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(START_X, START_Y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement on screen: `Up` decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Inclusive square bounds shared by both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: i32,
    pub max: i32,
}

impl GridBounds {
    #[must_use]
    pub fn clamp(self, position: Position) -> Position {
        Position {
            x: position.x.clamp(self.min, self.max),
            y: position.y.clamp(self.min, self.max),
        }
    }

    #[must_use]
    pub const fn contains(self, position: Position) -> bool {
        position.x >= self.min
            && position.x <= self.max
            && position.y >= self.min
            && position.y <= self.max
    }

    /// # Errors
    ///
    /// Returns an error when `min > max`.
    pub fn validate(self) -> Result<(), CatalogError> {
        if self.min > self.max {
            return Err(CatalogError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            min: GRID_MIN,
            max: GRID_MAX,
        }
    }
}

/// Axis-aligned rectangle with inclusive `[min, max]` ranges per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRect {
    pub x: [i32; 2],
    pub y: [i32; 2],
}

impl ZoneRect {
    #[must_use]
    pub const fn new(x: [i32; 2], y: [i32; 2]) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x >= self.x[0]
            && position.x <= self.x[1]
            && position.y >= self.y[0]
            && position.y <= self.y[1]
    }

    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x[0] <= other.x[1]
            && other.x[0] <= self.x[1]
            && self.y[0] <= other.y[1]
            && other.y[0] <= self.y[1]
    }

    const fn is_inverted(&self) -> bool {
        self.x[0] > self.x[1] || self.y[0] > self.y[1]
    }
}

/// Rectangles for the four elemental zones. Neutral is whatever none covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTable {
    pub earth: ZoneRect,
    pub water: ZoneRect,
    pub air: ZoneRect,
    pub fire: ZoneRect,
}

impl ZoneTable {
    #[must_use]
    pub const fn rect(&self, zone: Zone) -> Option<&ZoneRect> {
        match zone {
            Zone::Earth => Some(&self.earth),
            Zone::Water => Some(&self.water),
            Zone::Air => Some(&self.air),
            Zone::Fire => Some(&self.fire),
            Zone::Neutral => None,
        }
    }

    /// Check that rectangles are well formed and pairwise disjoint.
    ///
    /// # Errors
    ///
    /// Returns the first inverted rectangle or overlapping pair found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for zone in Zone::ELEMENTAL {
            if self.rect(zone).is_some_and(ZoneRect::is_inverted) {
                return Err(CatalogError::InvalidRect { zone });
            }
        }
        for (i, first) in Zone::ELEMENTAL.iter().enumerate() {
            for second in &Zone::ELEMENTAL[i + 1..] {
                if let (Some(a), Some(b)) = (self.rect(*first), self.rect(*second))
                    && a.overlaps(b)
                {
                    return Err(CatalogError::OverlappingZones {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            earth: ZoneRect::new([0, 4], [0, 4]),
            water: ZoneRect::new([6, 10], [0, 4]),
            air: ZoneRect::new([0, 4], [6, 10]),
            fire: ZoneRect::new([6, 10], [6, 10]),
        }
    }
}

/// Map a position to its zone, checking earth, water, air, fire in that order.
#[must_use]
pub fn resolve_zone(position: Position, table: &ZoneTable) -> Zone {
    Zone::ELEMENTAL
        .into_iter()
        .find(|zone| table.rect(*zone).is_some_and(|rect| rect.contains(position)))
        .unwrap_or(Zone::Neutral)
}
