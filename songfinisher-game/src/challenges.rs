//! Challenge selection for zone entry.
use rand::Rng;

use crate::catalog::{Catalog, Challenge};
use crate::error::GameError;
use crate::zone::Zone;

/// Read-only view over the per-zone challenge lists of a catalog.
#[derive(Debug, Clone, Copy)]
pub struct ChallengePool<'a> {
    catalog: &'a Catalog,
}

impl<'a> ChallengePool<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Pick a challenge uniformly from `zone`'s list. Draws are independent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidZone` for neutral or for a zone with no challenges.
    pub fn pick_challenge<R>(&self, zone: Zone, rng: &mut R) -> Result<&'a Challenge, GameError>
    where
        R: Rng + ?Sized,
    {
        let list = self.catalog.challenges_for(zone);
        if list.is_empty() {
            return Err(GameError::InvalidZone { zone });
        }
        let idx = rng.gen_range(0..list.len());
        list.get(idx).ok_or(GameError::InvalidZone { zone })
    }

    #[must_use]
    pub fn total_challenges(&self, zone: Zone) -> usize {
        self.catalog.challenges_for(zone).len()
    }

    #[must_use]
    pub fn zone_of(&self, challenge_id: &str) -> Option<Zone> {
        self.catalog.challenge(challenge_id).map(|(zone, _)| zone)
    }
}
