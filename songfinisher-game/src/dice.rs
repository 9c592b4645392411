use rand::Rng;

use crate::constants::DIE_FACES;

/// Roll a six-sided die.
#[must_use]
pub fn roll_die<R>(rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    rng.gen_range(1..=DIE_FACES)
}
