//! Card draws and the held-card collection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Card;

/// Draw one card uniformly from `deck`; `None` when the deck is empty.
#[must_use]
pub fn draw_card<'a, R>(deck: &'a [Card], rng: &mut R) -> Option<&'a Card>
where
    R: Rng + ?Sized,
{
    if deck.is_empty() {
        return None;
    }
    deck.get(rng.gen_range(0..deck.len()))
}

/// Cards earned through challenge rewards, keyed by card id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HeldCards(BTreeMap<String, Card>);

impl HeldCards {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add `card`. A card already held keeps whichever copy has the higher rarity.
    /// Returns `true` when the collection changed.
    pub fn insert(&mut self, card: Card) -> bool {
        match self.0.get_mut(&card.id) {
            Some(held) if held.rarity >= card.rarity => false,
            Some(held) => {
                *held = card;
                true
            }
            None => {
                self.0.insert(card.id.clone(), card);
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.0.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.0.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Rarity};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn empty_deck_draws_nothing() {
        let mut rng = SmallRng::seed_from_u64(9);
        assert!(draw_card(&[], &mut rng).is_none());
    }

    #[test]
    fn held_cards_keep_the_stronger_copy() {
        let catalog = Catalog::load_from_static().unwrap();
        let base = catalog.card("card-1").unwrap().clone();
        let mut upgraded = base.clone();
        upgraded.rarity = Rarity::Uncommon;

        let mut held = HeldCards::new();
        assert!(held.insert(base.clone()));
        assert!(!held.insert(base.clone()));
        assert!(held.insert(upgraded));
        assert!(!held.insert(base));
        assert_eq!(held.len(), 1);
        assert_eq!(held.get("card-1").unwrap().rarity, Rarity::Uncommon);
    }

    #[test]
    fn held_cards_iterate_in_id_order() {
        let catalog = Catalog::load_from_static().unwrap();
        let mut held = HeldCards::new();
        for id in ["card-3", "card-1", "card-2"] {
            held.insert(catalog.card(id).unwrap().clone());
        }
        let ids: Vec<_> = held.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["card-1", "card-2", "card-3"]);
        assert!(held.contains("card-2"));
        held.clear();
        assert!(held.is_empty());
    }
}
