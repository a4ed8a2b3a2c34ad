//! Card movement between locations.
//!
//! Positions are signed so rules programs can address either end of a
//! location without knowing its length:
//!
//! - Taking: `0` is the front, `-1` the last card, `-2` the one before it.
//! - Inserting: `0` is the front, `-1` appends, `-2` goes before the last card.
//!
//! Out-of-range indices are clamped. When several cards move, each one is
//! taken from and inserted at the same logical index, so moving `k` cards
//! from index `0` to index `0` reverses them.

use rustc_hash::FxHashSet;

use crate::core::error::{GameError, Result};
use crate::core::rng::GameRng;
use crate::entities::Store;

/// Resolve a signed take-index against a non-empty sequence.
pub(crate) fn take_index(index: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let last = len as i64 - 1;
    let raw = if index < 0 { len as i64 + index } else { index };
    raw.clamp(0, last) as usize
}

/// Resolve a signed insert-index against a sequence of `len` cards.
pub(crate) fn insert_index(index: i64, len: usize) -> usize {
    let raw = if index < 0 { len as i64 + index + 1 } else { index };
    raw.clamp(0, len as i64) as usize
}

fn resolve_count(count: i64, available: usize) -> usize {
    if count < 0 {
        available
    } else {
        (count as usize).min(available)
    }
}

impl Store {
    /// Move up to `count` cards from `from` to `to`.
    ///
    /// `count < 0` moves every card. `from` and `to` may be the same
    /// location. Returns the cards moved, in the order they were taken.
    pub fn move_from(
        &mut self,
        from: &str,
        to: &str,
        count: i64,
        from_index: i64,
        to_index: i64,
    ) -> Result<Vec<String>> {
        let available = self.location("move_from", from)?.cards.len();
        self.location("move_from", to)?;

        let count = resolve_count(count, available);
        let mut moved = Vec::with_capacity(count);

        for _ in 0..count {
            let target = insert_index(to_index, self.location("move_from", to)?.cards.len());

            let source = self.location_mut("move_from", from)?;
            let i = take_index(from_index, source.cards.len());
            let card = source.cards.remove(i);

            let destination = self.location_mut("move_from", to)?;
            let j = target.min(destination.cards.len());
            destination.cards.insert(j, card.clone());

            if let Some(record) = self.cards.get_mut(&card) {
                debug_assert_eq!(record.location.as_deref(), Some(from));
                record.location = Some(to.to_string());
            }
            moved.push(card);
        }

        tracing::trace!(from, to, moved = moved.len(), "moved cards");
        Ok(moved)
    }

    /// Move `count` cards from the back of `from` to the back of `to`.
    pub fn move_top(&mut self, from: &str, to: &str, count: i64) -> Result<Vec<String>> {
        self.move_from(from, to, count, -1, -1)
    }

    /// Move named cards from wherever they are to `to`.
    ///
    /// Only the first `count` listed cards move (`count < 0` moves all of
    /// them). Every card that would move must be placed and listed once;
    /// otherwise nothing moves and `CardNotFound` is returned.
    pub fn move_cards<S: AsRef<str>>(
        &mut self,
        cards: &[S],
        to: &str,
        count: i64,
        to_index: i64,
    ) -> Result<Vec<String>> {
        self.location("move_cards", to)?;

        let count = resolve_count(count, cards.len());
        let selected = &cards[..count];

        let mut seen = FxHashSet::default();
        for card in selected {
            let card = card.as_ref();
            let placed = self.card("move_cards", card)?.location.is_some();
            if !placed || !seen.insert(card) {
                return Err(GameError::CardNotFound {
                    card: card.to_string(),
                });
            }
        }

        let mut moved = Vec::with_capacity(count);
        for card in selected {
            let card = card.as_ref();
            let target = insert_index(to_index, self.location("move_cards", to)?.cards.len());

            let from = self
                .card("move_cards", card)?
                .location
                .clone()
                .ok_or_else(|| GameError::CardNotFound {
                    card: card.to_string(),
                })?;
            let source = self.location_mut("move_cards", &from)?;
            let i = source
                .cards
                .index_of(&card.to_string())
                .ok_or_else(|| GameError::CardNotFound {
                    card: card.to_string(),
                })?;
            source.cards.remove(i);

            let destination = self.location_mut("move_cards", to)?;
            let j = target.min(destination.cards.len());
            destination.cards.insert(j, card.to_string());

            if let Some(record) = self.cards.get_mut(card) {
                record.location = Some(to.to_string());
            }
            moved.push(card.to_string());
        }

        tracing::trace!(to, moved = moved.len(), "moved named cards");
        Ok(moved)
    }

    /// Shuffle a location's cards in place.
    pub fn shuffle_location(&mut self, location: &str, rng: &mut GameRng) -> Result<()> {
        let record = self.location_mut("shuffle", location)?;
        let mut cards: Vec<String> = record.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        record.cards = cards.into_iter().collect();
        Ok(())
    }

    /// Check that every placed card is listed exactly once, by the location
    /// it records, and that no location lists a card recorded elsewhere.
    pub fn check_placement(&self) -> Result<()> {
        for (name, record) in &self.cards {
            let Some(location) = record.location.as_deref() else {
                continue;
            };
            let listed = self
                .location("check_placement", location)?
                .cards
                .iter()
                .filter(|c| *c == name)
                .count();
            if listed != 1 {
                return Err(GameError::PlacementMismatch {
                    card: name.clone(),
                    location: location.to_string(),
                });
            }
        }

        for (name, location) in &self.locations {
            for card in &location.cards {
                if self.card("check_placement", card)?.location.as_deref() != Some(name.as_str()) {
                    return Err(GameError::PlacementMismatch {
                        card: card.clone(),
                        location: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
