//! Entity store: named cards, locations, and players.
//!
//! The store tracks every record by name. Names are unique across all three
//! kinds, so a rules program can pass a bare string around without saying what
//! it refers to.
//!
//! Card placement is kept in two places that must always agree: each card
//! records its location, and each location holds an ordered sequence of card
//! names. Only [`Store::add_cards`] and the relocation primitives in
//! [`crate::zones`] touch either side.
//!
//! All maps are persistent (`im`), so cloning a store is O(1). The decision
//! coordinator relies on this to hand deciders a private snapshot.
//!
//! ## Usage
//!
//! ```
//! use tabletop_engine::entities::{Data, Store};
//!
//! let mut store = Store::new();
//! store.create_location("deck", Data::new()).unwrap();
//! let cards = store.create_card("coin", Data::new().with("value", 1), 3).unwrap();
//! assert_eq!(cards, vec!["coin-1", "coin-2", "coin-3"]);
//!
//! store.add_cards(&cards, "deck").unwrap();
//! assert_eq!(store.card_count("deck").unwrap(), 3);
//! assert_eq!(store.find_card("coin-2").unwrap(), Some("deck"));
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::error::{EntityKind, GameError, Result};
use crate::decision::Decider;

use super::data::Data;

#[derive(Clone, Debug)]
pub(crate) struct CardRecord {
    pub(crate) data: Data,
    pub(crate) location: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct LocationRecord {
    pub(crate) cards: im::Vector<String>,
    pub(crate) data: Data,
}

#[derive(Clone)]
pub(crate) struct PlayerRecord {
    pub(crate) data: Data,
    pub(crate) decider: Arc<dyn Decider>,
}

impl fmt::Debug for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerRecord")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Owner of every card, location, and player record.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub(crate) cards: im::HashMap<String, CardRecord>,
    pub(crate) locations: im::HashMap<String, LocationRecord>,
    players: im::HashMap<String, PlayerRecord>,
    player_order: im::Vector<String>,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_free(&self, op: &'static str, name: &str) -> Result<()> {
        let existing = if self.cards.contains_key(name) {
            EntityKind::Card
        } else if self.locations.contains_key(name) {
            EntityKind::Location
        } else if self.players.contains_key(name) {
            EntityKind::Player
        } else {
            return Ok(());
        };

        Err(GameError::DuplicateName {
            op,
            name: name.to_string(),
            existing,
        })
    }

    /// Create `count` cards sharing the same payload.
    ///
    /// A single card keeps `name` as is. Several cards are named
    /// `name-1..=name-count`. Returns the created names; nothing is created
    /// if any of them collides with an existing entity.
    pub fn create_card(&mut self, name: &str, data: Data, count: usize) -> Result<Vec<String>> {
        let names: Vec<String> = if count == 1 {
            vec![name.to_string()]
        } else {
            (1..=count).map(|i| format!("{name}-{i}")).collect()
        };

        for card in &names {
            self.ensure_free("create_card", card)?;
        }

        for card in &names {
            self.cards.insert(
                card.clone(),
                CardRecord {
                    data: data.clone(),
                    location: None,
                },
            );
        }

        tracing::trace!(card = name, count, "created cards");
        Ok(names)
    }

    /// Create an empty location.
    pub fn create_location(&mut self, name: &str, data: Data) -> Result<String> {
        self.ensure_free("create_location", name)?;
        self.locations.insert(
            name.to_string(),
            LocationRecord {
                cards: im::Vector::new(),
                data,
            },
        );
        Ok(name.to_string())
    }

    /// Create a player bound to the decision function that answers its picks.
    pub fn create_player(&mut self, name: &str, decider: Arc<dyn Decider>, data: Data) -> Result<String> {
        self.ensure_free("create_player", name)?;
        self.players
            .insert(name.to_string(), PlayerRecord { data, decider });
        self.player_order.push_back(name.to_string());
        Ok(name.to_string())
    }

    /// Player names in creation order.
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.player_order.iter().map(String::as_str)
    }

    /// Place unplaced cards at the back of `location`, in the given order.
    ///
    /// Fails without changing anything if a card is unknown, listed twice, or
    /// already at some location.
    pub fn add_cards<S: AsRef<str>>(&mut self, cards: &[S], location: &str) -> Result<()> {
        if !self.locations.contains_key(location) {
            return Err(GameError::unknown("add_cards", EntityKind::Location, location));
        }

        let mut seen = FxHashSet::default();
        for card in cards {
            let card = card.as_ref();
            if !seen.insert(card) {
                return Err(GameError::DuplicateCard {
                    card: card.to_string(),
                });
            }

            let record = self.card("add_cards", card)?;
            if let Some(current) = &record.location {
                return Err(GameError::AlreadyPlaced {
                    card: card.to_string(),
                    location: current.clone(),
                });
            }
        }

        for card in cards {
            if let Some(record) = self.cards.get_mut(card.as_ref()) {
                record.location = Some(location.to_string());
            }
        }
        let sequence = &mut self.location_mut("add_cards", location)?.cards;
        sequence.extend(cards.iter().map(|c| c.as_ref().to_string()));

        tracing::trace!(location, added = cards.len(), "placed cards");
        Ok(())
    }

    /// The live card sequence of a location (front first).
    pub fn cards(&self, location: &str) -> Result<&im::Vector<String>> {
        Ok(&self.location("cards", location)?.cards)
    }

    /// Number of cards at a location.
    pub fn card_count(&self, location: &str) -> Result<usize> {
        Ok(self.location("card_count", location)?.cards.len())
    }

    /// Where a card currently is, or `None` if it has not been placed.
    pub fn find_card(&self, card: &str) -> Result<Option<&str>> {
        Ok(self.card("find_card", card)?.location.as_deref())
    }

    pub fn card_data(&self, card: &str) -> Result<&Data> {
        Ok(&self.card("card_data", card)?.data)
    }

    pub fn card_data_mut(&mut self, card: &str) -> Result<&mut Data> {
        self.cards
            .get_mut(card)
            .map(|record| &mut record.data)
            .ok_or_else(|| GameError::unknown("card_data_mut", EntityKind::Card, card))
    }

    pub fn location_data(&self, location: &str) -> Result<&Data> {
        Ok(&self.location("location_data", location)?.data)
    }

    pub fn location_data_mut(&mut self, location: &str) -> Result<&mut Data> {
        Ok(&mut self.location_mut("location_data_mut", location)?.data)
    }

    pub fn player_data(&self, player: &str) -> Result<&Data> {
        Ok(&self.player("player_data", player)?.data)
    }

    pub fn player_data_mut(&mut self, player: &str) -> Result<&mut Data> {
        self.players
            .get_mut(player)
            .map(|record| &mut record.data)
            .ok_or_else(|| GameError::unknown("player_data_mut", EntityKind::Player, player))
    }

    #[must_use]
    pub fn has_card(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    #[must_use]
    pub fn has_location(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    #[must_use]
    pub fn has_player(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    /// Total number of cards created, placed or not.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub(crate) fn decider(&self, player: &str) -> Result<Arc<dyn Decider>> {
        Ok(Arc::clone(&self.player("group_picks", player)?.decider))
    }

    // Lookups below take the public operation name for error messages.

    pub(crate) fn card(&self, op: &'static str, card: &str) -> Result<&CardRecord> {
        self.cards
            .get(card)
            .ok_or_else(|| GameError::unknown(op, EntityKind::Card, card))
    }

    pub(crate) fn location(&self, op: &'static str, location: &str) -> Result<&LocationRecord> {
        self.locations
            .get(location)
            .ok_or_else(|| GameError::unknown(op, EntityKind::Location, location))
    }

    pub(crate) fn location_mut(&mut self, op: &'static str, location: &str) -> Result<&mut LocationRecord> {
        self.locations
            .get_mut(location)
            .ok_or_else(|| GameError::unknown(op, EntityKind::Location, location))
    }

    fn player(&self, op: &'static str, player: &str) -> Result<&PlayerRecord> {
        self.players
            .get(player)
            .ok_or_else(|| GameError::unknown(op, EntityKind::Player, player))
    }
}
