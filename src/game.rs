//! The engine facade a rules program drives.
//!
//! A [`Game`] owns the entity [`Store`], the engine RNG, and the decision
//! [`Coordinator`]. Mutation needs `&mut Game`; asking players needs only
//! `&Game`, so the store cannot change while a batch is waiting on deciders.
//!
//! ## Usage
//!
//! ```
//! use tabletop_engine::{Data, EngineConfig, FnDecider, Game, PickCount, PickOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tabletop_engine::Result<()> {
//! let mut game = Game::new(EngineConfig::new().with_seed(7));
//! game.create_player("A", FnDecider::new(|_, picks| Some(vec![picks[0].options()[0].clone()])), Data::new())?;
//! game.create_location("hand", Data::new())?;
//! let cards = game.create_card("coin", Data::new(), 2)?;
//! game.add_cards(&cards, "hand")?;
//!
//! let pick = game.pick_cards("A", &cards, PickCount::Exact(1))?;
//! let outcome = game.ask(pick).await?;
//! assert_eq!(outcome, PickOutcome::Chosen(vec!["coin-1".to_string()]));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::core::error::{EntityKind, GameError, Result};
use crate::core::rng::GameRng;
use crate::decision::{
    Coordinator, Decider, Pick, PickCount, PickKind, PickOutcome, PickRequest, RandomDecider,
};
use crate::entities::{Data, Store};

/// A running game: state, randomness, and player decisions.
#[derive(Debug)]
pub struct Game {
    store: Store,
    rng: GameRng,
    coordinator: Coordinator,
    config: EngineConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Game {
    /// Create an empty game.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.resolve_seed();
        tracing::debug!(seed, "creating game");
        Self {
            store: Store::new(),
            rng: GameRng::new(seed),
            coordinator: Coordinator::new(config.decision_timeout),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    // === Entities ===

    pub fn create_card(&mut self, name: &str, data: Data, count: usize) -> Result<Vec<String>> {
        self.store.create_card(name, data, count)
    }

    pub fn create_location(&mut self, name: &str, data: Data) -> Result<String> {
        self.store.create_location(name, data)
    }

    pub fn create_player(&mut self, name: &str, decider: impl Decider + 'static, data: Data) -> Result<String> {
        self.store.create_player(name, Arc::new(decider), data)
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.store.players()
    }

    pub fn add_cards<S: AsRef<str>>(&mut self, cards: &[S], location: &str) -> Result<()> {
        self.store.add_cards(cards, location)
    }

    pub fn cards(&self, location: &str) -> Result<&im::Vector<String>> {
        self.store.cards(location)
    }

    pub fn card_count(&self, location: &str) -> Result<usize> {
        self.store.card_count(location)
    }

    pub fn find_card(&self, card: &str) -> Result<Option<&str>> {
        self.store.find_card(card)
    }

    pub fn card_data(&self, card: &str) -> Result<&Data> {
        self.store.card_data(card)
    }

    pub fn location_data(&self, location: &str) -> Result<&Data> {
        self.store.location_data(location)
    }

    pub fn player_data(&self, player: &str) -> Result<&Data> {
        self.store.player_data(player)
    }

    pub fn card_data_mut(&mut self, card: &str) -> Result<&mut Data> {
        self.store.card_data_mut(card)
    }

    pub fn location_data_mut(&mut self, location: &str) -> Result<&mut Data> {
        self.store.location_data_mut(location)
    }

    pub fn player_data_mut(&mut self, player: &str) -> Result<&mut Data> {
        self.store.player_data_mut(player)
    }

    // === Relocation ===

    /// See [`Store::move_from`].
    pub fn move_from(&mut self, from: &str, to: &str, count: i64, from_index: i64, to_index: i64) -> Result<Vec<String>> {
        self.store.move_from(from, to, count, from_index, to_index)
    }

    pub fn move_top(&mut self, from: &str, to: &str, count: i64) -> Result<Vec<String>> {
        self.store.move_top(from, to, count)
    }

    /// See [`Store::move_cards`].
    pub fn move_cards<S: AsRef<str>>(&mut self, cards: &[S], to: &str, count: i64, to_index: i64) -> Result<Vec<String>> {
        self.store.move_cards(cards, to, count, to_index)
    }

    // === Randomness ===

    pub fn shuffle(&mut self, location: &str) -> Result<()> {
        self.store.shuffle_location(location, &mut self.rng)
    }

    pub fn random(&mut self) -> f64 {
        self.rng.random()
    }

    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_int(min, max)
    }

    pub fn random_below(&mut self, n: usize) -> usize {
        self.rng.random_below(n)
    }

    pub fn random_sample<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        self.rng.random_sample(items, k)
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// A [`RandomDecider`] on a stream forked from the engine RNG, so seeded
    /// games stay reproducible when seats are filled with random players.
    pub fn random_decider(&mut self) -> RandomDecider {
        RandomDecider::new(self.rng.fork())
    }

    // === Decisions ===

    /// Offer free-form options to a player.
    pub fn pick<S: AsRef<str>>(&self, player: &str, options: &[S], count: PickCount) -> Result<Pick> {
        self.request(player, PickKind::Options, options, count)
    }

    /// Offer cards to a player. Every option must name a card.
    pub fn pick_cards<S: AsRef<str>>(&self, player: &str, cards: &[S], count: PickCount) -> Result<Pick> {
        for card in cards {
            if !self.store.has_card(card.as_ref()) {
                return Err(GameError::unknown("pick_cards", EntityKind::Card, card.as_ref()));
            }
        }
        self.request(player, PickKind::Cards, cards, count)
    }

    /// Offer locations to a player. Every option must name a location.
    pub fn pick_locations<S: AsRef<str>>(&self, player: &str, locations: &[S], count: PickCount) -> Result<Pick> {
        for location in locations {
            if !self.store.has_location(location.as_ref()) {
                return Err(GameError::unknown("pick_locations", EntityKind::Location, location.as_ref()));
            }
        }
        self.request(player, PickKind::Locations, locations, count)
    }

    /// A pick that asks nobody and resolves as declined.
    #[must_use]
    pub fn pick_nothing(&self) -> Pick {
        Pick::Nothing
    }

    fn request<S: AsRef<str>>(&self, player: &str, kind: PickKind, options: &[S], count: PickCount) -> Result<Pick> {
        if !self.store.has_player(player) {
            return Err(GameError::unknown("pick", EntityKind::Player, player));
        }
        Ok(Pick::Request(PickRequest::new(player, kind, options, count)))
    }

    /// Resolve several picks as one batch.
    ///
    /// Each player named by any pick is asked exactly once. Outcomes come
    /// back in the order the picks were given.
    ///
    /// Picks raised at the same instant by concurrent futures also join the
    /// batch, so sub-routines combined with `tokio::join!` are resolved
    /// together even when each one calls `ask` on its own.
    pub async fn group_picks(&self, picks: Vec<Pick>) -> Result<Vec<PickOutcome>> {
        self.coordinator.resolve(&self.store, picks).await
    }

    /// Resolve a single pick, together with any picks raised concurrently.
    pub async fn ask(&self, pick: Pick) -> Result<PickOutcome> {
        let mut outcomes = self.group_picks(vec![pick]).await?;
        Ok(outcomes.pop().unwrap_or(PickOutcome::Declined))
    }
}
