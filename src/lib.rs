//! # tabletop-engine
//!
//! A generic engine for turn-based card and board games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded zones, card types, or phases. A rules
//!    program creates the cards, locations, and players it needs by name.
//!
//! 2. **Batched Decisions**: Picks raised together are resolved together.
//!    Each player is asked once per batch, with every request pending for
//!    them, and all answers arrive before any pick resolves.
//!
//! 3. **Reproducible**: All engine randomness flows from one seeded stream.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The store is built on `im`, so deciders
//!   receive an O(1) snapshot instead of a borrow of live state.
//!
//! - **Async Deciders**: Each player is bound to a [`Decider`]. A batch
//!   fans out to one task per player on the tokio runtime.
//!
//! ## Modules
//!
//! - `core`: Errors, configuration, RNG
//! - `entities`: Cards, locations, players, and their data
//! - `zones`: Moving and shuffling cards between locations
//! - `chain`: Circular turn order
//! - `decision`: Picks, deciders, and the batch coordinator
//! - `game`: The facade a rules program drives

pub mod core;
pub mod entities;
pub mod zones;
pub mod chain;
pub mod decision;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig,
    DecisionFailure, EntityKind, GameError, Result,
    GameRng, GameRngState,
};

pub use crate::entities::{Data, DataValue, Store};

pub use crate::chain::Chain;

pub use crate::decision::{
    Coordinator,
    Decider, DeclineDecider, FnDecider, GameView, RandomDecider,
    Answer, Condition, Pick, PickCount, PickKind, PickOutcome, PickRequest,
};

pub use crate::game::Game;
