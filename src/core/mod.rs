//! Core engine types: errors, configuration, RNG.
//!
//! These are game-agnostic building blocks shared by the entity store and
//! the decision coordinator.

pub mod config;
pub mod error;
pub mod rng;

pub use config::EngineConfig;
pub use error::{DecisionFailure, EntityKind, GameError, Result};
pub use rng::{GameRng, GameRngState};
