//! Decision coordination: asking players to choose.
//!
//! Rules programs build [`Pick`]s, hand any number of them to one
//! `group_picks` call, and get one [`PickOutcome`] per pick back. Within that
//! call each player is asked exactly once, however many picks name them, and
//! their single [`Answer`] is checked against each of their picks
//! independently.
//!
//! ## Key Types
//!
//! - `PickCount`: Cardinality constraint
//! - `PickRequest` / `Pick`: One offer of options, or a placeholder
//! - `PickOutcome`: Chosen, declined, or rejected
//! - `Decider`: Player-supplied decision function
//! - `Coordinator`: Batch barrier and reconciliation

pub mod coordinator;
pub mod count;
pub mod decider;
pub mod request;

pub use coordinator::Coordinator;
pub use count::PickCount;
pub use decider::{Decider, DeclineDecider, FnDecider, GameView, RandomDecider};
pub use request::{Answer, Condition, Pick, PickKind, PickOutcome, PickRequest};
