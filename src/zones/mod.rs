//! Relocation primitives.
//!
//! Locations are plain ordered sequences owned by the [`Store`]. This module
//! adds the only operations allowed to move placed cards: positional moves
//! (`move_from`, `move_top`), named moves (`move_cards`), and shuffling.
//!
//! [`Store`]: crate::entities::Store

pub mod movement;
