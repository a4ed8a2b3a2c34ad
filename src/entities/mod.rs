//! Entity store for cards, locations, and players.
//!
//! ## Key Types
//!
//! - `Store`: Named records and card placement
//! - `Data`: Opaque per-entity payload map
//! - `DataValue`: A single payload value

pub mod data;
pub mod store;

pub use data::{Data, DataValue};
pub use store::Store;
