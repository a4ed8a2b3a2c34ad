//! Engine error types.
//!
//! Every variant here is fatal for the rules program that triggered it: they
//! signal a programming error (bad names, broken placement) or a decider that
//! failed outright. A participant giving an unusable answer is *not* an error;
//! see [`PickOutcome`](crate::decision::PickOutcome).

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

/// The kind of record a name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Card,
    Location,
    Player,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Card => "card",
            EntityKind::Location => "location",
            EntityKind::Player => "player",
        };
        write!(f, "{}", label)
    }
}

/// Decider failure carried by [`GameError::Decision`].
///
/// Shared so that every pick waiting on a failed batch receives the same
/// error.
pub type DecisionFailure = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal engine errors. Each message starts with the operation that failed.
#[derive(Clone, Debug, Error)]
pub enum GameError {
    #[error("{op}: name '{name}' is already used by a {existing}")]
    DuplicateName {
        op: &'static str,
        name: String,
        existing: EntityKind,
    },

    #[error("{op}: unknown {kind} '{name}'")]
    UnknownEntity {
        op: &'static str,
        kind: EntityKind,
        name: String,
    },

    #[error("add_cards: card '{card}' is already at location '{location}'")]
    AlreadyPlaced { card: String, location: String },

    #[error("add_cards: card '{card}' is listed more than once")]
    DuplicateCard { card: String },

    #[error("move_cards: card '{card}' is not at any location or is listed more than once")]
    CardNotFound { card: String },

    /// A card and a location disagree about where the card is.
    #[error("check_placement: card '{card}' and location '{location}' disagree on placement")]
    PlacementMismatch { card: String, location: String },

    #[error("group_picks: decision function for player '{player}' failed")]
    Decision {
        player: String,
        #[source]
        source: DecisionFailure,
    },

    #[error("group_picks: decision function for player '{player}' panicked")]
    DecisionPanicked { player: String },

    /// The task driving a batch was dropped before the batch resolved.
    #[error("group_picks: batch was abandoned before it resolved")]
    BatchAbandoned,
}

impl GameError {
    pub(crate) fn unknown(op: &'static str, kind: EntityKind, name: impl Into<String>) -> Self {
        GameError::UnknownEntity {
            op,
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn decision(player: impl Into<String>, source: anyhow::Error) -> Self {
        let source: Box<dyn std::error::Error + Send + Sync + 'static> = source.into();
        GameError::Decision {
            player: player.into(),
            source: Arc::from(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_operation_and_entity() {
        let err = GameError::DuplicateName {
            op: "create_location",
            name: "deck".into(),
            existing: EntityKind::Location,
        };
        assert_eq!(err.to_string(), "create_location: name 'deck' is already used by a location");

        let err = GameError::unknown("player_data", EntityKind::Player, "Zed");
        assert_eq!(err.to_string(), "player_data: unknown player 'Zed'");

        let err = GameError::PlacementMismatch {
            card: "a".into(),
            location: "X".into(),
        };
        assert_eq!(
            err.to_string(),
            "check_placement: card 'a' and location 'X' disagree on placement"
        );
    }

    #[test]
    fn test_decision_error_keeps_source() {
        use std::error::Error as _;

        let err = GameError::decision("A", anyhow::anyhow!("input closed"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("input closed".into()));

        let copy = err.clone();
        assert_eq!(copy.to_string(), "group_picks: decision function for player 'A' failed");
        assert_eq!(copy.source().map(|s| s.to_string()), Some("input closed".into()));
    }
}
