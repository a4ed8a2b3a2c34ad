//! Entity store and relocation tests.
//!
//! These tests drive the store through the `Game` facade the way a rules
//! program would, and check that card placement stays consistent under
//! arbitrary sequences of moves.

use proptest::prelude::*;
use tabletop_engine::{Data, DataValue, DeclineDecider, EngineConfig, EntityKind, Game, GameError};

fn names(game: &Game, location: &str) -> Vec<String> {
    game.cards(location).unwrap().iter().cloned().collect()
}

/// Test that players are listed in creation order with their data.
#[test]
fn test_players() {
    let mut game = Game::default();
    assert_eq!(game.players().count(), 0);

    game.create_player("a", DeclineDecider, Data::new()).unwrap();
    game.create_player("b", DeclineDecider, Data::new().with("height", 1)).unwrap();
    game.create_player("c", DeclineDecider, Data::new().with("age", 5)).unwrap();

    assert_eq!(game.players().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(game.player_data("b").unwrap().int("height"), Some(1));
    assert_eq!(game.player_data("c").unwrap().int("age"), Some(5));
    assert!(game.player_data("a").unwrap().is_empty());

    let err = game.create_player("a", DeclineDecider, Data::new()).unwrap_err();
    assert!(matches!(err, GameError::DuplicateName { existing: EntityKind::Player, .. }));
}

/// Test location and card creation with payloads.
#[test]
fn test_locations_and_cards() {
    let mut game = Game::default();
    game.create_location("a", Data::new()).unwrap();
    game.create_location("b", Data::new().with("big", true)).unwrap();
    game.create_card("ace", Data::new().with("suit", "hearts"), 1).unwrap();

    assert!(game.location_data("a").unwrap().is_empty());
    assert_eq!(game.location_data("b").unwrap().flag("big"), Some(true));
    assert_eq!(game.card_data("ace").unwrap().text("suit"), Some("hearts"));
    assert_eq!(game.find_card("ace").unwrap(), None);

    assert!(game.create_location("a", Data::new()).is_err());
    assert!(game.create_card("ace", Data::new(), 1).is_err());
}

/// Test that data stays mutable through the facade.
#[test]
fn test_data_updates() {
    let mut game = Game::default();
    game.create_card("gold", Data::new().with("value", 3), 1).unwrap();

    let previous = game.card_data_mut("gold").unwrap().set("value", 4);
    assert_eq!(previous, Some(DataValue::Int(3)));
    assert_eq!(game.card_data("gold").unwrap().int("value"), Some(4));

    game.create_location("trash", Data::new()).unwrap();
    game.location_data_mut("trash")
        .unwrap()
        .set("seen", vec!["gold"]);
    assert_eq!(
        game.location_data("trash").unwrap().text_list("seen"),
        Some(&["gold".to_string()][..])
    );
}

/// Test that names are unique across cards, locations, and players.
#[test]
fn test_names_shared_across_kinds() {
    let mut game = Game::default();
    game.create_location("A", Data::new()).unwrap();
    game.create_card("a", Data::new(), 1).unwrap();

    let err = game.create_card("A", Data::new(), 1).unwrap_err();
    assert!(matches!(err, GameError::DuplicateName { existing: EntityKind::Location, .. }));

    let err = game.create_location("a", Data::new()).unwrap_err();
    assert!(matches!(err, GameError::DuplicateName { existing: EntityKind::Card, .. }));

    let err = game.create_player("a", DeclineDecider, Data::new()).unwrap_err();
    assert!(matches!(err, GameError::DuplicateName { existing: EntityKind::Card, .. }));
}

/// Test placing cards and the errors for re-placing them.
#[test]
fn test_add_cards() {
    let mut game = Game::default();
    game.create_location("A", Data::new()).unwrap();
    game.create_location("B", Data::new()).unwrap();
    for card in ["a", "b", "c", "d"] {
        game.create_card(card, Data::new(), 1).unwrap();
    }

    game.add_cards(&["a"], "A").unwrap();
    game.add_cards(&["b"], "A").unwrap();
    game.add_cards(&["c", "d"], "B").unwrap();

    let err = game.add_cards(&["c"], "A").unwrap_err();
    assert!(matches!(err, GameError::AlreadyPlaced { ref location, .. } if location == "B"));

    assert_eq!(names(&game, "A"), vec!["a", "b"]);
    assert_eq!(names(&game, "B"), vec!["c", "d"]);
    assert_eq!(game.card_count("A").unwrap(), 2);
    assert_eq!(game.find_card("d").unwrap(), Some("B"));
}

/// Test that a failed placement leaves the store untouched.
#[test]
fn test_add_cards_is_atomic() {
    let mut game = Game::default();
    game.create_location("A", Data::new()).unwrap();
    game.create_card("a", Data::new(), 1).unwrap();
    game.create_card("b", Data::new(), 1).unwrap();

    assert!(matches!(
        game.add_cards(&["a", "ghost"], "A"),
        Err(GameError::UnknownEntity { kind: EntityKind::Card, .. })
    ));
    assert!(matches!(
        game.add_cards(&["a", "b", "a"], "A"),
        Err(GameError::DuplicateCard { .. })
    ));
    assert!(matches!(
        game.add_cards(&["a"], "nowhere"),
        Err(GameError::UnknownEntity { kind: EntityKind::Location, .. })
    ));

    assert_eq!(game.card_count("A").unwrap(), 0);
    assert_eq!(game.find_card("a").unwrap(), None);
}

/// Test unknown names are reported with their kind.
#[test]
fn test_unknown_names() {
    let game = Game::default();
    assert!(matches!(
        game.cards("nowhere"),
        Err(GameError::UnknownEntity { kind: EntityKind::Location, .. })
    ));
    assert!(matches!(
        game.find_card("ghost"),
        Err(GameError::UnknownEntity { kind: EntityKind::Card, .. })
    ));
    assert!(matches!(
        game.player_data("nobody"),
        Err(GameError::UnknownEntity { kind: EntityKind::Player, .. })
    ));
}

/// Test dealing a shuffled deck into hands, as a setup phase would.
#[test]
fn test_deal_from_shuffled_deck() {
    let mut game = Game::new(EngineConfig::new().with_seed(2024));
    game.create_location("deck", Data::new()).unwrap();
    for player in ["p1", "p2", "p3"] {
        game.create_player(player, DeclineDecider, Data::new()).unwrap();
        game.create_location(&format!("{player}-hand"), Data::new()).unwrap();
    }
    let copper = game.create_card("copper", Data::new().with("value", 1), 7).unwrap();
    let estate = game.create_card("estate", Data::new().with("points", 1), 3).unwrap();
    game.add_cards(&copper, "deck").unwrap();
    game.add_cards(&estate, "deck").unwrap();
    game.shuffle("deck").unwrap();

    let players: Vec<String> = game.players().map(str::to_string).collect();
    for player in &players {
        let moved = game.move_top("deck", &format!("{player}-hand"), 3).unwrap();
        assert_eq!(moved.len(), 3);
    }

    assert_eq!(game.card_count("deck").unwrap(), 1);
    assert_eq!(game.store().total_cards(), 10);
    game.store().check_placement().unwrap();
}

#[derive(Clone, Debug)]
enum Op {
    Move { from: usize, to: usize, count: i64, from_index: i64, to_index: i64 },
    MoveCards { picks: Vec<usize>, to: usize, count: i64, to_index: i64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..3usize, -1i64..5, -6i64..6, -6i64..6).prop_map(
            |(from, to, count, from_index, to_index)| Op::Move { from, to, count, from_index, to_index }
        ),
        (prop::collection::vec(0..12usize, 0..5), 0..3usize, -1i64..5, -6i64..6).prop_map(
            |(picks, to, count, to_index)| Op::MoveCards { picks, to, count, to_index }
        ),
    ]
}

proptest! {
    /// Any sequence of moves conserves cards and keeps placement consistent.
    #[test]
    fn test_moves_conserve_cards(ops in prop::collection::vec(op(), 0..40)) {
        const LOCATIONS: [&str; 3] = ["X", "Y", "Z"];

        let mut game = Game::default();
        for location in LOCATIONS {
            game.create_location(location, Data::new()).unwrap();
        }
        let cards = game.create_card("card", Data::new(), 12).unwrap();
        game.add_cards(&cards[..6], "X").unwrap();
        game.add_cards(&cards[6..], "Y").unwrap();

        for op in ops {
            match op {
                Op::Move { from, to, count, from_index, to_index } => {
                    let available = game.card_count(LOCATIONS[from]).unwrap();
                    let moved = game
                        .move_from(LOCATIONS[from], LOCATIONS[to], count, from_index, to_index)
                        .unwrap();
                    let expected = if count < 0 { available } else { (count as usize).min(available) };
                    prop_assert_eq!(moved.len(), expected);
                    for card in &moved {
                        prop_assert_eq!(game.find_card(card).unwrap(), Some(LOCATIONS[to]));
                    }
                }
                Op::MoveCards { picks, to, count, to_index } => {
                    let mut listed: Vec<String> = Vec::new();
                    for i in picks {
                        if !listed.contains(&cards[i]) {
                            listed.push(cards[i].clone());
                        }
                    }
                    let moved = game.move_cards(&listed, LOCATIONS[to], count, to_index).unwrap();
                    let expected = if count < 0 { listed.len() } else { (count as usize).min(listed.len()) };
                    prop_assert_eq!(&moved[..], &listed[..expected]);
                }
            }

            let total: usize = LOCATIONS.iter().map(|l| game.card_count(l).unwrap()).sum();
            prop_assert_eq!(total, 12);
            prop_assert!(game.store().check_placement().is_ok());
        }
    }

    /// Moving everything out and straight back restores the original order.
    #[test]
    fn test_move_top_round_trip(n in 0usize..10) {
        let mut game = Game::default();
        game.create_location("A", Data::new()).unwrap();
        game.create_location("B", Data::new()).unwrap();
        let cards = game.create_card("c", Data::new(), n).unwrap();
        game.add_cards(&cards, "A").unwrap();

        game.move_top("A", "B", -1).unwrap();
        game.move_top("B", "A", -1).unwrap();
        prop_assert_eq!(names(&game, "A"), cards);
    }
}
