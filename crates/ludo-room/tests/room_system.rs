//! Integration tests for the room registry and turn relay.
//!
//! Each player gets a real `mpsc` receiver so the tests can assert on
//! exactly which broadcasts reached whom.

use ludo_protocol::{PieceId, PlayerId, RoomCode, ServerEvent};
use ludo_room::{RoomConfig, RoomError, RoomRegistry, ScriptedDice};
use tokio::sync::mpsc;

type Inbox = mpsc::UnboundedReceiver<ServerEvent>;

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn registry_with_rolls(rolls: impl IntoIterator<Item = u8>) -> RoomRegistry {
    RoomRegistry::with_dice(RoomConfig::default(), Box::new(ScriptedDice::new(rolls)))
}

/// Creates a room hosted by player 1 and returns its code and inbox.
fn create(registry: &mut RoomRegistry, name: &str) -> (RoomCode, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    let joined = registry.create(pid(1), name, tx).unwrap();
    (joined.room_id, rx)
}

fn join(registry: &mut RoomRegistry, code: &RoomCode, id: u64, name: &str) -> Result<Inbox, RoomError> {
    let (tx, rx) = mpsc::unbounded_channel();
    registry.join(code, pid(id), name, tx)?;
    Ok(rx)
}

/// Drains everything currently queued in an inbox.
fn drain(inbox: &mut Inbox) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = inbox.try_recv() {
        events.push(event);
    }
    events
}

fn names(registry: &RoomRegistry, code: &RoomCode) -> Vec<String> {
    registry
        .room(code)
        .unwrap()
        .players()
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

// =========================================================================
// Membership
// =========================================================================

#[test]
fn test_create_room_host_is_sole_member() {
    let mut registry = RoomRegistry::default();
    let (code, _inbox) = create(&mut registry, "Alice");

    let room = registry.room(&code).unwrap();
    assert_eq!(room.len(), 1);
    assert_eq!(room.host(), pid(1));
    assert!(!room.is_started());
    assert_eq!(code.as_str().len(), 6);
}

#[test]
fn test_join_counts_match_successful_joins() {
    let mut registry = RoomRegistry::default();
    let (code, _host) = create(&mut registry, "Alice");

    let mut inboxes = Vec::new();
    for id in 2..=4 {
        inboxes.push(join(&mut registry, &code, id, "guest").unwrap());
        assert_eq!(registry.room(&code).unwrap().len() as u64, id);
    }
}

#[test]
fn test_join_missing_room_not_found() {
    let mut registry = RoomRegistry::default();
    let err = join(&mut registry, &RoomCode::from("ZZZZZZ"), 2, "Bob").unwrap_err();
    assert!(matches!(err, RoomError::NotFound(_)));
    assert_eq!(err.to_string(), "Room not found");
}

#[test]
fn test_join_fifth_player_room_full() {
    let mut registry = RoomRegistry::default();
    let (code, _host) = create(&mut registry, "Alice");
    let _inboxes: Vec<Inbox> = (2..=4)
        .map(|id| join(&mut registry, &code, id, "guest").unwrap())
        .collect();

    let err = join(&mut registry, &code, 5, "Eve").unwrap_err();
    assert!(matches!(err, RoomError::RoomFull(_)));
    assert_eq!(registry.room(&code).unwrap().len(), 4);
}

#[test]
fn test_join_lowercase_code_finds_room() {
    let mut registry = RoomRegistry::default();
    let (code, _host) = create(&mut registry, "Alice");
    let typed = RoomCode::from(code.as_str().to_lowercase());
    assert!(join(&mut registry, &typed, 2, "Bob").is_ok());
}

#[test]
fn test_join_broadcasts_player_joined_to_existing_members_only() {
    let mut registry = RoomRegistry::default();
    let (code, mut alice) = create(&mut registry, "Alice");
    let mut bob = join(&mut registry, &code, 2, "Bob").unwrap();

    let events = drain(&mut alice);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::PlayerJoined {
            players,
            player_name,
        } => {
            assert_eq!(player_name, "Bob");
            assert_eq!(players.len(), 2);
            assert_eq!(players[1].id, pid(2));
        }
        other => panic!("expected PlayerJoined, got {other:?}"),
    }
    assert!(drain(&mut bob).is_empty());
}

#[test]
fn test_join_started_game_appends_to_rotation() {
    let mut registry = registry_with_rolls([2]);
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    registry.start_game(&code, pid(1)).unwrap();

    let _c = join(&mut registry, &code, 3, "Cara").unwrap();
    assert_eq!(names(&registry, &code), vec!["Alice", "Bob", "Cara"]);

    registry.roll_dice(&code, pid(1)).unwrap();
    let roll = registry.roll_dice(&code, pid(2)).unwrap();
    assert_eq!(roll.current_player, 2);
}

// =========================================================================
// Leave / disconnect
// =========================================================================

#[test]
fn test_leave_last_member_deletes_room() {
    let mut registry = RoomRegistry::default();
    let (code, _a) = create(&mut registry, "Alice");

    let departure = registry.leave(&code, pid(1)).unwrap();
    assert!(departure.room_closed);
    assert!(registry.room(&code).is_none());
    assert_eq!(registry.room_count(), 0);
    assert!(registry.room_of(pid(1)).is_none());
}

#[test]
fn test_leave_host_reassigns_to_first_remaining() {
    let mut registry = RoomRegistry::default();
    let (code, _a) = create(&mut registry, "Alice");
    let mut bob = join(&mut registry, &code, 2, "Bob").unwrap();
    let _cara = join(&mut registry, &code, 3, "Cara").unwrap();

    registry.leave(&code, pid(1)).unwrap();

    let room = registry.room(&code).unwrap();
    assert_eq!(room.host(), pid(2));
    assert_eq!(names(&registry, &code), vec!["Bob", "Cara"]);

    let events = drain(&mut bob);
    assert!(events.iter().any(|e| matches!(
        e,
        ServerEvent::PlayerLeft { player_name, players, current_player: None }
            if player_name == "Alice" && players.len() == 2
    )));

    // The new host can start.
    assert!(registry.start_game(&code, pid(2)).is_ok());
}

#[test]
fn test_disconnect_mid_game_repairs_turn_index() {
    let mut registry = registry_with_rolls([1]);
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    let mut cara = join(&mut registry, &code, 3, "Cara").unwrap();
    registry.start_game(&code, pid(1)).unwrap();
    registry.roll_dice(&code, pid(1)).unwrap();
    registry.roll_dice(&code, pid(2)).unwrap();
    // Cara (index 2) holds the turn; Alice drops.
    drain(&mut cara);

    registry.disconnect(pid(1)).unwrap();

    let room = registry.room(&code).unwrap();
    assert_eq!(room.current_player(), 1);
    assert_eq!(room.players()[1].name, "Cara");
    let events = drain(&mut cara);
    assert!(matches!(
        events.as_slice(),
        [ServerEvent::PlayerLeft { current_player: Some(1), .. }]
    ));
    assert!(registry.roll_dice(&code, pid(3)).is_ok());
}

#[test]
fn test_disconnect_unknown_player_is_noop() {
    let mut registry = RoomRegistry::default();
    assert!(registry.disconnect(pid(42)).is_none());
}

// =========================================================================
// Turn relay
// =========================================================================

#[test]
fn test_start_game_alone_not_enough_players() {
    let mut registry = RoomRegistry::default();
    let (code, _a) = create(&mut registry, "Alice");
    let err = registry.start_game(&code, pid(1)).unwrap_err();
    assert_eq!(err, RoomError::NotEnoughPlayers(2));
    assert_eq!(err.to_string(), "Need at least 2 players");
}

#[test]
fn test_start_game_from_guest_not_host() {
    let mut registry = RoomRegistry::default();
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    assert_eq!(registry.start_game(&code, pid(2)), Err(RoomError::NotHost));
}

#[test]
fn test_start_game_twice_already_started() {
    let mut registry = RoomRegistry::default();
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    registry.start_game(&code, pid(1)).unwrap();
    assert_eq!(
        registry.start_game(&code, pid(1)),
        Err(RoomError::AlreadyStarted)
    );
}

#[test]
fn test_start_game_missing_room_not_found() {
    let mut registry = RoomRegistry::default();
    let err = registry
        .start_game(&RoomCode::from("NOROOM"), pid(1))
        .unwrap_err();
    assert!(matches!(err, RoomError::NotFound(_)));
}

#[test]
fn test_roll_before_start_not_your_turn() {
    let mut registry = RoomRegistry::default();
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    assert_eq!(
        registry.roll_dice(&code, pid(1)),
        Err(RoomError::NotYourTurn)
    );
}

#[test]
fn test_roll_six_never_advances_turn() {
    let mut registry = registry_with_rolls([6]);
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    registry.start_game(&code, pid(1)).unwrap();

    for _ in 0..5 {
        let roll = registry.roll_dice(&code, pid(1)).unwrap();
        assert_eq!(roll.value, 6);
        assert_eq!(roll.current_player, 0);
    }
}

#[test]
fn test_roll_one_to_five_advances_by_one() {
    let mut registry = registry_with_rolls([1, 2, 3, 4, 5]);
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    let _c = join(&mut registry, &code, 3, "Cara").unwrap();
    registry.start_game(&code, pid(1)).unwrap();

    let order = [1, 2, 3, 1, 2];
    let mut expected = 0;
    for id in order {
        let roll = registry.roll_dice(&code, pid(id)).unwrap();
        expected = (expected + 1) % 3;
        assert_eq!(roll.current_player, expected);
    }
}

#[test]
fn test_roll_six_advances_when_extra_roll_disabled() {
    let config = RoomConfig {
        extra_roll_on_six: false,
        ..RoomConfig::default()
    };
    let mut registry = RoomRegistry::with_dice(config, Box::new(ScriptedDice::new([6])));
    let (code, _a) = create(&mut registry, "Alice");
    let _b = join(&mut registry, &code, 2, "Bob").unwrap();
    registry.start_game(&code, pid(1)).unwrap();

    assert_eq!(registry.roll_dice(&code, pid(1)).unwrap().current_player, 1);
}

#[test]
fn test_move_piece_forwards_to_others_without_validation() {
    let mut registry = RoomRegistry::default();
    let (code, mut alice) = create(&mut registry, "Alice");
    let mut bob = join(&mut registry, &code, 2, "Bob").unwrap();
    drain(&mut alice);

    // Not started and not Bob's turn: still forwarded.
    registry.move_piece(&code, pid(2), PieceId(7)).unwrap();

    assert_eq!(
        drain(&mut alice),
        vec![ServerEvent::PieceMoved {
            player_id: pid(2),
            piece_id: PieceId(7),
            player_name: Some("Bob".into()),
        }]
    );
    assert!(drain(&mut bob).is_empty());
}

#[test]
fn test_move_piece_from_non_member_has_no_name() {
    let mut registry = RoomRegistry::default();
    let (code, mut alice) = create(&mut registry, "Alice");
    registry.move_piece(&code, pid(9), PieceId(1)).unwrap();
    assert!(matches!(
        drain(&mut alice).as_slice(),
        [ServerEvent::PieceMoved { player_name: None, .. }]
    ));
}

#[test]
fn test_move_piece_missing_room_not_found() {
    let mut registry = RoomRegistry::default();
    assert!(matches!(
        registry.move_piece(&RoomCode::from("GONE00"), pid(1), PieceId(0)),
        Err(RoomError::NotFound(_))
    ));
}

// =========================================================================
// Full scenario
// =========================================================================

#[test]
fn test_two_player_game_scenario() {
    let mut registry = registry_with_rolls([6, 3]);
    let (code, mut alice) = create(&mut registry, "Alice");
    assert_eq!(names(&registry, &code), vec!["Alice"]);

    let mut bob = join(&mut registry, &code, 2, "Bob").unwrap();
    assert_eq!(names(&registry, &code), vec!["Alice", "Bob"]);
    assert!(matches!(
        drain(&mut alice).as_slice(),
        [ServerEvent::PlayerJoined { .. }]
    ));

    registry.start_game(&code, pid(1)).unwrap();
    for inbox in [&mut alice, &mut bob] {
        assert!(matches!(
            drain(inbox).as_slice(),
            [ServerEvent::GameStarted { current_player: 0, players }] if players.len() == 2
        ));
    }

    registry.roll_dice(&code, pid(1)).unwrap();
    registry.roll_dice(&code, pid(1)).unwrap();
    let expected = vec![
        ServerEvent::DiceRolled {
            value: 6,
            player_id: pid(1),
            player_name: "Alice".into(),
            current_player: 0,
        },
        ServerEvent::DiceRolled {
            value: 3,
            player_id: pid(1),
            player_name: "Alice".into(),
            current_player: 1,
        },
    ];
    assert_eq!(drain(&mut alice), expected);
    assert_eq!(drain(&mut bob), expected);

    assert_eq!(
        registry.roll_dice(&code, pid(1)),
        Err(RoomError::NotYourTurn)
    );
}
