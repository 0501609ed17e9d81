use holdem_engine::deck::{shuffled, standard_deck};
use holdem_engine::engine::Engine;
use holdem_engine::errors::GameError;
use holdem_engine::event::GameEvent;
use holdem_engine::game::{GameOptions, GameState};

fn options(seed: u64) -> GameOptions {
    let mut options = GameOptions::standard().with_seats(3, 1_000);
    options.deck = shuffled(standard_deck(), seed);
    options
}

#[test]
fn calls_return_new_snapshots_and_leave_input_alone() {
    let engine = Engine::new();
    let created = engine.create_game(options(11)).unwrap();
    let copy = created.clone();
    let ready = engine.ready_for_all(&created).unwrap();
    assert_eq!(created, copy);
    assert_eq!(ready.status.current_event, GameEvent::BlindsRequested);

    let blinds = engine.pay_blinds(&ready).unwrap();
    let started = engine.ready_for_all(&blinds).unwrap();
    assert_eq!(started.status.current_event, GameEvent::RoundStarted);

    let err = engine.check(&started, 0).unwrap_err();
    assert!(matches!(err, GameError::InvalidAction { seat: 0, .. }));
    let after_call = engine.call(&started, 0).unwrap();
    assert_eq!(after_call.players[0].wager, 10);
    assert_eq!(started.players[0].wager, 0);
}

#[test]
fn same_deck_same_hole_cards() {
    let engine = Engine::new();
    let a = engine.ready_for_all(&engine.create_game(options(5)).unwrap()).unwrap();
    let b = engine.ready_for_all(&engine.create_game(options(5)).unwrap()).unwrap();
    assert_ne!(a.game_id, b.game_id);
    for (pa, pb) in a.players.iter().zip(&b.players) {
        assert_eq!(pa.hole_cards, pb.hole_cards);
    }
}

#[test]
fn snapshot_json_uses_contract_field_names() {
    let engine = Engine::new();
    let state = engine.create_game(options(1)).unwrap();
    let value = serde_json::to_value(&state).unwrap();
    for key in ["game_id", "created_at", "updated_at", "meta", "status", "players", "result"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["status"]["current_event"], "ReadyRequested");
    assert_eq!(value["players"][0]["positions"][0], "dealer");
    assert_eq!(value["players"][0]["allowed_actions"][0], "ready");
    assert_eq!(value["meta"]["limit"], "no");
    assert_eq!(value["meta"]["deck"][0].as_str().unwrap().len(), 2);

    let back: GameState = serde_json::from_value(value).unwrap();
    assert_eq!(back, state);
    let resumed = engine.ready_for_all(&back).unwrap();
    assert_eq!(resumed.status.current_event, GameEvent::BlindsRequested);
}

#[test]
fn snapshot_survives_a_round_trip_mid_hand() {
    let engine = Engine::new();
    let mut state = engine.create_game(options(9)).unwrap();
    state = engine.ready_for_all(&state).unwrap();
    state = engine.pay_blinds(&state).unwrap();
    state = engine.ready_for_all(&state).unwrap();
    state = engine.raise(&state, 0, 40).unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let back: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    let next = engine.call(&back, 1).unwrap();
    assert_eq!(next.players[1].wager, 40);
    assert_eq!(engine.next(&back).unwrap_err(), GameError::RoundNotClosed(GameEvent::RoundStarted));
}
