use holdem_engine::errors::GameError;
use holdem_engine::event::GameEvent;
use holdem_engine::game::{default_positions, Blind, Game, GameOptions, PlayerSetting};
use holdem_engine::player::ActionKind;

fn short_small_blind() -> Game {
    let mut options = GameOptions::standard();
    options.ante = 5;
    options.blind = Blind {
        dealer: 0,
        sb: 10,
        bb: 20,
    };
    options.players = [10_000, 15, 10_000]
        .iter()
        .enumerate()
        .map(|(seat, &bankroll)| PlayerSetting {
            bankroll,
            positions: default_positions(3, seat),
        })
        .collect();
    let mut game = Game::new(options).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    game
}

#[test]
fn ante_is_collected_into_the_pot() {
    let mut game = short_small_blind();
    assert_eq!(game.current_event(), GameEvent::AnteRequested);
    assert!(game.state().players.iter().all(|p| p.allowed_actions == vec![ActionKind::Pay]));
    game.pay_ante().unwrap();
    let state = game.state();
    assert_eq!(state.status.current_event, GameEvent::BlindsRequested);
    assert!(state.players.iter().all(|p| p.pot == 5));
    assert_eq!(state.pot_total(), 15);
}

#[test]
fn short_blind_pays_its_whole_stack_and_then_only_passes() {
    let mut game = short_small_blind();
    game.pay_ante().unwrap();
    assert_eq!(game.owed_by(1), Some(10));

    let before = game.state().clone();
    assert_eq!(
        game.pay(1, 5).unwrap_err(),
        GameError::InvalidPayment {
            expected: 10,
            actual: 5
        }
    );
    assert_eq!(game.state(), &before);

    game.pay(1, 10).unwrap();
    game.pay(2, 20).unwrap();
    let state = game.state();
    assert_eq!(state.status.current_event, GameEvent::ReadyRequested);
    assert_eq!(state.players[1].stack_size, 0);
    assert_eq!(state.players[1].allowed_actions, vec![ActionKind::Pass]);
    assert_eq!(
        game.ready(1).unwrap_err(),
        GameError::InvalidAction {
            seat: 1,
            action: ActionKind::Ready
        }
    );

    game.pass(1).unwrap();
    game.ready(0).unwrap();
    assert_eq!(game.current_event(), GameEvent::ReadyRequested);
    game.ready(2).unwrap();
    assert_eq!(game.current_event(), GameEvent::RoundStarted);
    // the all-in seat is skipped by the turn order
    assert_eq!(game.state().status.current_player, 0);
    game.call(0).unwrap();
    assert_eq!(game.state().status.current_player, 2);
    game.check(2).unwrap();
    assert_eq!(game.current_event(), GameEvent::RoundClosed);
}

#[test]
fn lone_big_blind_is_posted_without_a_task() {
    let mut options = GameOptions::standard().with_seats(3, 1_000);
    options.blind = Blind {
        dealer: 0,
        sb: 0,
        bb: 10,
    };
    let mut game = Game::new(options).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    let state = game.state();
    assert_eq!(state.status.current_event, GameEvent::ReadyRequested);
    assert_eq!(state.players[2].wager, 10);
    assert_eq!(state.status.current_wager, 10);
    assert_eq!(state.status.current_raiser, 2);
}

#[test]
fn no_blinds_skips_straight_to_readiness() {
    let mut options = GameOptions::standard().with_seats(2, 1_000);
    options.blind = Blind::default();
    let mut game = Game::new(options).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    assert_eq!(game.current_event(), GameEvent::ReadyRequested);
    assert!(game.state().players.iter().all(|p| p.wager == 0));
    game.ready_for_all().unwrap();
    assert_eq!(game.current_event(), GameEvent::RoundStarted);
    // with no blind and no ante the minimum bet falls back to one chip
    assert_eq!(game.state().status.mini_bet, 1);
}
