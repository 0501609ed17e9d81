use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::combination::Category;
use holdem_engine::deck::standard_deck;
use holdem_engine::event::GameEvent;
use holdem_engine::game::{Game, GameOptions};

/// Stacks the deck: hole cards go out one at a time starting left of the
/// dealer (seat 1, 2, 0, 1, 2, 0), then burn + flop, burn + turn, burn + river.
fn stacked_deck() -> Vec<Card> {
    let top = parse_cards(
        "DT H3 CT D5 H4 C6 \
         C2 HA DK CQ \
         C3 SJ \
         C4 S2",
    )
    .unwrap();
    let mut deck = top.clone();
    deck.extend(standard_deck().into_iter().filter(|c| !top.contains(c)));
    deck
}

#[test]
fn tied_straights_split_with_the_odd_chip_to_the_lower_seat() {
    let mut options = GameOptions::standard().with_seats(3, 10_000);
    options.deck = stacked_deck();
    let mut game = Game::new(options).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    game.pay_blinds().unwrap();
    game.ready_for_all().unwrap();

    game.raise(0, 1_111).unwrap();
    game.call(1).unwrap();
    game.call(2).unwrap();
    assert_eq!(game.state().pot_total(), 3_333);

    while game.current_event() != GameEvent::GameClosed {
        if game.current_event() == GameEvent::RoundClosed {
            game.next().unwrap();
            continue;
        }
        let seat = game.state().status.current_player;
        game.check(seat).unwrap();
    }

    let state = game.state();
    assert_eq!(state.status.board, parse_cards("HA DK CQ SJ S2").unwrap());
    let categories: Vec<Category> = state
        .players
        .iter()
        .map(|p| p.combination.as_ref().unwrap().category)
        .collect();
    assert_eq!(categories, vec![Category::Straight, Category::Straight, Category::HighCard]);

    let result = state.result.as_ref().unwrap();
    let finals: Vec<i64> = result.players.iter().map(|p| p.final_bankroll).collect();
    assert_eq!(finals, vec![10_556, 10_555, 8_889]);
    let changed: Vec<i64> = result.players.iter().map(|p| p.changed).collect();
    assert_eq!(changed, vec![556, 555, -1_111]);
    let withdrawn: Vec<(usize, i64)> = result.pots[0]
        .winners
        .iter()
        .map(|w| (w.idx, w.withdraw))
        .collect();
    assert_eq!(withdrawn, vec![(0, 1_667), (1, 1_666)]);
}

#[test]
fn settlement_result_serializes_with_final_key() {
    let mut game = Game::new(GameOptions::standard().with_seats(2, 500)).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    game.pay_blinds().unwrap();
    game.ready_for_all().unwrap();
    game.fold(0).unwrap();

    let json = serde_json::to_value(game.state().result.as_ref().unwrap()).unwrap();
    assert_eq!(json["players"][1]["final"], 505);
    assert_eq!(json["players"][1]["changed"], 5);
    assert_eq!(json["pots"][0]["winners"][0]["idx"], 1);
}
