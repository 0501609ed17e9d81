use holdem_engine::combination::CombinationPowers;
use holdem_engine::deck::{shuffled, standard_deck};
use holdem_engine::errors::{ErrorClass, GameError};
use holdem_engine::game::{Game, GameOptions};
use holdem_engine::player::Position;

fn fatal(options: GameOptions) -> GameError {
    let err = Game::new(options).err().expect("options must be rejected");
    assert_eq!(err.class(), ErrorClass::Fatal, "{err}");
    assert!(!err.is_retryable());
    err
}

#[test]
fn rejects_structural_misconfiguration() {
    assert_eq!(
        fatal(GameOptions::standard().with_seats(1, 100)),
        GameError::InsufficientPlayers(1)
    );

    let mut no_dealer = GameOptions::standard().with_seats(3, 100);
    no_dealer.players[0].positions = vec![Position::Ug];
    assert_eq!(fatal(no_dealer), GameError::NoDealer);

    let mut empty = GameOptions::standard().with_seats(2, 100);
    empty.deck.clear();
    assert_eq!(fatal(empty), GameError::EmptyDeck);

    let mut thin = GameOptions::standard().with_seats(2, 100);
    thin.deck.truncate(10);
    assert_eq!(
        fatal(thin),
        GameError::InsufficientCards {
            needed: 12,
            available: 10
        }
    );

    let mut broke = GameOptions::standard().with_seats(2, 100);
    broke.players[1].bankroll = 0;
    assert_eq!(fatal(broke), GameError::InvalidBankroll { seat: 1, bankroll: 0 });
}

#[test]
fn rejects_inconsistent_option_values() {
    let mut omaha = GameOptions::standard().with_seats(2, 100);
    omaha.required_hole_cards_count = 3;
    assert!(matches!(fatal(omaha), GameError::InvalidOptions(_)));

    let mut two_dealers = GameOptions::standard().with_seats(2, 100);
    two_dealers.players[1].positions.push(Position::Dealer);
    assert!(matches!(fatal(two_dealers), GameError::InvalidOptions(_)));

    let mut negative = GameOptions::standard().with_seats(2, 100);
    negative.ante = -1;
    assert!(matches!(fatal(negative), GameError::InvalidOptions(_)));

    let mut doubled = GameOptions::standard().with_seats(2, 100);
    doubled.deck[1] = doubled.deck[0];
    assert!(matches!(fatal(doubled), GameError::InvalidOptions(_)));
}

#[test]
fn options_deserialize_from_json() {
    let json = serde_json::json!({
        "ante": 0,
        "blind": {"dealer": 0, "sb": 1, "bb": 2},
        "limit": "pot",
        "hole_cards_count": 4,
        "required_hole_cards_count": 2,
        "combination_powers": [
            "StraightFlush", "FourOfAKind", "FullHouse", "Flush", "Straight",
            "ThreeOfAKind", "TwoPair", "Pair", "HighCard"
        ],
        "deck": shuffled(standard_deck(), 3),
        "burn_count": 1,
        "players": [
            {"bankroll": 200, "positions": ["dealer", "sb"]},
            {"bankroll": 200, "positions": ["bb"]}
        ]
    });
    let options: GameOptions = serde_json::from_value(json).unwrap();
    let mut game = Game::new(options).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    assert_eq!(game.state().players[0].hole_cards.len(), 4);

    let bad = serde_json::json!(["Pair", "Pair"]);
    assert!(serde_json::from_value::<CombinationPowers>(bad).is_err());
}
