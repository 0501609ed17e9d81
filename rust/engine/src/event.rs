//! Phase events and betting rounds.
//!
//! Consumers outside the engine compare `status.current_event` against the
//! tokens returned by [`GameEvent::as_str`], so these strings are part of
//! the serialized contract. Internal dispatch matches on the enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum GameEvent {
    Started,
    Initialized,
    Prepared,
    AnteRequested,
    AntePaid,
    BlindsRequested,
    BlindsPaid,
    ReadyRequested,
    Readiness,
    PreflopRoundEntered,
    FlopRoundEntered,
    TurnRoundEntered,
    RiverRoundEntered,
    RoundInitialized,
    RoundPrepared,
    RoundStarted,
    RoundClosed,
    GameCompleted,
    SettlementRequested,
    SettlementCompleted,
    GameClosed,
}

const EVENT_TOKENS: [(GameEvent, &str); 21] = [
    (GameEvent::Started, "Started"),
    (GameEvent::Initialized, "Initialized"),
    (GameEvent::Prepared, "Prepared"),
    (GameEvent::AnteRequested, "AnteRequested"),
    (GameEvent::AntePaid, "AntePaid"),
    (GameEvent::BlindsRequested, "BlindsRequested"),
    (GameEvent::BlindsPaid, "BlindsPaid"),
    (GameEvent::ReadyRequested, "ReadyRequested"),
    (GameEvent::Readiness, "Readiness"),
    (GameEvent::PreflopRoundEntered, "PreflopRoundEntered"),
    (GameEvent::FlopRoundEntered, "FlopRoundEntered"),
    (GameEvent::TurnRoundEntered, "TurnRoundEntered"),
    (GameEvent::RiverRoundEntered, "RiverRoundEntered"),
    (GameEvent::RoundInitialized, "RoundInitialized"),
    (GameEvent::RoundPrepared, "RoundPrepared"),
    (GameEvent::RoundStarted, "RoundStarted"),
    (GameEvent::RoundClosed, "RoundClosed"),
    (GameEvent::GameCompleted, "GameCompleted"),
    (GameEvent::SettlementRequested, "SettlementRequested"),
    (GameEvent::SettlementCompleted, "SettlementCompleted"),
    (GameEvent::GameClosed, "GameClosed"),
];

impl GameEvent {
    pub fn as_str(self) -> &'static str {
        EVENT_TOKENS
            .iter()
            .find(|(e, _)| *e == self)
            .map(|(_, token)| *token)
            .unwrap_or("Unknown")
    }

    /// The round-entry event for `round`.
    pub fn round_entered(round: Round) -> GameEvent {
        match round {
            Round::Preflop => GameEvent::PreflopRoundEntered,
            Round::Flop => GameEvent::FlopRoundEntered,
            Round::Turn => GameEvent::TurnRoundEntered,
            Round::River => GameEvent::RiverRoundEntered,
        }
    }

    /// Events at which the hand waits for an external call.
    pub fn is_waiting_point(self) -> bool {
        matches!(
            self,
            GameEvent::ReadyRequested
                | GameEvent::AnteRequested
                | GameEvent::BlindsRequested
                | GameEvent::RoundStarted
                | GameEvent::RoundClosed
                | GameEvent::GameClosed
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GameEvent> for &'static str {
    fn from(event: GameEvent) -> Self {
        event.as_str()
    }
}

impl FromStr for GameEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EVENT_TOKENS
            .iter()
            .find(|(_, token)| *token == s)
            .map(|(e, _)| *e)
            .ok_or_else(|| format!("unknown event {s:?}"))
    }
}

impl TryFrom<String> for GameEvent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A betting round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Round {
    pub fn next(self) -> Option<Round> {
        match self {
            Round::Preflop => Some(Round::Flop),
            Round::Flop => Some(Round::Turn),
            Round::Turn => Some(Round::River),
            Round::River => None,
        }
    }

    /// Board cards dealt when the round is entered.
    pub fn board_cards(self) -> usize {
        match self {
            Round::Preflop => 0,
            Round::Flop => 3,
            Round::Turn | Round::River => 1,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Round::Preflop => "preflop",
            Round::Flop => "flop",
            Round::Turn => "turn",
            Round::River => "river",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_token_round_trips() {
        for (event, token) in EVENT_TOKENS {
            assert_eq!(event.as_str(), token);
            assert_eq!(token.parse::<GameEvent>().unwrap(), event);
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{token}\""));
            assert_eq!(serde_json::from_str::<GameEvent>(&json).unwrap(), event);
        }
        assert!("RoundOpened".parse::<GameEvent>().is_err());
    }

    #[test]
    fn only_gates_and_round_boundaries_wait() {
        let waiting: Vec<GameEvent> = EVENT_TOKENS
            .iter()
            .map(|(event, _)| *event)
            .filter(|event| event.is_waiting_point())
            .collect();
        assert_eq!(
            waiting,
            vec![
                GameEvent::AnteRequested,
                GameEvent::BlindsRequested,
                GameEvent::ReadyRequested,
                GameEvent::RoundStarted,
                GameEvent::RoundClosed,
                GameEvent::GameClosed,
            ]
        );
    }

    #[test]
    fn rounds_advance_to_river_and_stop() {
        assert_eq!(Round::Preflop.next(), Some(Round::Flop));
        assert_eq!(Round::River.next(), None);
        assert_eq!(Round::Flop.board_cards(), 3);
        assert_eq!(serde_json::to_string(&Round::Turn).unwrap(), "\"turn\"");
    }
}
