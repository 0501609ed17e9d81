use std::fs;
use std::sync::{Arc, Mutex};

use holdem_engine::event::GameEvent;
use holdem_engine::game::{Game, GameOptions};
use holdem_engine::logger::{HandLogger, HandRecord};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
}

#[derive(Clone, Default)]
struct CaptureLayer {
    entries: Arc<Mutex<Vec<Captured>>>,
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.entries.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

fn folded_hand() -> Game {
    let mut game = Game::new(GameOptions::standard().with_seats(2, 1_000)).unwrap();
    game.start().unwrap();
    game.ready_for_all().unwrap();
    game.pay_blinds().unwrap();
    game.ready_for_all().unwrap();
    game.fold(0).unwrap();
    game
}

#[test]
fn transitions_and_settlement_are_traced() {
    let layer = CaptureLayer::default();
    let registry = Registry::default().with(layer.clone());
    tracing::subscriber::with_default(registry, || {
        folded_hand();
    });

    let entries = layer.entries.lock().unwrap().clone();
    let transitions: Vec<&Captured> =
        entries.iter().filter(|e| e.message == "transition").collect();
    assert!(transitions.iter().all(|e| e.level == Level::DEBUG));
    assert!(transitions
        .iter()
        .any(|e| e.fields.iter().any(|(k, v)| k == "event" && v == "RoundStarted")));
    assert!(transitions
        .iter()
        .any(|e| e.fields.iter().any(|(k, v)| k == "event" && v == "GameClosed")));

    // the folded small blind and the big blind's uncalled five are separate levels
    let settled: Vec<&Captured> =
        entries.iter().filter(|e| e.message == "pot settled").collect();
    assert_eq!(settled.len(), 2);
    assert!(settled.iter().all(|e| e.level == Level::INFO));
    assert!(entries.iter().any(|e| {
        e.message == "action applied"
            && e.fields.iter().any(|(k, v)| k == "action" && v == "fold")
    }));
}

#[test]
fn writes_one_jsonl_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands").join("history.jsonl");
    let game = folded_hand();

    let mut logger = HandLogger::create(&path).expect("create logger");
    let first = logger.log_state(game.state()).unwrap();
    let second = logger.log_state(game.state()).unwrap();
    assert_eq!((first.seq, second.seq), (1, 2));

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let record: HandRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record.game_id, game.state().game_id);
    assert_eq!(record.event, GameEvent::GameClosed);
    assert!(record.ts.is_some());
    assert!(record.result.is_some());
    assert!(lines[0].contains("\"event\":\"GameClosed\""));
}

#[test]
fn preset_timestamp_is_preserved() {
    let game = folded_hand();
    let mut logger = HandLogger::discard();
    let mut record = HandRecord::from_state(game.state(), 7);
    record.ts = Some("2030-01-01T00:00:00Z".to_string());
    let written = logger.write(&record).unwrap();
    assert_eq!(written.ts.as_deref(), Some("2030-01-01T00:00:00Z"));
}
