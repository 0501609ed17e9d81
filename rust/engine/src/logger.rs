use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::event::{GameEvent, Round};
use crate::game::GameState;
use crate::player::LastAction;
use crate::pot::Pot;
use crate::settlement::SettlementResult;

/// One line of hand history: the hand as it stood after an applied call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    pub game_id: String,
    /// Position of this record within the hand, starting at 1.
    pub seq: u32,
    pub event: GameEvent,
    #[serde(default)]
    pub round: Option<Round>,
    #[serde(default)]
    pub last_action: Option<LastAction>,
    pub board: Vec<Card>,
    pub pots: Vec<Pot>,
    /// Present once the hand is settled.
    #[serde(default)]
    pub result: Option<SettlementResult>,
    /// RFC3339 timestamp, filled in by [`HandLogger::write`] when missing.
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    pub fn from_state(state: &GameState, seq: u32) -> Self {
        Self {
            game_id: state.game_id.clone(),
            seq,
            event: state.status.current_event,
            round: state.status.current_round,
            last_action: state.status.last_action.clone(),
            board: state.status.board.clone(),
            pots: state.status.pots.clone(),
            result: state.result.clone(),
            ts: None,
        }
    }
}

/// Appends [`HandRecord`]s as JSON lines.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            seq: 0,
        })
    }

    /// A logger that numbers records but writes nowhere.
    pub fn discard() -> Self {
        Self {
            writer: None,
            seq: 0,
        }
    }

    /// Records `state` as the next line of the hand.
    pub fn log_state(&mut self, state: &GameState) -> std::io::Result<HandRecord> {
        self.seq += 1;
        let record = HandRecord::from_state(state, self.seq);
        self.write(&record)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<HandRecord> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(rec)
    }
}
