//! Wait-group tasks that gate the ready, ante and blind phases.
//!
//! A task names a condition over a set of seats. The hand does not block on
//! it: each qualifying action mutates the task and then [`Tasks::execute`]
//! re-checks the queue in registration order. Only the first incomplete
//! task can complete, so later tasks wait even if already satisfied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskName {
    Ready,
    Ante,
    DealerBlind,
    SmallBlind,
    BigBlind,
}

impl TaskName {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskName::Ready => "ready",
            TaskName::Ante => "ante",
            TaskName::DealerBlind => "dealer_blind",
            TaskName::SmallBlind => "small_blind",
            TaskName::BigBlind => "big_blind",
        }
    }
}

/// Per-seat progress. Ready tasks hold a flag, payment tasks the chips paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPayload {
    Ready(BTreeMap<usize, bool>),
    Pay(BTreeMap<usize, i64>),
}

/// Outcome of [`Task::execute`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TaskSignal {
    /// Re-checked; nothing new happened.
    Updated,
    /// Just became complete. Emitted once per task.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: TaskName,
    pub payload: TaskPayload,
    /// Chips each participant owes; empty for ready tasks.
    #[serde(default)]
    pub owed: BTreeMap<usize, i64>,
    pub completed: bool,
}

impl Task {
    pub fn ready<I: IntoIterator<Item = usize>>(seats: I) -> Self {
        Self {
            name: TaskName::Ready,
            payload: TaskPayload::Ready(seats.into_iter().map(|s| (s, false)).collect()),
            owed: BTreeMap::new(),
            completed: false,
        }
    }

    pub fn pay(name: TaskName, owed: BTreeMap<usize, i64>) -> Self {
        Self {
            name,
            payload: TaskPayload::Pay(BTreeMap::new()),
            owed,
            completed: false,
        }
    }

    pub fn participants(&self) -> Vec<usize> {
        match &self.payload {
            TaskPayload::Ready(flags) => flags.keys().copied().collect(),
            TaskPayload::Pay(_) => self.owed.keys().copied().collect(),
        }
    }

    pub fn is_participant(&self, seat: usize) -> bool {
        match &self.payload {
            TaskPayload::Ready(flags) => flags.contains_key(&seat),
            TaskPayload::Pay(_) => self.owed.contains_key(&seat),
        }
    }

    pub fn is_satisfied_by(&self, seat: usize) -> bool {
        match &self.payload {
            TaskPayload::Ready(flags) => flags.get(&seat).copied().unwrap_or(true),
            TaskPayload::Pay(paid) => !self.owed.contains_key(&seat) || paid.contains_key(&seat),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.participants().into_iter().all(|s| self.is_satisfied_by(s))
    }

    pub fn is_payment(&self) -> bool {
        matches!(self.payload, TaskPayload::Pay(_))
    }

    pub fn owed_by(&self, seat: usize) -> Option<i64> {
        self.owed.get(&seat).copied()
    }

    pub fn mark_ready(&mut self, seat: usize) -> Result<(), GameError> {
        match &mut self.payload {
            TaskPayload::Ready(flags) => match flags.get_mut(&seat) {
                Some(flag) => {
                    *flag = true;
                    Ok(())
                }
                None => Err(GameError::UnknownPlayer(seat)),
            },
            TaskPayload::Pay(_) => Err(GameError::UnknownTask(self.name.as_str().into())),
        }
    }

    /// Records a payment; `chips` must equal what the seat owes.
    pub fn record_payment(&mut self, seat: usize, chips: i64) -> Result<(), GameError> {
        let expected = self.owed_by(seat).ok_or(GameError::UnknownPlayer(seat))?;
        match &mut self.payload {
            TaskPayload::Pay(paid) => {
                if chips != expected {
                    return Err(GameError::InvalidPayment {
                        expected,
                        actual: chips,
                    });
                }
                paid.insert(seat, chips);
                Ok(())
            }
            TaskPayload::Ready(_) => Err(GameError::UnknownTask(self.name.as_str().into())),
        }
    }

    /// Satisfies `seat`'s entry without chips (a folded or empty seat passing).
    pub fn waive(&mut self, seat: usize) {
        match &mut self.payload {
            TaskPayload::Ready(flags) => {
                if let Some(flag) = flags.get_mut(&seat) {
                    *flag = true;
                }
            }
            TaskPayload::Pay(paid) => {
                if self.owed.contains_key(&seat) {
                    paid.entry(seat).or_insert(0);
                }
            }
        }
    }

    pub fn execute(&mut self) -> TaskSignal {
        if !self.completed && self.is_satisfied() {
            self.completed = true;
            return TaskSignal::Completed;
        }
        TaskSignal::Updated
    }
}

/// The ordered task queue of the current gating phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tasks(Vec<Task>);

impl Tasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: Task) {
        self.0.push(task);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first incomplete task, if any.
    pub fn pending(&self) -> Option<&Task> {
        self.0.iter().find(|t| !t.completed)
    }

    /// Index of the first task `seat` still owes something to.
    pub fn first_unsatisfied_for(&self, seat: usize) -> Option<usize> {
        self.0
            .iter()
            .position(|t| !t.completed && t.is_participant(seat) && !t.is_satisfied_by(seat))
    }

    pub fn get(&self, idx: usize) -> Option<&Task> {
        self.0.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Task> {
        self.0.get_mut(idx)
    }

    /// Runs tasks in registration order, stopping at the first one that is
    /// still waiting. Returns whether every task has completed.
    pub fn execute(&mut self) -> bool {
        for task in &mut self.0 {
            if task.completed {
                continue;
            }
            if task.execute() != TaskSignal::Completed {
                return false;
            }
            tracing::trace!(task = task.name.as_str(), "task completed");
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|t| t.completed)
    }
}
