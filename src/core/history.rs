//! Transition history tracking.
//!
//! Every exit/entry move the engine performs is recorded as a
//! [`TransitionRecord`]. The log is bounded: once full, the oldest record
//! is evicted first.

use super::key::StateKey;
use super::signal::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single move between two states.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{Signal, TransitionRecord};
/// use hsm_engine::state_keys;
///
/// state_keys! {
///     enum Pump {
///         Idle,
///         Running,
///     }
/// }
///
/// let record = TransitionRecord::new(Pump::Idle, Pump::Running, Some(Signal::bit(0)));
/// assert_eq!(record.from, Pump::Idle);
/// assert_eq!(record.to, Pump::Running);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<K: StateKey> {
    /// The state that was exited
    pub from: K,
    /// The state that was entered
    pub to: K,
    /// Signal of the event that caused the move; absent for moves made
    /// while settling the initial entry chain
    pub signal: Option<Signal>,
    /// When the move happened
    pub timestamp: DateTime<Utc>,
}

impl<K: StateKey> TransitionRecord<K> {
    pub fn new(from: K, to: K, signal: Option<Signal>) -> Self {
        Self {
            from,
            to,
            signal,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, ordered log of transitions.
///
/// A limit of `Some(0)` disables recording; `None` keeps everything.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{TransitionLog, TransitionRecord};
/// use hsm_engine::state_keys;
///
/// state_keys! {
///     enum Step {
///         A,
///         B,
///         C,
///     }
/// }
///
/// let mut log = TransitionLog::with_limit(Some(8));
/// log.record(TransitionRecord::new(Step::A, Step::B, None));
/// log.record(TransitionRecord::new(Step::B, Step::C, None));
///
/// assert_eq!(log.get_path(), vec![&Step::A, &Step::B, &Step::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionLog<K: StateKey> {
    records: VecDeque<TransitionRecord<K>>,
    limit: Option<usize>,
}

impl<K: StateKey> Default for TransitionLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey> TransitionLog<K> {
    /// Create an unbounded log.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a record, evicting the oldest ones if the log is full.
    pub fn record(&mut self, record: TransitionRecord<K>) {
        match self.limit {
            Some(0) => return,
            Some(limit) => {
                while self.records.len() >= limit {
                    self.records.pop_front();
                }
            }
            None => {}
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<K>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TransitionRecord<K>> {
        self.records.back()
    }

    /// States traversed, in order: the first recorded `from`, then the
    /// `to` of every record.
    pub fn get_path(&self) -> Vec<&K> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the first and the last retained record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
