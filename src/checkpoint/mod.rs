//! Checkpoint and resume of a machine's runtime position.
//!
//! A checkpoint captures where a machine is (its current state), how it got
//! there (the transition log) and its dispatch counters. It never contains
//! the states themselves, their handlers or pending events: a checkpoint is
//! restored into a machine that was built with the same states.

use crate::core::{Event, StateKey, TransitionLog};
use crate::engine::{DispatchStats, Hsm};
use chrono::{DateTime, Utc};
use parking_lot::lock_api::RawMutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's runtime position.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<K: StateKey> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Root state of the machine the checkpoint was taken from
    pub root: K,

    /// State the machine was settled in
    pub current: K,

    /// Retained transition history
    pub history: TransitionLog<K>,

    /// Dispatch counters
    pub stats: DispatchStats,
}

impl<K: StateKey> Checkpoint<K> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<K, E, X, R> Hsm<K, E, X, R>
where
    K: StateKey,
    E: Event,
    X: 'static,
    R: RawMutex,
{
    /// Capture the machine's current position.
    pub fn checkpoint(&self) -> Checkpoint<K> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            root: self.root,
            current: self.current,
            history: self.history.clone(),
            stats: self.stats,
        }
    }

    /// Resume from a checkpoint.
    ///
    /// The current state is set directly; no `exit` or `entry` hook runs.
    /// Pending events are left untouched.
    pub fn restore(&mut self, checkpoint: &Checkpoint<K>) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;

        if checkpoint.root != self.root {
            return Err(CheckpointError::ValidationFailed(format!(
                "root '{}' differs from machine root '{}'",
                checkpoint.root.name(),
                self.root.name()
            )));
        }
        if !self.contains(checkpoint.current) {
            return Err(CheckpointError::ValidationFailed(format!(
                "current state '{}' is not registered",
                checkpoint.current.name()
            )));
        }

        let mut history = TransitionLog::with_limit(self.config().history_limit);
        for record in checkpoint.history.records() {
            history.record(record.clone());
        }

        self.current = checkpoint.current;
        self.history = history;
        self.stats = checkpoint.stats;

        tracing::debug!(
            checkpoint = %checkpoint.id,
            state = checkpoint.current.name(),
            "machine restored from checkpoint"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Signal, SignalEvent};
    use crate::engine::{State, Stateful};

    crate::state_keys! {
        enum Key {
            Root,
            Idle,
            Running,
            Elsewhere,
        }
    }

    const START: Signal = Signal::bit(0);

    type TestHsm = Hsm<Key, SignalEvent, ()>;

    struct Boot;

    impl Stateful<Key, ()> for Boot {
        fn entry(&mut self, _: &mut ()) -> Option<Key> {
            Some(Key::Idle)
        }
    }

    fn machine() -> TestHsm {
        let mut hsm: TestHsm = Hsm::new(State::new(Key::Root, Boot), ());
        hsm.attach_state(
            State::new(Key::Idle, ())
                .with_parent(Key::Root)
                .on(START, |_, _, _| Some(Key::Running)),
        )
        .unwrap();
        hsm.attach_state(State::new(Key::Running, ()).with_parent(Key::Root))
            .unwrap();
        hsm
    }

    fn running_machine() -> TestHsm {
        let mut hsm = machine();
        hsm.init().unwrap();
        hsm.raise_event(SignalEvent::new(START));
        hsm.dispatch_events().unwrap();
        hsm
    }

    #[test]
    fn checkpoint_captures_position() {
        let hsm = running_machine();
        let checkpoint = hsm.checkpoint();

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert_eq!(checkpoint.current, Key::Running);
        assert_eq!(checkpoint.stats.transitions, 1);
        assert_eq!(checkpoint.history.len(), 2);
    }

    #[test]
    fn restore_resumes_at_checkpointed_state() {
        let checkpoint = running_machine().checkpoint();

        let mut fresh = machine();
        fresh.restore(&checkpoint).unwrap();

        assert_eq!(fresh.current_state(), Key::Running);
        assert_eq!(fresh.stats(), checkpoint.stats);
        assert_eq!(
            fresh.history().get_path(),
            vec![&Key::Root, &Key::Idle, &Key::Running]
        );
    }

    #[test]
    fn json_roundtrip_preserves_checkpoint() {
        let checkpoint = running_machine().checkpoint();

        let json = checkpoint.to_json().unwrap();
        let back: Checkpoint<Key> = Checkpoint::from_json(&json).unwrap();

        assert_eq!(back.id, checkpoint.id);
        assert_eq!(back.current, Key::Running);
        assert_eq!(back.history.get_path(), checkpoint.history.get_path());
    }

    #[test]
    fn binary_roundtrip_preserves_checkpoint() {
        let checkpoint = running_machine().checkpoint();

        let bytes = checkpoint.to_bytes().unwrap();
        let back: Checkpoint<Key> = Checkpoint::from_bytes(&bytes).unwrap();

        assert_eq!(back.id, checkpoint.id);
        assert_eq!(back.stats, checkpoint.stats);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut checkpoint = running_machine().checkpoint();
        checkpoint.version = CHECKPOINT_VERSION + 1;

        let json = serde_json::to_string(&checkpoint).unwrap();
        let err = Checkpoint::<Key>::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
        assert_eq!(
            err.to_string(),
            "checkpoint format v2 is not readable, this build reads v1"
        );
        assert!(matches!(
            machine().restore(&checkpoint),
            Err(CheckpointError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn unknown_current_state_is_rejected() {
        let mut checkpoint = running_machine().checkpoint();
        checkpoint.current = Key::Elsewhere;

        let mut fresh = machine();
        let err = fresh.restore(&checkpoint).unwrap_err();
        assert!(matches!(err, CheckpointError::ValidationFailed(_)));
        assert_eq!(
            err.to_string(),
            "checkpoint does not fit this machine: current state 'Elsewhere' is not registered"
        );
        assert_eq!(fresh.current_state(), Key::Root);
    }

    #[test]
    fn mismatched_root_is_rejected() {
        let mut checkpoint = running_machine().checkpoint();
        checkpoint.root = Key::Idle;

        let err = machine().restore(&checkpoint).unwrap_err();
        assert_eq!(
            err.to_string(),
            "checkpoint does not fit this machine: root 'Idle' differs from machine root 'Root'"
        );
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            Checkpoint::<Key>::from_bytes(&[0xff, 0x01]),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }
}
