//! Builder for constructing machines.

use crate::builder::config::HsmConfig;
use crate::builder::error::BuildError;
use crate::core::{Event, StateKey};
use crate::enforcement::ViolationStrategy;
use crate::engine::{Hsm, Node, State, Stateful};
use parking_lot::lock_api::RawMutex;
use std::marker::PhantomData;

/// Builder for constructing machines with a fluent API.
///
/// `build` registers every state and validates the hierarchy, so a
/// machine that builds has no dangling parents and no parent cycles.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::HsmBuilder;
/// use hsm_engine::{state_keys, Signal, SignalEvent, State};
///
/// state_keys! {
///     enum Valve {
///         Root,
///         Closed,
///         Open,
///     }
/// }
///
/// const OPEN: Signal = Signal::bit(0);
///
/// let mut hsm = HsmBuilder::<Valve, SignalEvent, ()>::new()
///     .root(State::new(Valve::Root, ()))
///     .state(
///         State::new(Valve::Closed, ())
///             .with_parent(Valve::Root)
///             .on(OPEN, |_, _, _| Some(Valve::Open)),
///     )
///     .state(State::new(Valve::Open, ()).with_parent(Valve::Root))
///     .context(())
///     .max_parent_depth(4)
///     .build()
///     .unwrap();
///
/// assert_eq!(hsm.init().unwrap(), Valve::Root);
/// ```
pub struct HsmBuilder<K, E, X, R = parking_lot::RawMutex> {
    root: Option<Box<dyn Node<K, E, X>>>,
    states: Vec<Box<dyn Node<K, E, X>>>,
    xif: Option<X>,
    config: HsmConfig,
    _lock: PhantomData<R>,
}

impl<K, E, X> HsmBuilder<K, E, X>
where
    K: StateKey,
    E: Event,
    X: 'static,
{
    /// Create a builder using `parking_lot`'s mutex for the event queue.
    pub fn new() -> Self {
        Self::with_lock()
    }
}

impl<K, E, X, R> HsmBuilder<K, E, X, R>
where
    K: StateKey,
    E: Event,
    X: 'static,
    R: RawMutex,
{
    /// Create a builder whose event queue is guarded by the raw mutex `R`.
    pub fn with_lock() -> Self {
        Self {
            root: None,
            states: Vec::new(),
            xif: None,
            config: HsmConfig::default(),
            _lock: PhantomData,
        }
    }

    /// Set the machine's own state (required).
    pub fn root<S: Stateful<K, X>>(mut self, state: State<S, K, E, X>) -> Self {
        self.root = Some(Box::new(state));
        self
    }

    /// Add a state below the root.
    pub fn state<S: Stateful<K, X>>(mut self, state: State<S, K, E, X>) -> Self {
        self.states.push(Box::new(state));
        self
    }

    /// Set the context passed to every hook and handler (required).
    pub fn context(mut self, xif: X) -> Self {
        self.xif = Some(xif);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: HsmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_parent_depth(mut self, hops: usize) -> Self {
        self.config.limits.max_parent_depth = Some(hops);
        self
    }

    pub fn max_entry_redirects(mut self, redirects: usize) -> Self {
        self.config.limits.max_entry_redirects = Some(redirects);
        self
    }

    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.config.limits.on_violation = strategy;
        self
    }

    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing or the hierarchy is
    /// invalid.
    pub fn build(self) -> Result<Hsm<K, E, X, R>, BuildError> {
        let root = self.root.ok_or(BuildError::MissingRoot)?;
        let xif = self.xif.ok_or(BuildError::MissingContext)?;

        let mut hsm = Hsm::from_root(root, xif, self.config);
        for state in self.states {
            hsm.register(state)?;
        }
        hsm.validate()?;

        Ok(hsm)
    }
}

impl<K, E, X> Default for HsmBuilder<K, E, X>
where
    K: StateKey,
    E: Event,
    X: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Signal, SignalEvent};
    use crate::engine::HsmError;

    crate::state_keys! {
        enum TestKey {
            Root,
            Idle,
            Busy,
        }
    }

    type Builder = HsmBuilder<TestKey, SignalEvent, u32>;
    type TestState<S> = State<S, TestKey, SignalEvent, u32>;

    #[test]
    fn builder_requires_root() {
        let result = Builder::new().context(0).build();
        assert!(matches!(result, Err(BuildError::MissingRoot)));
    }

    #[test]
    fn builder_requires_context() {
        let result = Builder::new()
            .root(TestState::new(TestKey::Root, ()))
            .build();
        assert!(matches!(result, Err(BuildError::MissingContext)));
    }

    #[test]
    fn builder_rejects_duplicate_states() {
        let result = Builder::new()
            .root(TestState::new(TestKey::Root, ()))
            .state(TestState::new(TestKey::Idle, ()))
            .state(TestState::new(TestKey::Idle, ()))
            .context(0)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Registry(HsmError::DuplicateState { .. }))
        ));
    }

    #[test]
    fn builder_rejects_dangling_parent() {
        let result = Builder::new()
            .root(TestState::new(TestKey::Root, ()))
            .state(TestState::new(TestKey::Idle, ()).with_parent(TestKey::Busy))
            .context(0)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Registry(HsmError::UnknownParent { .. }))
        ));
    }

    #[test]
    fn builder_rejects_parent_cycle() {
        let result = Builder::new()
            .root(TestState::new(TestKey::Root, ()))
            .state(TestState::new(TestKey::Idle, ()).with_parent(TestKey::Busy))
            .state(TestState::new(TestKey::Busy, ()).with_parent(TestKey::Idle))
            .context(0)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Registry(HsmError::ParentCycle { .. }))
        ));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let mut hsm = Builder::new()
            .root(TestState::new(TestKey::Root, ()))
            .state(
                TestState::new(TestKey::Idle, ())
                    .with_parent(TestKey::Root)
                    .on(Signal::USER, |_, count, _| {
                        *count += 1;
                        Some(TestKey::Busy)
                    }),
            )
            .state(TestState::new(TestKey::Busy, ()).with_parent(TestKey::Root))
            .context(0)
            .max_parent_depth(2)
            .max_entry_redirects(2)
            .on_violation(ViolationStrategy::IgnoreAndLog)
            .history_limit(Some(4))
            .build()
            .unwrap();

        assert_eq!(hsm.config().limits.max_parent_depth, Some(2));
        assert_eq!(hsm.config().history_limit, Some(4));
        assert_eq!(hsm.states().count(), 3);

        let settled = hsm
            .dispatch(TestKey::Idle, Some(&SignalEvent::new(Signal::USER)))
            .unwrap();
        assert_eq!(settled, Some(TestKey::Busy));
        assert_eq!(*hsm.context(), 1);
    }

    #[test]
    fn config_replaces_defaults() {
        let config = HsmConfig {
            history_limit: None,
            ..HsmConfig::default()
        };
        let hsm = Builder::default()
            .root(TestState::new(TestKey::Root, ()))
            .context(0)
            .config(config.clone())
            .build()
            .unwrap();

        assert_eq!(hsm.config(), &config);
    }
}
