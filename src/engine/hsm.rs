//! The hierarchical state machine: state arena, event queue and the
//! dispatch/transition engine.

use crate::builder::HsmConfig;
use crate::core::{Event, Signal, StateKey, TransitionLog, TransitionRecord};
use crate::enforcement::{ViolationError, ViolationStrategy};
use crate::engine::error::HsmError;
use crate::engine::queue::{EventQueue, Raiser};
use crate::engine::state::{Node, State, Stateful};
use parking_lot::lock_api::RawMutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Counters maintained by [`Hsm::dispatch_events`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Events taken off the queue
    pub events_dispatched: u64,
    /// Events that moved the machine to another state
    pub transitions: u64,
    /// Events no state in the parent chain handled
    pub unhandled: u64,
}

/// Outcome of routing one event up the parent chain.
enum Routed<K> {
    Unhandled,
    Handled { by: K, next: Option<K> },
}

/// Hierarchical state machine.
///
/// The machine owns every state in an arena addressed by [`StateKey`]. The
/// root state, given at construction, is the machine's own state: `init`
/// settles the entry chain starting there. Events are raised into a
/// lock-protected FIFO and processed by [`dispatch_events`](Self::dispatch_events),
/// which the application calls from its own loop.
///
/// # Example
///
/// ```rust
/// use hsm_engine::{state_keys, Hsm, Signal, SignalEvent, State, Stateful};
///
/// state_keys! {
///     enum Lamp {
///         Root,
///         On,
///         Off,
///     }
/// }
///
/// const TURN_ON: Signal = Signal::bit(0);
/// const TURN_OFF: Signal = Signal::bit(1);
///
/// struct Root;
///
/// impl Stateful<Lamp, ()> for Root {
///     fn entry(&mut self, _: &mut ()) -> Option<Lamp> {
///         Some(Lamp::Off)
///     }
/// }
///
/// let mut hsm: Hsm<Lamp, SignalEvent, ()> = Hsm::new(State::new(Lamp::Root, Root), ());
/// hsm.attach_state(
///     State::new(Lamp::Off, ())
///         .with_parent(Lamp::Root)
///         .on(TURN_ON, |_, _, _| Some(Lamp::On)),
/// )?;
/// hsm.attach_state(
///     State::new(Lamp::On, ())
///         .with_parent(Lamp::Root)
///         .on(TURN_OFF, |_, _, _| Some(Lamp::Off)),
/// )?;
///
/// assert_eq!(hsm.init()?, Lamp::Off);
///
/// hsm.raise_event(SignalEvent::new(TURN_ON));
/// assert_eq!(hsm.dispatch_events()?, Lamp::On);
/// # Ok::<(), hsm_engine::HsmError>(())
/// ```
pub struct Hsm<K: StateKey, E, X, R: RawMutex = parking_lot::RawMutex> {
    pub(crate) root: K,
    pub(crate) current: K,
    nodes: Vec<Box<dyn Node<K, E, X>>>,
    index: HashMap<K, usize>,
    queue: Arc<EventQueue<E, R>>,
    xif: X,
    config: HsmConfig,
    pub(crate) history: TransitionLog<K>,
    pub(crate) stats: DispatchStats,
}

impl<K, E, X> Hsm<K, E, X>
where
    K: StateKey,
    E: Event,
    X: 'static,
{
    /// Create a machine whose own state is `root`, with default settings.
    pub fn new<S: Stateful<K, X>>(root: State<S, K, E, X>, xif: X) -> Self {
        Self::with_config(root, xif, HsmConfig::default())
    }

    /// Create a machine whose own state is `root`, with explicit chain
    /// limits and history retention.
    pub fn with_config<S: Stateful<K, X>>(
        root: State<S, K, E, X>,
        xif: X,
        config: HsmConfig,
    ) -> Self {
        Self::from_root(Box::new(root), xif, config)
    }
}

impl<K, E, X, R> Hsm<K, E, X, R>
where
    K: StateKey,
    E: Event,
    X: 'static,
    R: RawMutex,
{
    pub(crate) fn from_root(root: Box<dyn Node<K, E, X>>, xif: X, config: HsmConfig) -> Self {
        let key = root.key();
        let mut index = HashMap::new();
        index.insert(key, 0);

        Self {
            root: key,
            current: key,
            nodes: vec![root],
            index,
            queue: Arc::new(EventQueue::new()),
            xif,
            history: TransitionLog::with_limit(config.history_limit),
            config,
            stats: DispatchStats::default(),
        }
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Register a state. Keys must be unique within the machine.
    ///
    /// Parents are not checked here, so states may be attached in any
    /// order; call [`validate`](Self::validate) once the hierarchy is
    /// complete.
    pub fn attach_state<S: Stateful<K, X>>(
        &mut self,
        state: State<S, K, E, X>,
    ) -> Result<(), HsmError> {
        self.register(Box::new(state))
    }

    pub(crate) fn register(&mut self, node: Box<dyn Node<K, E, X>>) -> Result<(), HsmError> {
        let key = node.key();
        if self.index.contains_key(&key) {
            return Err(HsmError::DuplicateState {
                state: key.name().to_string(),
            });
        }

        tracing::debug!(
            state = key.name(),
            parent = ?node.parent(),
            "state attached"
        );
        self.index.insert(key, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Typed access to a registered state, e.g. to attach more handlers.
    ///
    /// Returns `None` if the key is unknown or `S` is not the state's
    /// behavior type.
    pub fn state<S: Stateful<K, X>>(&self, key: K) -> Option<&State<S, K, E, X>> {
        let idx = *self.index.get(&key)?;
        self.nodes[idx].as_any().downcast_ref()
    }

    pub fn state_mut<S: Stateful<K, X>>(&mut self, key: K) -> Option<&mut State<S, K, E, X>> {
        let idx = *self.index.get(&key)?;
        self.nodes[idx].as_any_mut().downcast_mut()
    }

    pub fn behavior<S: Stateful<K, X>>(&self, key: K) -> Option<&S> {
        self.state::<S>(key).map(State::behavior)
    }

    pub fn contains(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    /// Registered keys, root first, then in attachment order.
    pub fn states(&self) -> impl Iterator<Item = K> + '_ {
        self.nodes.iter().map(|node| node.key())
    }

    /// Check that every parent is registered and that no parent chain
    /// loops back on itself.
    pub fn validate(&self) -> Result<(), HsmError> {
        for node in &self.nodes {
            if let Some(parent) = node.parent() {
                if !self.index.contains_key(&parent) {
                    return Err(HsmError::UnknownParent {
                        state: node.key().name().to_string(),
                        parent: parent.name().to_string(),
                    });
                }
            }
        }

        for node in &self.nodes {
            let mut hops = 0;
            let mut cursor = node.parent();
            while let Some(key) = cursor {
                hops += 1;
                if hops > self.nodes.len() {
                    return Err(HsmError::ParentCycle {
                        state: node.key().name().to_string(),
                    });
                }
                cursor = self.parent_of(key);
            }
        }

        Ok(())
    }

    fn parent_of(&self, key: K) -> Option<K> {
        self.index
            .get(&key)
            .and_then(|&idx| self.nodes[idx].parent())
    }

    fn position(&self, key: K) -> Result<usize, HsmError> {
        self.index
            .get(&key)
            .copied()
            .ok_or_else(|| HsmError::UnknownState {
                state: key.name().to_string(),
            })
    }

    // =========================================================================
    // Event queue
    // =========================================================================

    /// Append an event to the pending queue.
    pub fn raise_event(&self, event: E) {
        self.queue.push(event);
    }

    /// Producer handle sharing this machine's queue.
    pub fn raiser(&self) -> Raiser<E, R> {
        Raiser::new(Arc::clone(&self.queue))
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Drop all pending events without dispatching them.
    pub fn discard_events(&self) -> usize {
        self.queue.clear()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Settle the entry chain from the root and make the result current.
    ///
    /// If the chain fails part way, the machine is left in the last state
    /// that was entered and the error is returned.
    pub fn init(&mut self) -> Result<K, HsmError> {
        let mut settled = self.root;
        let result = self.walk_entry_chain(&mut settled, None);
        self.current = settled;
        result?;

        tracing::debug!(state = settled.name(), "machine initialised");
        Ok(settled)
    }

    /// Route an event starting at `state`.
    ///
    /// With no event, this settles the entry chain beginning at `state` and
    /// returns the state it settled in. With an event, local handlers are
    /// tried in attachment order, then each ancestor in turn; the first
    /// match decides the result. `None` means the event was handled without
    /// a transition, or not handled anywhere.
    ///
    /// The current state is not changed.
    pub fn dispatch(&mut self, state: K, event: Option<&E>) -> Result<Option<K>, HsmError> {
        match event {
            None => {
                let mut settled = state;
                self.walk_entry_chain(&mut settled, None)?;
                Ok(Some(settled))
            }
            Some(event) => Ok(match self.route(state, event)? {
                Routed::Unhandled => None,
                Routed::Handled { next, .. } => next,
            }),
        }
    }

    /// Drain the pending queue in FIFO order, running each event to
    /// completion (including its whole exit/entry chain) before taking the
    /// next. Events raised by handlers are drained in the same call.
    ///
    /// On error the failing event is consumed and the remaining events stay
    /// queued.
    pub fn dispatch_events(&mut self) -> Result<K, HsmError> {
        while let Some(event) = self.queue.pop() {
            self.stats.events_dispatched += 1;
            let signal = event.signal();
            let current = self.current;

            match self.route(current, &event)? {
                Routed::Unhandled => {
                    self.stats.unhandled += 1;
                    tracing::trace!(%signal, state = current.name(), "event unhandled");
                }
                Routed::Handled {
                    by,
                    next: Some(next),
                } if next != current => {
                    tracing::trace!(%signal, handler = by.name(), "event handled");
                    self.transition(current, next, signal)?;
                }
                Routed::Handled { by, .. } => {
                    tracing::trace!(%signal, handler = by.name(), "event handled in place");
                }
            }
        }

        Ok(self.current)
    }

    /// Walk from `state` up the parent chain until a handler matches.
    fn route(&mut self, state: K, event: &E) -> Result<Routed<K>, HsmError> {
        let mut key = state;
        let mut hops = 0;

        loop {
            let idx = self.position(key)?;
            if let Some(next) = self.nodes[idx].handle(&mut self.xif, event) {
                return Ok(Routed::Handled { by: key, next });
            }

            let Some(parent) = self.nodes[idx].parent() else {
                return Ok(Routed::Unhandled);
            };

            hops += 1;
            if let Err(violation) = self.config.limits.check_parent_depth(state.name(), hops) {
                self.on_violation(violation)?;
                return Ok(Routed::Unhandled);
            }
            key = parent;
        }
    }

    /// Exit `from`, enter `to` and follow any entry redirects.
    fn transition(&mut self, from: K, to: K, signal: Signal) -> Result<(), HsmError> {
        // Resolve the target first so a bad key never leaves the machine
        // exited with nothing entered.
        self.position(to)?;
        let idx = self.position(from)?;

        self.nodes[idx].exit(&mut self.xif);
        self.record(from, to, Some(signal));
        self.stats.transitions += 1;

        let mut settled = to;
        let result = self.walk_entry_chain(&mut settled, Some(signal));
        self.current = settled;

        tracing::debug!(
            %signal,
            from = from.name(),
            to = settled.name(),
            "transition settled"
        );
        result
    }

    /// Enter `cursor`, then keep exiting and entering while `entry`
    /// redirects elsewhere. `cursor` always holds the last state entered.
    fn walk_entry_chain(&mut self, cursor: &mut K, signal: Option<Signal>) -> Result<(), HsmError> {
        let mut redirects = 0;

        loop {
            let state = *cursor;
            let idx = self.position(state)?;
            let next = match self.nodes[idx].entry(&mut self.xif) {
                Some(next) if next != state => next,
                _ => return Ok(()),
            };

            redirects += 1;
            if let Err(violation) = self
                .config
                .limits
                .check_entry_redirects(state.name(), redirects)
            {
                return self.on_violation(violation);
            }

            self.position(next)?;
            self.nodes[idx].exit(&mut self.xif);
            self.record(state, next, signal);
            tracing::trace!(from = state.name(), to = next.name(), "entry redirect");
            *cursor = next;
        }
    }

    fn on_violation(&self, violation: ViolationError) -> Result<(), HsmError> {
        match self.config.limits.violation_strategy() {
            ViolationStrategy::Abort => Err(violation.into()),
            ViolationStrategy::IgnoreAndLog => {
                tracing::warn!("{}", violation);
                Ok(())
            }
        }
    }

    fn record(&mut self, from: K, to: K, signal: Option<Signal>) {
        self.history.record(TransitionRecord::new(from, to, signal));
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn current_state(&self) -> K {
        self.current
    }

    pub fn root(&self) -> K {
        self.root
    }

    /// True if the current state is `key` or one of its descendants.
    pub fn is_in(&self, key: K) -> bool {
        let mut cursor = Some(self.current);
        let mut hops = 0;
        while let Some(state) = cursor {
            if state == key {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return false;
            }
            cursor = self.parent_of(state);
        }
        false
    }

    pub fn context(&self) -> &X {
        &self.xif
    }

    pub fn context_mut(&mut self) -> &mut X {
        &mut self.xif
    }

    pub fn history(&self) -> &TransitionLog<K> {
        &self.history
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn config(&self) -> &HsmConfig {
        &self.config
    }
}

impl<K: StateKey, E, X, R: RawMutex> fmt::Debug for Hsm<K, E, X, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hsm")
            .field("root", &self.root)
            .field("current", &self.current)
            .field("states", &self.nodes.len())
            .field("queue", &self.queue)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
