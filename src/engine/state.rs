//! States: lifecycle hooks plus an ordered set of event handlers.

use crate::core::{Event, Signal, StateKey};
use crate::engine::handler::EventHandler;
use std::any::Any;
use std::fmt;

/// Lifecycle hooks of a state.
///
/// `entry` runs when the state becomes active. Returning a different key
/// redirects the machine onward (the state is exited again and the target
/// entered); returning `None` or the state's own key settles here. `exit`
/// runs exactly once when the state is left.
///
/// Both hooks default to doing nothing, and `()` implements the trait for
/// states that only carry handlers.
///
/// # Example
///
/// ```rust
/// use hsm_engine::{state_keys, Stateful};
///
/// state_keys! {
///     enum Motor {
///         Root,
///         Stopped,
///     }
/// }
///
/// struct Root;
///
/// impl Stateful<Motor, Vec<String>> for Root {
///     fn entry(&mut self, log: &mut Vec<String>) -> Option<Motor> {
///         log.push("root entry".to_string());
///         Some(Motor::Stopped)
///     }
/// }
///
/// let mut log = Vec::new();
/// assert_eq!(Root.entry(&mut log), Some(Motor::Stopped));
/// ```
pub trait Stateful<K, X>: Send + 'static {
    fn entry(&mut self, _xif: &mut X) -> Option<K> {
        None
    }

    fn exit(&mut self, _xif: &mut X) {}
}

impl<K, X> Stateful<K, X> for () {}

/// A node of the hierarchy.
///
/// Handlers are evaluated in attachment order and the first match wins.
/// The parent is a key, not a reference: the machine resolves it in its
/// state arena when delegating unmatched events.
pub struct State<S, K, E, X> {
    key: K,
    parent: Option<K>,
    behavior: S,
    handlers: Vec<EventHandler<S, K, E, X>>,
}

impl<S, K, E, X> State<S, K, E, X>
where
    S: Stateful<K, X>,
    K: StateKey,
    E: Event,
{
    pub fn new(key: K, behavior: S) -> Self {
        Self {
            key,
            parent: None,
            behavior,
            handlers: Vec::new(),
        }
    }

    /// Set the state that handles events this state does not.
    pub fn with_parent(mut self, parent: K) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Append a handler. Later handlers only see events no earlier handler
    /// matched.
    pub fn attach<F>(&mut self, mask: Signal, callback: F) -> &mut Self
    where
        F: FnMut(&mut S, &mut X, &E) -> Option<K> + Send + 'static,
    {
        self.handlers.push(EventHandler::attach(mask, callback));
        self
    }

    /// Builder form of [`attach`](Self::attach).
    pub fn on<F>(mut self, mask: Signal, callback: F) -> Self
    where
        F: FnMut(&mut S, &mut X, &E) -> Option<K> + Send + 'static,
    {
        self.attach(mask, callback);
        self
    }

    pub fn key(&self) -> K {
        self.key
    }

    pub fn parent(&self) -> Option<K> {
        self.parent
    }

    pub fn behavior(&self) -> &S {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut S {
        &mut self.behavior
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run the first local handler matching `event`.
    ///
    /// Returns `None` when no local handler matches, otherwise the
    /// handler's result. Parents are not consulted here.
    pub fn handle(&mut self, xif: &mut X, event: &E) -> Option<Option<K>> {
        let Self {
            behavior, handlers, ..
        } = self;
        handlers
            .iter_mut()
            .find(|handler| handler.matches(event))
            .map(|handler| handler.dispatch(behavior, xif, event))
    }
}

impl<S, K: fmt::Debug, E, X> fmt::Debug for State<S, K, E, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// Type-erased state as stored in the machine's arena.
pub(crate) trait Node<K, E, X>: Send {
    fn key(&self) -> K;
    fn parent(&self) -> Option<K>;
    fn entry(&mut self, xif: &mut X) -> Option<K>;
    fn exit(&mut self, xif: &mut X);
    fn handle(&mut self, xif: &mut X, event: &E) -> Option<Option<K>>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S, K, E, X> Node<K, E, X> for State<S, K, E, X>
where
    S: Stateful<K, X>,
    K: StateKey,
    E: Event,
    X: 'static,
{
    fn key(&self) -> K {
        self.key
    }

    fn parent(&self) -> Option<K> {
        self.parent
    }

    fn entry(&mut self, xif: &mut X) -> Option<K> {
        self.behavior.entry(xif)
    }

    fn exit(&mut self, xif: &mut X) {
        self.behavior.exit(xif)
    }

    fn handle(&mut self, xif: &mut X, event: &E) -> Option<Option<K>> {
        State::handle(self, xif, event)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
