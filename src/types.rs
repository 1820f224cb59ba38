use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Owned reference handed to a callback as its execution context.
///
/// Registration may supply any `Arc<dyn Any + Send + Sync>`; when none is
/// given the registry substitutes its own shared handle so every listener has
/// a usable context (see [`EventRegistry::is_self_context`]).
///
/// [`EventRegistry::is_self_context`]: crate::EventRegistry::is_self_context
pub type Context = Arc<dyn Any + Send + Sync>;

/// What a listener tells the dispatcher to do next.
///
/// `Cancel` halts the remaining listeners of the current event name's
/// sequence for this emit call only. It does not affect other names in the
/// same multi-name emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep dispatching the rest of the sequence.
    Continue,
    /// Stop dispatching this event name's sequence.
    Cancel,
}

impl Flow {
    /// `true` for [`Flow::Cancel`].
    pub fn is_cancel(self) -> bool {
        matches!(self, Flow::Cancel)
    }
}

/// Shared listener closure. `Arc` identity (`Arc::ptr_eq`) is what
/// identity-matched removal compares — hold a clone of the same `Arc` to be
/// able to pass it to [`EventRegistry::off_listener`].
///
/// [`EventRegistry::off_listener`]: crate::EventRegistry::off_listener
pub type Callback = Arc<dyn Fn(&Context, &[Value]) -> Flow + Send + Sync>;

/// An owned one-shot closure that removes a registration when called.
///
/// `FnOnce` ownership makes double-removal unrepresentable: the handle is
/// consumed by its single invocation.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// Read-only snapshot of one registered listener, as returned by
/// [`EventRegistry::listeners`] and [`EventRegistry::all_listeners`].
///
/// `callback` and `context` are shared `Arc`s; the entry itself is a clone —
/// mutating or dropping it never affects the live registry.
///
/// [`EventRegistry::listeners`]: crate::EventRegistry::listeners
/// [`EventRegistry::all_listeners`]: crate::EventRegistry::all_listeners
#[derive(Clone)]
pub struct ListenerEntry {
    /// Event name this record is filed under.
    pub event: String,
    /// The listener closure.
    pub callback: Callback,
    /// Execution context delivered to the callback.
    pub context: Context,
    /// Fixed params prepended to every invocation's arguments.
    pub params: Vec<Value>,
    /// Whether this record is removed on its first invocation.
    pub once: bool,
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("event", &self.event)
            .field("params", &self.params)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}
