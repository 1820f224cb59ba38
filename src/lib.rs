//! # event-registry
//!
//! A minimal observer-pattern utility: an [`EventRegistry`] maps string event
//! names to ordered listener sequences and dispatches to them synchronously.
//!
//! - Listeners are registered under one or more names at once
//!   (`"save load, error"`), plus the reserved catch-all name `"all"`.
//! - A listener returning [`Flow::Cancel`] halts the rest of its event name's
//!   sequence for that emit call.
//! - [`EventRegistry::once`] registers fire-once listeners.
//! - [`EventRegistry::suspend`] makes every emit a no-op until
//!   [`EventRegistry::resume`]; suspended emits are dropped, not queued.
//!
//! All methods take `&self`; listeners may re-enter the registry from inside
//! a callback. See [`registry`] for the dispatch semantics.

pub mod registry;
pub mod types;

pub use registry::{EventRegistry, CATCH_ALL};
pub use types::{Callback, Context, Flow, ListenerEntry, Unsubscribe};
