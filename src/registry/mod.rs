//! Listener registry and synchronous dispatch.
//!
//! # Overview
//!
//! [`EventRegistry`] owns a mapping from event name to an ordered listener
//! sequence. Registration under any name also files a record under the
//! reserved catch-all name [`CATCH_ALL`]; emit dispatches only the names it
//! is explicitly given, so catch-all listeners fire when `"all"` itself is
//! emitted, never as a side channel of other names.
//!
//! # Modules
//!
//! - [`names`] — event-name string parsing.
//! - [`emitter`] — [`EventRegistry`] itself.

pub mod emitter;
pub mod names;

pub use emitter::EventRegistry;
pub use names::CATCH_ALL;
