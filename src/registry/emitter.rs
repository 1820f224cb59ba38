//! EventRegistry — named-event listener registry with synchronous dispatch.
//!
//! Listener records are stored as `Arc`s so per-name snapshots are cheap.
//! Snapshot-on-dispatch semantics mean:
//!   - A listener removed *during* a dispatch pass is still called in that
//!     pass (once-records excepted, see below).
//!   - A listener added *during* a dispatch pass is NOT called until the
//!     next emit.
//!
//! Once-records are the exception to pure snapshot iteration: each is excised
//! from the live registry *before* its callback runs, so a callback that
//! synchronously re-emits its own event cannot re-trigger itself, and a
//! re-entrant emit that consumes a pending once-record makes the outer pass
//! skip it.
//!
//! Panics inside a listener propagate to the `emit` caller and abort the
//! remaining dispatch — swallowing them would mask bugs silently.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`),
//! and the lock is never held while a callback runs, which allows listeners
//! to re-enter any registry method during `emit` without deadlocking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::types::{Callback, Context, Flow, ListenerEntry, Unsubscribe};

use super::names::{parse_event_names, registration_targets};

// ============================================================================
// Internal listener record
// ============================================================================

struct ListenerRecord {
    /// All records filed by one registration call share this id; the
    /// unsubscribe handle removes by it.
    reg_id: u64,
    callback: Callback,
    context: Context,
    /// Fixed params prepended to every invocation's arguments.
    params: Vec<Value>,
    once: bool,
}

impl ListenerRecord {
    fn entry(&self, event: &str) -> ListenerEntry {
        ListenerEntry {
            event: event.to_owned(),
            callback: Arc::clone(&self.callback),
            context: Arc::clone(&self.context),
            params: self.params.clone(),
            once: self.once,
        }
    }
}

// ============================================================================
// Registry state (behind the mutex)
// ============================================================================

struct RegistryState {
    /// Event name → dispatch-ordered listener sequence. A name with no
    /// listeners has no entry at all; dispatch treats absence as zero
    /// listeners.
    events: HashMap<String, Vec<Arc<ListenerRecord>>>,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    fn remove_registration(&mut self, reg_id: u64) {
        self.events.retain(|_, records| {
            records.retain(|record| record.reg_id != reg_id);
            !records.is_empty()
        });
    }
}

// ============================================================================
// EventRegistry
// ============================================================================

/// Named-event emitter: registration, identity-matched removal, synchronous
/// cancellable dispatch, fire-once listeners, and a suspend/resume switch.
///
/// Each instance owns its registry and pause flag exclusively; nothing is
/// shared across instances.
pub struct EventRegistry {
    state: Arc<Mutex<RegistryState>>,
    suspended: AtomicBool,
    next_reg_id: AtomicU64,
}

impl EventRegistry {
    /// Create a new, empty registry (not suspended).
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::new())),
            suspended: AtomicBool::new(false),
            next_reg_id: AtomicU64::new(1),
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register `callback` under each name in `events` (plus the catch-all),
    /// with the default context and no fixed params.
    ///
    /// `events` holds one or more names split on whitespace or a comma with
    /// optional trailing whitespace. A blank `events` string registers
    /// nothing and returns a no-op handle.
    ///
    /// Returns an [`Unsubscribe`] closure that removes exactly the records
    /// this call filed — including the catch-all record — and no others.
    pub fn on(
        &self,
        events: &str,
        callback: impl Fn(&Context, &[Value]) -> Flow + Send + Sync + 'static,
    ) -> Unsubscribe {
        self.register(events, Arc::new(callback), None, Vec::new(), false)
    }

    /// [`on`](Self::on) with an explicit context and fixed params.
    ///
    /// `context` defaults to the registry's own handle when `None` (so every
    /// listener has a usable context; see [`is_self_context`]). `params` are
    /// prepended to the emit arguments on every invocation.
    ///
    /// Takes the callback as a pre-built [`Callback`] so the caller can keep
    /// a clone for identity-matched removal via [`off_listener`].
    ///
    /// [`is_self_context`]: Self::is_self_context
    /// [`off_listener`]: Self::off_listener
    pub fn on_with(
        &self,
        events: &str,
        callback: Callback,
        context: Option<Context>,
        params: Vec<Value>,
    ) -> Unsubscribe {
        self.register(events, callback, context, params, false)
    }

    /// Like [`on`](Self::on), but each record fires at most once. The record
    /// is removed from the registry *before* its callback runs, per event
    /// name: a record under `"a"` and the catch-all fires once for `"a"` and
    /// once for `"all"`.
    pub fn once(
        &self,
        events: &str,
        callback: impl Fn(&Context, &[Value]) -> Flow + Send + Sync + 'static,
    ) -> Unsubscribe {
        self.register(events, Arc::new(callback), None, Vec::new(), true)
    }

    /// [`once`](Self::once) with an explicit context and fixed params.
    pub fn once_with(
        &self,
        events: &str,
        callback: Callback,
        context: Option<Context>,
        params: Vec<Value>,
    ) -> Unsubscribe {
        self.register(events, callback, context, params, true)
    }

    fn register(
        &self,
        events: &str,
        callback: Callback,
        context: Option<Context>,
        params: Vec<Value>,
        once: bool,
    ) -> Unsubscribe {
        let names = registration_targets(events);
        if names.is_empty() {
            return Box::new(|| {});
        }

        let reg_id = self.next_reg_id.fetch_add(1, Ordering::Relaxed);
        let context = context.unwrap_or_else(|| self.self_context());

        {
            let mut st = self.state.lock();
            for name in &names {
                st.events
                    .entry(name.clone())
                    .or_default()
                    .push(Arc::new(ListenerRecord {
                        reg_id,
                        callback: Arc::clone(&callback),
                        context: Arc::clone(&context),
                        params: params.clone(),
                        once,
                    }));
            }
        }

        let state = Arc::clone(&self.state);
        Box::new(move || {
            state.lock().remove_registration(reg_id);
        })
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove every listener under each name in `events`.
    ///
    /// Names are used literally — the catch-all is NOT appended here; only
    /// registration expands it. Removing `"click"` therefore leaves its
    /// catch-all records in place (they keep firing on `emit("all")`).
    ///
    /// Returns `true` iff every named event had an entry; a wholly absent
    /// name yields `false` but is not an error.
    pub fn off(&self, events: &str) -> bool {
        let names = parse_event_names(events);
        let mut st = self.state.lock();
        let mut all_present = true;
        for name in &names {
            all_present &= st.events.remove(name).is_some();
        }
        all_present
    }

    /// Remove listeners under each name in `events` whose callback is the
    /// same `Arc` as `callback`; when `context` is given the record's context
    /// must match too, otherwise matching is on callback alone.
    ///
    /// A present name with no matching record contributes success (nothing
    /// deleted); an absent name contributes `false` as in [`off`](Self::off).
    pub fn off_listener(
        &self,
        events: &str,
        callback: &Callback,
        context: Option<&Context>,
    ) -> bool {
        let names = parse_event_names(events);
        let mut st = self.state.lock();
        let mut all_present = true;
        for name in &names {
            let emptied = match st.events.get_mut(name) {
                Some(records) => {
                    records.retain(|record| {
                        !(Arc::ptr_eq(&record.callback, callback)
                            && context.map_or(true, |ctx| Arc::ptr_eq(&record.context, ctx)))
                    });
                    records.is_empty()
                }
                None => {
                    all_present = false;
                    false
                }
            };
            if emptied {
                st.events.remove(name);
            }
        }
        all_present
    }

    /// Drop every event name and every listener unconditionally.
    pub fn clear(&self) {
        self.state.lock().events.clear();
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Dispatch `args` to each name in `events`, left to right.
    ///
    /// While suspended this returns `true` immediately — listeners are never
    /// consulted and nothing is queued.
    ///
    /// Catch-all records are dispatched only when `"all"` itself appears in
    /// `events`; emitting `"click"` reaches `"click"`'s sequence alone.
    ///
    /// Per name, listeners run in registration order with the record's fixed
    /// params followed by `args`. A listener returning [`Flow::Cancel`] stops
    /// that name's remaining sequence; other names in the same call still
    /// dispatch. Returns `false` iff any dispatched name was cancelled; names
    /// with zero listeners contribute success.
    ///
    /// A panicking listener propagates to the caller and aborts the rest of
    /// the dispatch.
    pub fn emit(&self, events: &str, args: &[Value]) -> bool {
        if self.suspended.load(Ordering::Relaxed) {
            return true;
        }
        let mut ok = true;
        for name in &parse_event_names(events) {
            ok &= self.dispatch(name, args);
        }
        ok
    }

    /// Dispatch one event name's sequence over a snapshot taken up front.
    fn dispatch(&self, name: &str, args: &[Value]) -> bool {
        // Snapshot Arc references under the lock (cheap: ref-count bumps).
        let snapshot: Vec<Arc<ListenerRecord>> = {
            let st = self.state.lock();
            match st.events.get(name) {
                Some(records) => records.clone(),
                None => return true,
            }
        };

        // Lock is released — callbacks can safely re-enter the registry.
        for record in snapshot {
            // Once-records leave the live registry before their callback
            // runs; if a re-entrant emit already consumed this one, skip it.
            if record.once && !self.take_once(name, &record) {
                continue;
            }

            let flow = if record.params.is_empty() {
                (record.callback)(&record.context, args)
            } else {
                let mut call_args = record.params.clone();
                call_args.extend_from_slice(args);
                (record.callback)(&record.context, &call_args)
            };

            if flow.is_cancel() {
                return false;
            }
        }
        true
    }

    /// Excise a once-record from the live registry. Returns `false` if it
    /// was already gone (consumed by a re-entrant emit, or unregistered).
    fn take_once(&self, name: &str, record: &Arc<ListenerRecord>) -> bool {
        let mut st = self.state.lock();
        let Some(records) = st.events.get_mut(name) else {
            return false;
        };
        let Some(pos) = records.iter().position(|r| Arc::ptr_eq(r, record)) else {
            return false;
        };
        records.remove(pos);
        if records.is_empty() {
            st.events.remove(name);
        }
        true
    }

    // -----------------------------------------------------------------------
    // Suspend / resume
    // -----------------------------------------------------------------------

    /// Make every emit a no-op until [`resume`](Self::resume). Listener data
    /// is untouched.
    pub fn suspend(&self) {
        self.suspended.store(true, Ordering::Relaxed);
    }

    /// Re-enable dispatch. Emits that happened while suspended are not
    /// replayed — they were dropped, not queued.
    pub fn resume(&self) {
        self.suspended.store(false, Ordering::Relaxed);
    }

    /// Whether the registry is currently suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Relaxed)
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Snapshot of one event name's sequence, in dispatch order.
    ///
    /// The entries are clones sharing the callback/context `Arc`s; mutating
    /// the returned Vec never affects the registry. An absent name yields an
    /// empty Vec without creating an entry.
    pub fn listeners(&self, event: &str) -> Vec<ListenerEntry> {
        let st = self.state.lock();
        match st.events.get(event) {
            Some(records) => records.iter().map(|r| r.entry(event)).collect(),
            None => Vec::new(),
        }
    }

    /// Snapshot of the full name → sequence mapping (same snapshot contract
    /// as [`listeners`](Self::listeners)).
    pub fn all_listeners(&self) -> HashMap<String, Vec<ListenerEntry>> {
        let st = self.state.lock();
        st.events
            .iter()
            .map(|(name, records)| {
                let entries = records.iter().map(|r| r.entry(name)).collect();
                (name.clone(), entries)
            })
            .collect()
    }

    /// Number of listeners currently registered under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.state
            .lock()
            .events
            .get(event)
            .map_or(0, |records| records.len())
    }

    /// `true` when no event name has any listener.
    pub fn is_empty(&self) -> bool {
        self.state.lock().events.is_empty()
    }

    /// Whether `context` is this registry's own handle — the default handed
    /// to listeners registered without an explicit context.
    pub fn is_self_context(&self, context: &Context) -> bool {
        let own = self.self_context();
        Arc::ptr_eq(context, &own)
    }

    fn self_context(&self) -> Context {
        // Unsized coercion to `Arc<dyn Any + Send + Sync>` at the return site.
        let state = Arc::clone(&self.state);
        state
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}
