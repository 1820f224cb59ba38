//! Tests for the suspend/resume switch.

use std::sync::{Arc, Mutex};

use event_registry::{EventRegistry, Flow};

fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn suspended_emit_skips_listeners_and_returns_true() {
    let registry = EventRegistry::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);

    registry.on("event", move |_ctx, _args| {
        log_clone.lock().unwrap().push("cb".to_string());
        Flow::Continue
    });

    registry.suspend();
    assert!(registry.is_suspended());
    assert!(registry.emit("event", &[]), "suspended emit is a neutral success");
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn resume_restores_dispatch_without_replaying() {
    let registry = EventRegistry::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);

    registry.on("event", move |_ctx, _args| {
        log_clone.lock().unwrap().push("cb".to_string());
        Flow::Continue
    });

    registry.suspend();
    registry.emit("event", &[]);
    registry.emit("event", &[]);

    registry.resume();
    assert!(!registry.is_suspended());
    // Nothing replayed: the suspended emits are gone for good.
    assert!(log.lock().unwrap().is_empty());

    registry.emit("event", &[]);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn suspension_leaves_listener_data_untouched() {
    let registry = EventRegistry::new();
    registry.on("event", |_ctx, _args| Flow::Continue);

    registry.suspend();
    assert_eq!(registry.listener_count("event"), 1);
    registry.resume();
    assert_eq!(registry.listener_count("event"), 1);
}

#[test]
fn suspended_emit_does_not_consume_once_listeners() {
    let registry = EventRegistry::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);

    registry.once("event", move |_ctx, _args| {
        log_clone.lock().unwrap().push("cb".to_string());
        Flow::Continue
    });

    registry.suspend();
    registry.emit("event", &[]);
    registry.resume();

    registry.emit("event", &[]);
    assert_eq!(log.lock().unwrap().len(), 1, "once survives a suspended emit");
}
