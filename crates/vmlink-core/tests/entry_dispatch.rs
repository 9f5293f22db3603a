//! Entry adapter dispatch over an initialized process registry.
//!
//! Runs in its own test binary because it initializes the process-wide
//! registry; ordering inside the single test function is what makes the
//! before/after assertions deterministic.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::StubRuntime;
use vmlink_core::error::BridgeError;
use vmlink_core::{entry, registry};

static CALLS: AtomicUsize = AtomicUsize::new(0);

fn app_main(args: &[String]) -> i32 {
    CALLS.fetch_add(1, Ordering::SeqCst);
    assert_eq!(args.len(), 2);
    assert_eq!(args[0], "app");
    assert_eq!(args[1], "--fast");
    7
}

#[test]
fn test_main_real_dispatches_once_registered_and_initialized() {
    entry::set_app_main(app_main).unwrap();

    // Registered but not initialized: still a startup violation.
    let args = vec!["app".to_string(), "--fast".to_string()];
    assert!(matches!(
        entry::main_real(&args),
        Err(BridgeError::Startup(_))
    ));
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);

    let stub = Arc::new(StubRuntime::new());
    let app = stub.alloc_object();
    registry::global().initialize(stub, app, 30).unwrap();

    // Exit status propagates verbatim.
    assert_eq!(entry::main_real(&args).unwrap(), 7);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);

    // The registration hook is one-shot.
    assert!(matches!(
        entry::set_app_main(app_main),
        Err(BridgeError::Startup(_))
    ));
}
