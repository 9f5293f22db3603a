//! Launcher-facing entry shims.
//!
//! Two C-ABI functions the host-embedding launcher calls:
//! [`vmlink_on_attach`] wires the bridge up from a live `JNIEnv` during the
//! host's startup callback, and [`vmlink_main_real`] hands control to the
//! native application's real entry point. These shims are the abort boundary
//! for startup violations: they log a diagnostic and return a failure status
//! instead of propagating an error value across the C ABI.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::sync::Arc;

use vmlink_core::runtime::RawRef;
use vmlink_core::{entry, registry};

use crate::sys;
use crate::vm::JvmRuntime;

/// Initialize the process-wide handle registry from a live environment.
///
/// Called once by the host's startup callback, on an attached thread. Derives
/// the process-wide `JavaVM` handle from `env`, promotes `app` to a global
/// reference and records `platform_version`.
///
/// Returns [`sys::JNI_OK`] on success, [`sys::JNI_ERR`] on any startup
/// violation (double initialization, null handles). Failure here means the
/// launcher must not call [`vmlink_main_real`].
///
/// # Safety
/// `env` must be the calling thread's valid `JNIEnv`; `app` must be a
/// reference valid for the duration of this call.
#[no_mangle]
pub unsafe extern "system" fn vmlink_on_attach(
    env: *mut sys::JNIEnv,
    app: sys::jobject,
    platform_version: sys::jint,
) -> sys::jint {
    if env.is_null() {
        tracing::error!("attach called with null environment");
        return sys::JNI_ERR;
    }

    let mut vm: *mut sys::JavaVM = std::ptr::null_mut();
    if ((**env).GetJavaVM)(env, &mut vm) != sys::JNI_OK {
        tracing::error!("could not derive virtual machine handle from environment");
        return sys::JNI_ERR;
    }

    let runtime = match JvmRuntime::from_raw(vm) {
        Ok(runtime) => Arc::new(runtime),
        Err(e) => {
            tracing::error!(error = %e, "virtual machine handle rejected");
            return sys::JNI_ERR;
        }
    };

    match registry::global().initialize(runtime, RawRef::from_raw(app), platform_version) {
        Ok(()) => sys::JNI_OK,
        Err(e) => {
            tracing::error!(error = %e, "bridge startup failed");
            sys::JNI_ERR
        }
    }
}

/// Hand control to the native application's real entry point.
///
/// Called once per process by the host launcher, after [`vmlink_on_attach`]
/// has succeeded. Returns the application's exit status (0 success, non-zero
/// failure); a startup violation yields 1 after logging a diagnostic.
///
/// # Safety
/// `argv` must either be null or point to at least `argc` valid
/// null-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn vmlink_main_real(argc: c_int, argv: *const *const c_char) -> c_int {
    let args = collect_args(argc, argv);
    match entry::main_real(&args) {
        Ok(status) => status,
        Err(e) => {
            tracing::error!(error = %e, "fatal: entry adapter precondition violated");
            1
        }
    }
}

/// Convert a C `argc`/`argv` pair into owned strings, stopping early at a
/// null entry. Invalid UTF-8 is replaced rather than rejected; argument
/// strings are opaque to the bridge.
unsafe fn collect_args(argc: c_int, argv: *const *const c_char) -> Vec<String> {
    let mut args = Vec::new();
    if argv.is_null() {
        return args;
    }
    for i in 0..argc.max(0) as isize {
        let arg = *argv.offset(i);
        if arg.is_null() {
            break;
        }
        args.push(CStr::from_ptr(arg).to_string_lossy().into_owned());
    }
    args
}
