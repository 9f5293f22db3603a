//! Entry point adapter
//!
//! The single seam between the host-embedding launcher and the native
//! application's real logic. The launcher calls [`main_real`] once per
//! process, after the handle registry has been initialized; the application
//! registers its real entry point with [`set_app_main`] ahead of time (what
//! that entry point does internally is none of the bridge's business).

use once_cell::sync::OnceCell;

use crate::error::{BridgeError, BridgeResult};
use crate::registry;

/// The native application's real entry point: process arguments in, exit
/// status out (0 success, non-zero failure).
pub type AppMain = fn(&[String]) -> i32;

static APP_MAIN: OnceCell<AppMain> = OnceCell::new();

/// Register the application entry point [`main_real`] dispatches to.
///
/// May be called at most once per process.
pub fn set_app_main(main: AppMain) -> BridgeResult<()> {
    APP_MAIN
        .set(main)
        .map_err(|_| BridgeError::Startup("application entry point already registered"))
}

/// Hand control to the native application's real entry point.
///
/// Invoked once per process by the host launcher. The returned exit status
/// propagates to the launcher's own process lifecycle.
///
/// # Errors
/// [`BridgeError::Startup`] if the handle registry has not been initialized
/// (host-runtime state would be undefined) or no entry point was registered.
/// Both are fatal; the caller terminates the process with a diagnostic.
pub fn main_real(args: &[String]) -> BridgeResult<i32> {
    if !registry::global().is_initialized() {
        return Err(BridgeError::Startup(
            "main_real called before handle registry initialization",
        ));
    }
    let main = APP_MAIN.get().ok_or(BridgeError::Startup(
        "no application entry point registered",
    ))?;

    tracing::debug!(argc = args.len(), "dispatching to application entry point");
    Ok(main(args))
}
