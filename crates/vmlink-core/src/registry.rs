//! Handle registry
//!
//! Process-wide state needed to bootstrap any class/method resolution: the
//! host VM handle (as a [`HostRuntime`] capability), the host application
//! reference, and the platform version marker. Initialized exactly once when
//! the native process attaches to the host runtime; immutable afterwards, so
//! reads take no lock. Torn down at process exit.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{BridgeError, BridgeResult};
use crate::runtime::{EnvHandle, GlobalRef, HostRuntime, RawRef};

struct RegistryState {
    runtime: Arc<dyn HostRuntime>,
    app: GlobalRef,
    platform_version: i32,
}

/// Process-wide bridge state with a one-time-init lifecycle.
///
/// The write-once cell makes concurrent first-use races safe: exactly one
/// `initialize` call publishes state, every other call observes
/// [`BridgeError::Startup`]. All accessors fail with the same error before
/// initialization.
pub struct HandleRegistry {
    state: OnceCell<RegistryState>,
}

impl HandleRegistry {
    /// Create an uninitialized registry.
    ///
    /// Production code uses the process singleton from [`global`]; separate
    /// instances exist so the lifecycle is testable.
    pub const fn new() -> Self {
        HandleRegistry {
            state: OnceCell::new(),
        }
    }

    /// Store the VM handle, promote the application reference to a persistent
    /// reference, and record the platform version marker.
    ///
    /// Called exactly once, during process attach to the host runtime. Fails
    /// with [`BridgeError::Startup`] if called twice or if `app` is null;
    /// previously published state is never overwritten.
    pub fn initialize(
        &self,
        runtime: Arc<dyn HostRuntime>,
        app: RawRef,
        platform_version: i32,
    ) -> BridgeResult<()> {
        if self.state.get().is_some() {
            return Err(BridgeError::Startup("handle registry already initialized"));
        }
        if app.is_null() {
            return Err(BridgeError::Startup("null host application reference"));
        }

        let env = runtime.attach_current_thread()?;
        let raw = runtime
            .new_global_ref(env, app)
            .ok_or(BridgeError::Startup(
                "failed to promote host application reference",
            ))?;
        let app = GlobalRef::new(raw, runtime.clone());

        let state = RegistryState {
            runtime,
            app,
            platform_version,
        };
        // If another thread won the race between the check above and here,
        // the losing state (and its freshly promoted reference) is dropped.
        self.state
            .set(state)
            .map_err(|_| BridgeError::Startup("handle registry already initialized"))?;

        tracing::debug!(platform_version, "handle registry initialized");
        Ok(())
    }

    /// Whether `initialize` has completed on this registry
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// The calling thread's environment handle, attaching the thread to the
    /// host runtime on first use.
    ///
    /// Safe to call from any native thread. The returned handle is
    /// thread-affine: never pass it to another thread.
    pub fn current_environment(&self) -> BridgeResult<EnvHandle> {
        self.get()?.runtime.attach_current_thread()
    }

    /// Detach the calling thread from the host runtime.
    ///
    /// Call before a bridge-attached native thread exits; environment handles
    /// obtained on this thread are invalid afterwards.
    pub fn detach_current_thread(&self) -> BridgeResult<()> {
        self.get()?.runtime.detach_current_thread();
        Ok(())
    }

    /// The host-runtime capability stored at initialization
    pub fn runtime(&self) -> BridgeResult<Arc<dyn HostRuntime>> {
        Ok(self.get()?.runtime.clone())
    }

    /// Persistent reference to the host application object.
    ///
    /// Owned by the registry for the process lifetime; the returned raw value
    /// is safe to share read-only across threads.
    pub fn app_reference(&self) -> BridgeResult<RawRef> {
        Ok(self.get()?.app.as_raw())
    }

    /// Host platform API level, set once at startup
    pub fn platform_version(&self) -> BridgeResult<i32> {
        Ok(self.get()?.platform_version)
    }

    fn get(&self) -> BridgeResult<&RegistryState> {
        self.state
            .get()
            .ok_or(BridgeError::Startup("handle registry used before initialization"))
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry instance.
///
/// The host runtime is a singleton per process, so the bridge state is too.
pub fn global() -> &'static HandleRegistry {
    static REGISTRY: HandleRegistry = HandleRegistry::new();
    &REGISTRY
}
