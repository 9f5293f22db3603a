//! Callable handles
//!
//! A [`Callable`] bundles an environment handle, a target object reference
//! and a resolved method identifier: "this method, on this object, ready to
//! invoke". Resolution already happened through
//! [`SymbolResolver`](crate::resolver::SymbolResolver); constructing a
//! callable does not re-validate that the method belongs to the object's
//! class. A mismatch surfaces at invocation time, inside the host runtime.

use crate::error::BridgeResult;
use crate::registry::HandleRegistry;
use crate::runtime::{EnvHandle, MethodId, RawRef};

/// A fully resolved invocation target.
///
/// The `object` and `method` fields are stable and reusable across threads
/// (the object must be backed by a persistent reference). The `environment`
/// field is thread-affine: after the callable crosses a thread boundary,
/// [`refresh`](Callable::refresh) must run before the environment is used
/// again. [`invoke_void`](Callable::invoke_void) refreshes unconditionally,
/// so it is safe from any thread.
#[derive(Debug)]
pub struct Callable {
    env: EnvHandle,
    object: RawRef,
    method: MethodId,
}

// `env` is only valid on the thread that last refreshed it; `object` and
// `method` are stable. Crossing threads is allowed because every dispatch
// path re-acquires the environment first.
unsafe impl Send for Callable {}

impl Callable {
    /// Bundle an existing environment handle with a target and method.
    ///
    /// `object` must be backed by a persistent reference that outlives the
    /// callable; `method` must have been resolved against that object's class
    /// (or, for static dispatch, against the class itself).
    pub fn new(env: EnvHandle, object: RawRef, method: MethodId) -> Self {
        Callable {
            env,
            object,
            method,
        }
    }

    /// Build a callable for the current thread, acquiring the environment
    /// handle from `registry`.
    pub fn bind(
        registry: &HandleRegistry,
        object: RawRef,
        method: MethodId,
    ) -> BridgeResult<Self> {
        let env = registry.current_environment()?;
        Ok(Callable::new(env, object, method))
    }

    /// Re-acquire the environment handle for the calling thread.
    ///
    /// Required before using [`env`](Callable::env) on any thread other than
    /// the one that built (or last refreshed) this callable.
    pub fn refresh(&mut self, registry: &HandleRegistry) -> BridgeResult<EnvHandle> {
        self.env = registry.current_environment()?;
        Ok(self.env)
    }

    /// Dispatch a no-argument void call to the bound method.
    ///
    /// Refreshes the environment for the calling thread first, then routes
    /// the call through the registry's host runtime.
    pub fn invoke_void(&mut self, registry: &HandleRegistry) -> BridgeResult<()> {
        let env = self.refresh(registry)?;
        let runtime = registry.runtime()?;
        runtime.call_void_method(env, self.object, self.method)
    }

    /// The environment handle captured at construction or last refresh.
    ///
    /// Only valid on the thread that produced it.
    pub fn env(&self) -> EnvHandle {
        self.env
    }

    /// The bound target object reference
    pub fn object(&self) -> RawRef {
        self.object
    }

    /// The bound method identifier
    pub fn method(&self) -> MethodId {
        self.method
    }
}
