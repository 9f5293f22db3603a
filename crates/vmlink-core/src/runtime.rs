//! Host-runtime capability seam and handle types
//!
//! The bridge never talks to a concrete managed runtime directly. Everything
//! goes through [`HostRuntime`], a narrow trait mirroring the native-interop
//! call table the host supplies: attach/detach thread, class lookup, method-id
//! lookup, global-reference management, error-indicator check/clear, and void
//! dispatch. A JVM backend implements this over the raw function tables; tests
//! implement it with an in-process stub.

use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use crate::error::BridgeResult;

/// Thread-affine handle into the host runtime.
///
/// A handle obtained on one thread must never be used from another thread.
/// Each thread re-acquires its own handle through
/// [`HandleRegistry::current_environment`](crate::registry::HandleRegistry::current_environment);
/// the bridge never caches one across threads. The type is deliberately
/// `!Send`/`!Sync` (it wraps a raw pointer) so a handle cannot accidentally
/// migrate inside shared structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvHandle(*mut c_void);

impl EnvHandle {
    /// Wrap a raw environment pointer supplied by the host runtime
    pub fn from_raw(ptr: *mut c_void) -> Self {
        EnvHandle(ptr)
    }

    /// Get the raw environment pointer
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Check for a null handle
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// Raw reference to a host-runtime object.
///
/// Carries no ownership or lifetime information by itself; it is the value
/// the host runtime hands back from lookups and promotions. Ownership is
/// layered on top by [`LocalRef`] and [`GlobalRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawRef(*mut c_void);

// A raw reference is an inert token; whether it may be used from another
// thread is determined by the owning wrapper (`LocalRef` vs `GlobalRef`),
// not by the token itself. Only `EnvHandle` is thread-affine.
unsafe impl Send for RawRef {}

impl RawRef {
    /// Wrap a raw object reference
    pub fn from_raw(ptr: *mut c_void) -> Self {
        RawRef(ptr)
    }

    /// The null reference
    pub fn null() -> Self {
        RawRef(std::ptr::null_mut())
    }

    /// Get the raw pointer value
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Check for the null reference
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// Short-lived reference returned by a host-runtime lookup.
///
/// Valid only on the thread and within the native call that produced it.
/// Promote to a [`GlobalRef`] before storing.
#[derive(Debug)]
pub struct LocalRef(RawRef);

impl LocalRef {
    /// Wrap a raw local reference
    pub fn from_raw(raw: RawRef) -> Self {
        LocalRef(raw)
    }

    /// Get the underlying raw reference
    pub fn as_raw(&self) -> RawRef {
        self.0
    }
}

/// Opaque token identifying a resolved method on a given class.
///
/// Not reference-counted by the host runtime; valid as long as the owning
/// class reference has not been released. Stable across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(*mut c_void);

// Method identifiers are plain tokens into the host's class model; the host
// guarantees they are position-independent and thread-agnostic.
unsafe impl Send for MethodId {}
unsafe impl Sync for MethodId {}

impl MethodId {
    /// Wrap a raw method identifier
    pub fn from_raw(ptr: *mut c_void) -> Self {
        MethodId(ptr)
    }

    /// Get the raw identifier value
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Check for a null identifier
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// Narrow contract over the host's native-interop call table.
///
/// Implementations must be callable from any native thread; per-thread state
/// (the environment handle) is re-derived on every call that needs it rather
/// than cached inside the implementation.
pub trait HostRuntime: Send + Sync {
    /// Obtain the calling thread's environment handle, attaching the thread
    /// to the host runtime on first use.
    ///
    /// Calling this on an already-attached thread returns the existing
    /// handle; that idempotence belongs to the host runtime, not to any
    /// cache in the bridge.
    fn attach_current_thread(&self) -> BridgeResult<EnvHandle>;

    /// Detach the calling thread from the host runtime.
    ///
    /// Any environment handle previously obtained on this thread is invalid
    /// afterwards.
    fn detach_current_thread(&self);

    /// Look up a class by fully qualified name.
    ///
    /// Returns a short-lived local reference, or `None` if the host runtime
    /// reports no such class. A failed lookup may leave the host's error
    /// indicator set; the caller is responsible for clearing it.
    fn find_class(&self, env: EnvHandle, name: &str) -> Option<LocalRef>;

    /// Promote a reference to a persistent (global) reference.
    ///
    /// Returns `None` on promotion failure (e.g. reference-table exhaustion).
    fn new_global_ref(&self, env: EnvHandle, target: RawRef) -> Option<RawRef>;

    /// Release a persistent reference previously created by
    /// [`new_global_ref`](HostRuntime::new_global_ref).
    fn delete_global_ref(&self, env: EnvHandle, global: RawRef);

    /// Resolve an instance method by name and signature.
    ///
    /// The signature string uses the host runtime's own method-descriptor
    /// grammar and is passed through verbatim.
    fn get_method_id(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
    ) -> Option<MethodId>;

    /// Resolve a static method by name and signature.
    ///
    /// A name that exists only as an instance method must not resolve here.
    fn get_static_method_id(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
    ) -> Option<MethodId>;

    /// Check whether the host runtime has a pending error indicator
    fn exception_check(&self, env: EnvHandle) -> bool;

    /// Clear the host runtime's pending error indicator
    fn exception_clear(&self, env: EnvHandle);

    /// Dispatch a no-argument void call on `object` through `method`.
    ///
    /// Blocks according to the host runtime's own semantics; the bridge adds
    /// no timeout. A pending error indicator raised by the callee is cleared
    /// and surfaced as [`BridgeError::Invocation`](crate::error::BridgeError::Invocation).
    fn call_void_method(
        &self,
        env: EnvHandle,
        object: RawRef,
        method: MethodId,
    ) -> BridgeResult<()>;
}

/// Owning persistent reference to a host-runtime object.
///
/// Releases the underlying global reference on drop, re-attaching the current
/// thread if needed (the release may run on any thread).
pub struct GlobalRef {
    raw: RawRef,
    runtime: Arc<dyn HostRuntime>,
}

// The underlying global reference is valid on every attached thread; only the
// raw pointer inside RawRef blocks the auto impls.
unsafe impl Send for GlobalRef {}
unsafe impl Sync for GlobalRef {}

impl GlobalRef {
    /// Take ownership of a global reference created through `runtime`
    pub fn new(raw: RawRef, runtime: Arc<dyn HostRuntime>) -> Self {
        GlobalRef { raw, runtime }
    }

    /// Get the underlying raw reference.
    ///
    /// The value stays valid only while this `GlobalRef` is alive.
    pub fn as_raw(&self) -> RawRef {
        self.raw
    }
}

impl Drop for GlobalRef {
    fn drop(&mut self) {
        match self.runtime.attach_current_thread() {
            Ok(env) => self.runtime.delete_global_ref(env, self.raw),
            Err(e) => {
                // Nothing to unwind into here; the reference leaks until
                // process teardown.
                tracing::debug!(error = %e, "could not attach to release global reference");
            }
        }
    }
}

impl fmt::Debug for GlobalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalRef").field("raw", &self.raw).finish()
    }
}

/// Persistent reference to a resolved host class.
///
/// Returned by [`SymbolResolver::find_class_global`](crate::resolver::SymbolResolver::find_class_global).
/// The caller owns it and releases it by dropping; long-lived caches may hold
/// it for the process lifetime instead.
#[derive(Debug)]
pub struct ClassRef {
    global: GlobalRef,
    name: String,
}

impl ClassRef {
    /// Bundle an owned global reference with the class name it resolved from
    pub fn new(global: GlobalRef, name: impl Into<String>) -> Self {
        ClassRef {
            global,
            name: name.into(),
        }
    }

    /// Fully qualified name this class resolved from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the underlying raw class reference
    pub fn as_raw(&self) -> RawRef {
        self.global.as_raw()
    }
}
