//! JVM adapter for the bridge's host-runtime seam.
//!
//! [`JvmRuntime`] implements [`HostRuntime`] as thin, ordered sequences of
//! calls into the raw JNI tables plus error-indicator checks. Per-thread
//! environment acquisition goes through `GetEnv` first and falls back to
//! `AttachCurrentThread` only when the thread is detached, which keeps the
//! operation idempotent on already-attached threads.

use std::ffi::CString;
use std::ptr;

use vmlink_core::error::{BridgeError, BridgeResult};
use vmlink_core::runtime::{EnvHandle, HostRuntime, LocalRef, MethodId, RawRef};

use crate::sys;

/// Process-wide handle to the embedding JVM.
///
/// Wraps the single `JavaVM` pointer the host supplies at startup. Safe to
/// share across threads: the invocation table is explicitly multi-thread
/// capable, and every per-thread resource (the `JNIEnv`) is re-derived on
/// each call rather than stored.
#[derive(Debug)]
pub struct JvmRuntime {
    vm: *mut sys::JavaVM,
}

// The JavaVM pointer is valid process-wide; JNI requires it to be usable from
// any thread.
unsafe impl Send for JvmRuntime {}
unsafe impl Sync for JvmRuntime {}

impl JvmRuntime {
    /// Wrap the raw `JavaVM` pointer supplied by the host launcher.
    ///
    /// # Safety
    /// `vm` must be the process's live `JavaVM` pointer (or null, which is
    /// rejected); it must stay valid for the lifetime of the returned value.
    pub unsafe fn from_raw(vm: *mut sys::JavaVM) -> BridgeResult<Self> {
        if vm.is_null() {
            return Err(BridgeError::Startup("null virtual machine handle"));
        }
        Ok(JvmRuntime { vm })
    }

    fn env_ptr(env: EnvHandle) -> *mut sys::JNIEnv {
        env.as_ptr() as *mut sys::JNIEnv
    }
}

impl HostRuntime for JvmRuntime {
    fn attach_current_thread(&self) -> BridgeResult<EnvHandle> {
        unsafe {
            let mut env: *mut std::ffi::c_void = ptr::null_mut();
            let rc = ((**self.vm).GetEnv)(self.vm, &mut env, sys::JNI_VERSION_1_6);
            if rc == sys::JNI_OK {
                return Ok(EnvHandle::from_raw(env));
            }
            if rc != sys::JNI_EDETACHED {
                return Err(BridgeError::ThreadAttach(format!(
                    "GetEnv returned {rc}"
                )));
            }

            let rc = ((**self.vm).AttachCurrentThread)(self.vm, &mut env, ptr::null_mut());
            if rc != sys::JNI_OK || env.is_null() {
                tracing::error!(rc, "could not attach native thread to the virtual machine");
                return Err(BridgeError::ThreadAttach(format!(
                    "AttachCurrentThread returned {rc}"
                )));
            }
            Ok(EnvHandle::from_raw(env))
        }
    }

    fn detach_current_thread(&self) {
        unsafe {
            let rc = ((**self.vm).DetachCurrentThread)(self.vm);
            if rc != sys::JNI_OK {
                tracing::debug!(rc, "DetachCurrentThread failed");
            }
        }
    }

    fn find_class(&self, env: EnvHandle, name: &str) -> Option<LocalRef> {
        // Interior NULs cannot name a class; treat as not found.
        let name = CString::new(name).ok()?;
        unsafe {
            let env = Self::env_ptr(env);
            let class = ((**env).FindClass)(env, name.as_ptr());
            if class.is_null() {
                None
            } else {
                Some(LocalRef::from_raw(RawRef::from_raw(class)))
            }
        }
    }

    fn new_global_ref(&self, env: EnvHandle, target: RawRef) -> Option<RawRef> {
        unsafe {
            let env = Self::env_ptr(env);
            let global = ((**env).NewGlobalRef)(env, target.as_ptr());
            if global.is_null() {
                None
            } else {
                Some(RawRef::from_raw(global))
            }
        }
    }

    fn delete_global_ref(&self, env: EnvHandle, global: RawRef) {
        unsafe {
            let env = Self::env_ptr(env);
            ((**env).DeleteGlobalRef)(env, global.as_ptr());
        }
    }

    fn get_method_id(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
    ) -> Option<MethodId> {
        let name = CString::new(name).ok()?;
        let signature = CString::new(signature).ok()?;
        unsafe {
            let env = Self::env_ptr(env);
            let id = ((**env).GetMethodID)(env, class.as_ptr(), name.as_ptr(), signature.as_ptr());
            if id.is_null() {
                None
            } else {
                Some(MethodId::from_raw(id))
            }
        }
    }

    fn get_static_method_id(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
    ) -> Option<MethodId> {
        let name = CString::new(name).ok()?;
        let signature = CString::new(signature).ok()?;
        unsafe {
            let env = Self::env_ptr(env);
            let id = ((**env).GetStaticMethodID)(
                env,
                class.as_ptr(),
                name.as_ptr(),
                signature.as_ptr(),
            );
            if id.is_null() {
                None
            } else {
                Some(MethodId::from_raw(id))
            }
        }
    }

    fn exception_check(&self, env: EnvHandle) -> bool {
        unsafe {
            let env = Self::env_ptr(env);
            ((**env).ExceptionCheck)(env) != 0
        }
    }

    fn exception_clear(&self, env: EnvHandle) {
        unsafe {
            let env = Self::env_ptr(env);
            ((**env).ExceptionClear)(env);
        }
    }

    fn call_void_method(
        &self,
        env: EnvHandle,
        object: RawRef,
        method: MethodId,
    ) -> BridgeResult<()> {
        unsafe {
            let env = Self::env_ptr(env);
            let args: [sys::jvalue; 0] = [];
            ((**env).CallVoidMethodA)(env, object.as_ptr(), method.as_ptr(), args.as_ptr());
            if ((**env).ExceptionCheck)(env) != 0 {
                ((**env).ExceptionClear)(env);
                return Err(BridgeError::Invocation(
                    "host method raised an exception".to_string(),
                ));
            }
            Ok(())
        }
    }
}
