//! In-process stub host runtime backing the bridge integration tests.
//!
//! The stub models the pieces of a managed runtime the bridge touches:
//! per-thread environment handles (tagged with the creating thread so
//! cross-thread reuse is detectable), a class/method table, a global
//! reference table with an optional capacity budget, a pending error
//! indicator, and invocation counters.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::c_void;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use vmlink_core::error::{BridgeError, BridgeResult};
use vmlink_core::runtime::{EnvHandle, HostRuntime, LocalRef, MethodId, RawRef};

struct MethodEntry {
    name: String,
    signature: String,
    is_static: bool,
    id: usize,
}

struct Inner {
    next_handle: usize,
    /// class name -> class handle
    classes: HashMap<String, usize>,
    /// class handle -> declared methods
    methods: HashMap<usize, Vec<MethodEntry>>,
    /// attached threads and their env handles
    attached: HashMap<ThreadId, usize>,
    env_owner: HashMap<usize, ThreadId>,
    /// global handle -> referenced target handle
    globals: HashMap<usize, usize>,
    deleted_globals: usize,
    global_budget: Option<usize>,
    pending_exception: bool,
    affinity_violations: usize,
    /// method id -> dispatch count
    invocations: HashMap<usize, usize>,
    fail_attach: bool,
}

impl Inner {
    fn alloc(&mut self) -> usize {
        let h = self.next_handle;
        self.next_handle += 0x10;
        h
    }

    /// Follow a global handle back to the target it references.
    fn resolve_target(&self, raw: usize) -> usize {
        *self.globals.get(&raw).unwrap_or(&raw)
    }

    /// Validate that `env` belongs to the calling thread. Violations are
    /// recorded, not panicked on, so tests can assert on the counter.
    fn check_env(&mut self, env: EnvHandle) -> bool {
        let raw = env.as_ptr() as usize;
        match self.env_owner.get(&raw) {
            Some(owner) if *owner == thread::current().id() => true,
            _ => {
                self.affinity_violations += 1;
                false
            }
        }
    }
}

pub struct StubRuntime {
    inner: Mutex<Inner>,
}

impl StubRuntime {
    pub fn new() -> Self {
        StubRuntime {
            inner: Mutex::new(Inner {
                next_handle: 0x1000,
                classes: HashMap::new(),
                methods: HashMap::new(),
                attached: HashMap::new(),
                env_owner: HashMap::new(),
                globals: HashMap::new(),
                deleted_globals: 0,
                global_budget: None,
                pending_exception: false,
                affinity_violations: 0,
                invocations: HashMap::new(),
                fail_attach: false,
            }),
        }
    }

    pub fn add_class(&self, name: &str) {
        let mut inner = self.inner.lock();
        let handle = inner.alloc();
        inner.classes.insert(name.to_string(), handle);
        inner.methods.insert(handle, Vec::new());
    }

    pub fn add_method(&self, class: &str, name: &str, signature: &str, is_static: bool) {
        let mut inner = self.inner.lock();
        let id = inner.alloc();
        let class_handle = inner.classes[class];
        inner.methods.get_mut(&class_handle).unwrap().push(MethodEntry {
            name: name.to_string(),
            signature: signature.to_string(),
            is_static,
            id,
        });
    }

    /// Hand out a fresh object handle, as the host would for an application
    /// object it passes down to native code.
    pub fn alloc_object(&self) -> RawRef {
        let handle = self.inner.lock().alloc();
        RawRef::from_raw(handle as *mut c_void)
    }

    pub fn set_global_budget(&self, budget: usize) {
        self.inner.lock().global_budget = Some(budget);
    }

    pub fn set_fail_attach(&self, fail: bool) {
        self.inner.lock().fail_attach = fail;
    }

    pub fn live_globals(&self) -> usize {
        self.inner.lock().globals.len()
    }

    pub fn deleted_globals(&self) -> usize {
        self.inner.lock().deleted_globals
    }

    pub fn has_pending_exception(&self) -> bool {
        self.inner.lock().pending_exception
    }

    pub fn affinity_violations(&self) -> usize {
        self.inner.lock().affinity_violations
    }

    pub fn invocation_count(&self, method: MethodId) -> usize {
        let id = method.as_ptr() as usize;
        *self.inner.lock().invocations.get(&id).unwrap_or(&0)
    }
}

impl HostRuntime for StubRuntime {
    fn attach_current_thread(&self) -> BridgeResult<EnvHandle> {
        let mut inner = self.inner.lock();
        if inner.fail_attach {
            return Err(BridgeError::ThreadAttach(
                "stub configured to refuse attachment".to_string(),
            ));
        }
        let tid = thread::current().id();
        if let Some(env) = inner.attached.get(&tid) {
            return Ok(EnvHandle::from_raw(*env as *mut c_void));
        }
        let env = inner.alloc();
        inner.attached.insert(tid, env);
        inner.env_owner.insert(env, tid);
        Ok(EnvHandle::from_raw(env as *mut c_void))
    }

    fn detach_current_thread(&self) {
        let mut inner = self.inner.lock();
        let tid = thread::current().id();
        if let Some(env) = inner.attached.remove(&tid) {
            inner.env_owner.remove(&env);
        }
    }

    fn find_class(&self, env: EnvHandle, name: &str) -> Option<LocalRef> {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return None;
        }
        match inner.classes.get(name) {
            Some(handle) => Some(LocalRef::from_raw(RawRef::from_raw(*handle as *mut c_void))),
            None => {
                inner.pending_exception = true;
                None
            }
        }
    }

    fn new_global_ref(&self, env: EnvHandle, target: RawRef) -> Option<RawRef> {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return None;
        }
        if let Some(budget) = inner.global_budget {
            if inner.globals.len() >= budget {
                inner.pending_exception = true;
                return None;
            }
        }
        let global = inner.alloc();
        inner.globals.insert(global, target.as_ptr() as usize);
        Some(RawRef::from_raw(global as *mut c_void))
    }

    fn delete_global_ref(&self, env: EnvHandle, global: RawRef) {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return;
        }
        if inner.globals.remove(&(global.as_ptr() as usize)).is_some() {
            inner.deleted_globals += 1;
        }
    }

    fn get_method_id(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
    ) -> Option<MethodId> {
        self.lookup_method(env, class, name, signature, false)
    }

    fn get_static_method_id(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
    ) -> Option<MethodId> {
        self.lookup_method(env, class, name, signature, true)
    }

    fn exception_check(&self, env: EnvHandle) -> bool {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return false;
        }
        inner.pending_exception
    }

    fn exception_clear(&self, env: EnvHandle) {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return;
        }
        inner.pending_exception = false;
    }

    fn call_void_method(
        &self,
        env: EnvHandle,
        _object: RawRef,
        method: MethodId,
    ) -> BridgeResult<()> {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return Err(BridgeError::Invocation(
                "environment handle used off its owning thread".to_string(),
            ));
        }
        let id = method.as_ptr() as usize;
        *inner.invocations.entry(id).or_insert(0) += 1;
        Ok(())
    }
}

impl StubRuntime {
    fn lookup_method(
        &self,
        env: EnvHandle,
        class: RawRef,
        name: &str,
        signature: &str,
        is_static: bool,
    ) -> Option<MethodId> {
        let mut inner = self.inner.lock();
        if !inner.check_env(env) {
            return None;
        }
        let class_handle = inner.resolve_target(class.as_ptr() as usize);
        let found = inner.methods.get(&class_handle).and_then(|methods| {
            methods
                .iter()
                .find(|m| m.name == name && m.signature == signature && m.is_static == is_static)
                .map(|m| m.id)
        });
        match found {
            Some(id) => Some(MethodId::from_raw(id as *mut c_void)),
            None => {
                inner.pending_exception = true;
                None
            }
        }
    }
}
