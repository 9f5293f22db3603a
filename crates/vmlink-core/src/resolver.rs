//! Class and method resolution
//!
//! Converts human-readable names into durable, invocable handles. The
//! resolver performs no caching: each call walks the host runtime's
//! name/signature lookup. That is cheap for cold paths but expensive when
//! repeated for the same symbol, so callers resolving hot-path methods should
//! hold on to the returned [`ClassRef`] and [`MethodId`] themselves
//! ([`MethodId`] is `Copy`, [`ClassRef`] can live for the process lifetime).
//!
//! All operations are read-only with respect to the host runtime's class
//! model; nothing here defines or modifies classes.

use crate::error::{BridgeResult, ResolutionError};
use crate::registry::HandleRegistry;
use crate::runtime::{ClassRef, EnvHandle, GlobalRef, HostRuntime, MethodId};

/// String-keyed symbol resolution over an initialized [`HandleRegistry`].
///
/// Stateless per call; construct one wherever a lookup is needed.
pub struct SymbolResolver<'a> {
    registry: &'a HandleRegistry,
}

impl<'a> SymbolResolver<'a> {
    /// Create a resolver backed by `registry`
    pub fn new(registry: &'a HandleRegistry) -> Self {
        SymbolResolver { registry }
    }

    /// Look up a class by fully qualified name and promote the short-lived
    /// lookup result to a persistent reference.
    ///
    /// The caller owns the returned [`ClassRef`] and releases it by dropping.
    /// Re-resolving the same name yields a second, independently releasable
    /// reference.
    ///
    /// # Errors
    /// - [`ResolutionError::ClassNotFound`] if the host runtime reports no
    ///   such class
    /// - [`ResolutionError::ReferenceError`] if promotion to a persistent
    ///   reference fails (reference-table exhaustion)
    ///
    /// Any pending host-runtime error indicator is cleared before either
    /// error is returned.
    pub fn find_class_global(&self, name: &str) -> BridgeResult<ClassRef> {
        let runtime = self.registry.runtime()?;
        let env = runtime.attach_current_thread()?;

        let local = match runtime.find_class(env, name) {
            Some(local) => local,
            None => {
                clear_pending(runtime.as_ref(), env);
                return Err(ResolutionError::ClassNotFound(name.to_string()).into());
            }
        };

        match runtime.new_global_ref(env, local.as_raw()) {
            Some(raw) => Ok(ClassRef::new(GlobalRef::new(raw, runtime), name)),
            None => {
                clear_pending(runtime.as_ref(), env);
                tracing::warn!(
                    class = name,
                    "global reference promotion failed, reference table under pressure"
                );
                Err(ResolutionError::ReferenceError(name.to_string()).into())
            }
        }
    }

    /// Resolve an instance method by name and signature.
    ///
    /// The signature string uses the host runtime's method-descriptor grammar
    /// and is passed through verbatim; no validation happens here.
    ///
    /// # Errors
    /// [`ResolutionError::MethodNotFound`] if no instance method matches
    /// name + signature exactly. The pending error indicator is cleared
    /// before returning.
    pub fn find_method(
        &self,
        class: &ClassRef,
        name: &str,
        signature: &str,
    ) -> BridgeResult<MethodId> {
        let runtime = self.registry.runtime()?;
        let env = runtime.attach_current_thread()?;

        match runtime.get_method_id(env, class.as_raw(), name, signature) {
            Some(id) => Ok(id),
            None => {
                clear_pending(runtime.as_ref(), env);
                Err(method_not_found(class, name, signature).into())
            }
        }
    }

    /// Resolve a static method by name and signature.
    ///
    /// Same contract as [`find_method`](SymbolResolver::find_method),
    /// restricted to static methods: a name that exists only as an instance
    /// method fails with [`ResolutionError::MethodNotFound`] rather than
    /// silently resolving the instance variant.
    pub fn find_static_method(
        &self,
        class: &ClassRef,
        name: &str,
        signature: &str,
    ) -> BridgeResult<MethodId> {
        let runtime = self.registry.runtime()?;
        let env = runtime.attach_current_thread()?;

        match runtime.get_static_method_id(env, class.as_raw(), name, signature) {
            Some(id) => Ok(id),
            None => {
                clear_pending(runtime.as_ref(), env);
                Err(method_not_found(class, name, signature).into())
            }
        }
    }
}

fn method_not_found(class: &ClassRef, name: &str, signature: &str) -> ResolutionError {
    ResolutionError::MethodNotFound {
        class: class.name().to_string(),
        name: name.to_string(),
        signature: signature.to_string(),
    }
}

fn clear_pending(runtime: &dyn HostRuntime, env: EnvHandle) {
    if runtime.exception_check(env) {
        runtime.exception_clear(env);
    }
}
