//! Vmlink bridge core
//!
//! This crate lets a native process resolve and invoke methods on a managed
//! runtime host without compile-time bindings generated from the host's class
//! definitions. It provides:
//! - Handle registry (process-wide VM handle, application reference, platform version)
//! - Class/method resolver (string-keyed, signature-qualified lookup)
//! - Callable handles (resolved `{environment, object, method}` triples)
//! - Entry point adapter (`main_real`)
//!
//! The host runtime itself is reached only through the [`runtime::HostRuntime`]
//! capability trait, so the same bridge can target any managed-runtime host
//! (or a test stub) that exposes attach/detach, class and method lookup,
//! global-reference management and an error indicator.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod callable;
pub mod entry;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod runtime;

pub use callable::Callable;
pub use error::{BridgeError, BridgeResult, ResolutionError};
pub use registry::HandleRegistry;
pub use resolver::SymbolResolver;
pub use runtime::{ClassRef, EnvHandle, GlobalRef, HostRuntime, LocalRef, MethodId, RawRef};
