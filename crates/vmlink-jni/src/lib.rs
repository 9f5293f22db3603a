//! JVM backend for the vmlink bridge.
//!
//! Binds the host-runtime seam from `vmlink-core` to a real JVM:
//! - [`sys`]: raw JNI types and the slices of the interface tables the
//!   bridge calls
//! - [`vm`]: [`JvmRuntime`], the `HostRuntime` adapter over those tables
//! - [`entry`]: the C-ABI shims the host-embedding launcher calls
//!
//! Built as `cdylib`/`staticlib` so the host launcher can link it directly.

pub mod entry;
pub mod sys;
pub mod vm;

pub use vm::JvmRuntime;
