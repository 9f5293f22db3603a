//! Error types for the bridge

use thiserror::Error;

/// Bridge operation result
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Symbol resolution failures
///
/// These are recoverable: the caller decides whether to fall back, degrade a
/// feature, or abort. Whenever one of these is returned, any pending error
/// indicator inside the host runtime has already been cleared, so the failure
/// cannot bleed into an unrelated subsequent call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The host runtime knows no class by this name
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// No method matches name + signature exactly on the given class
    #[error("method not found: {class}.{name}{signature}")]
    MethodNotFound {
        /// Class the lookup ran against
        class: String,
        /// Method name
        name: String,
        /// Host-runtime method descriptor, passed through verbatim
        signature: String,
    },

    /// Promotion to a persistent reference failed (reference-table exhaustion)
    #[error("global reference promotion failed for {0}")]
    ReferenceError(String),
}

/// Errors produced by bridge operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Handle registry initialized twice, or used before initialization.
    ///
    /// Fatal: host-runtime state is undefined past this point. The registry
    /// returns it as a value so the violation is observable in tests; the
    /// process entry shims are the abort boundary.
    #[error("startup violation: {0}")]
    Startup(&'static str),

    /// A symbol lookup failed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The calling thread could not obtain an environment handle.
    ///
    /// Fatal for this thread's ability to call into the host runtime; other
    /// threads are unaffected.
    #[error("thread attach failed: {0}")]
    ThreadAttach(String),

    /// A dispatched call raised an error inside the host runtime
    #[error("invocation failed: {0}")]
    Invocation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_display() {
        let err = ResolutionError::MethodNotFound {
            class: "com/example/Foo".to_string(),
            name: "bar".to_string(),
            signature: "()V".to_string(),
        };
        assert_eq!(err.to_string(), "method not found: com/example/Foo.bar()V");

        let err = ResolutionError::ClassNotFound("com/example/Missing".to_string());
        assert_eq!(err.to_string(), "class not found: com/example/Missing");
    }

    #[test]
    fn test_bridge_error_wraps_resolution() {
        let err: BridgeError = ResolutionError::ReferenceError("com/example/Foo".to_string()).into();
        assert_eq!(
            err.to_string(),
            "global reference promotion failed for com/example/Foo"
        );
    }
}
