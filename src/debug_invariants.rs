use crate::kernel_error::KernelError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Panic if an invariant is broken, when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), KernelError>;
}

/// Run a fallible check and panic on error when invariant checking is
/// enabled.
///
/// Only the `strict-invariants` and `check-invariants` features turn this
/// on. Composite edits pass through intermediate states that are not yet
/// consistent, so callers place it after a whole operation completes.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
