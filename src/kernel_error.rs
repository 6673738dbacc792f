//! KernelError: unified error type for topo-kernel public APIs
//!
//! Query methods report absent entities with `Option`/empty results; only
//! mutating and navigating entry points return this error.

use crate::topology::kind::EntKind;
use thiserror::Error;

/// Unified error type for kernel operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// An operation addressed a deleted or out-of-range slot.
    #[error("{kind} {index} does not exist (deleted or out of range)")]
    NotFound { kind: EntKind, index: usize },
    /// Navigation between two kinds that have no defined route.
    #[error("cannot navigate from {from} to {to} (starting at index {index})")]
    BadNavigation {
        from: EntKind,
        to: EntKind,
        index: usize,
    },
    /// An explicit precondition of a structural edit was violated.
    #[error("structural violation: {0}")]
    StructuralViolation(String),
    /// The triangulation routine rejected the input rings.
    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

impl KernelError {
    #[inline]
    pub(crate) fn not_found(kind: EntKind, index: usize) -> Self {
        KernelError::NotFound { kind, index }
    }

    #[inline]
    pub(crate) fn violation(msg: impl Into<String>) -> Self {
        KernelError::StructuralViolation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_kind_and_index() {
        let e = KernelError::not_found(EntKind::Wire, 7);
        assert_eq!(e.to_string(), "wire 7 does not exist (deleted or out of range)");
        let e = KernelError::BadNavigation {
            from: EntKind::Tri,
            to: EntKind::Edge,
            index: 3,
        };
        assert_eq!(
            e.to_string(),
            "cannot navigate from tri to edge (starting at index 3)"
        );
    }
}
