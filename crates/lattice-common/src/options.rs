//! Configuration the scope creator and inference engine branch on.
//!
//! Grounded in `tsz-common::checker_options`'s `CheckerOptions`, trimmed to
//! just the flags this core's own behavior depends on — downstream checking
//! passes carry their own, much larger options struct.

/// Options governing type lattice and scope construction behavior.
#[derive(Debug, Clone)]
pub struct LatticeOptions {
    /// When true, property access on a possibly-null-or-void receiver is
    /// implicitly narrowed via `restrict_not_null_or_void` before lookup
    /// instead of requiring an explicit guard upstream.
    pub strict_null_checks: bool,
    /// Cap on dataflow fixpoint iterations (see `crate::limits::MAX_FIXPOINT_ITERATIONS`).
    pub max_fixpoint_iterations: usize,
    /// Cap on union alternate count (see `crate::limits::MAX_UNION_SIZE`).
    pub max_union_size: usize,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        LatticeOptions {
            strict_null_checks: false,
            max_fixpoint_iterations: crate::limits::MAX_FIXPOINT_ITERATIONS,
            max_union_size: crate::limits::MAX_UNION_SIZE,
        }
    }
}
