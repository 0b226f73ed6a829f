//! Centralized recursion/iteration limits.
//!
//! Mirrors `tsz-common::limits`'s approach of naming every cap in one place
//! with its rationale attached, rather than sprinkling magic numbers through
//! the registry and inference engine.

/// Maximum number of times the dataflow fixpoint in `lattice-infer` will
/// revisit a CFG node before giving up and freezing the current state.
///
/// Spec §4.G argues termination is guaranteed because the reachable type set
/// is finite; this cap is a defensive backstop against a malformed CFG
/// (e.g. one with a cycle that doesn't correspond to a real loop) rather
/// than something expected to be hit in practice.
pub const MAX_FIXPOINT_ITERATIONS: usize = 10_000;

/// Maximum number of alternates a `Union` may carry before the registry
/// widens it to `Unknown` instead of growing further.
///
/// Prevents pathological union blowup (e.g. a variable reassigned in a
/// tight loop to N distinct literal types) from making every subsequent
/// lattice operation quadratic in the number of alternates.
pub const MAX_UNION_SIZE: usize = 64;

/// Maximum depth walked when following implicit-prototype chains during
/// subtyping or property lookup.
pub const MAX_PROTOTYPE_CHAIN_DEPTH: usize = 256;
