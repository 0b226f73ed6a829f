//! The control-flow-graph boundary (spec §4.E, "provided externally; the
//! core consumes successors/predecessors per node").
//!
//! No concrete CFG builder lives in this core — the parser and CFG
//! construction are out of scope (spec §1). `engine.rs` instead derives
//! the control flow it needs directly from `lattice_scope::ast::Stmt`'s
//! own structure (`Block`/`If`/`For` already encode successor edges for a
//! structured language with no `goto`/labeled-break), which is the graph
//! this trait describes. The trait remains as the documented seam an
//! externally-built CFG would implement for an engine operating over
//! flattened instruction nodes instead of structured statements.

/// One outgoing edge's condition. Unconditional edges arise from straight-
/// line statement sequencing; `True`/`False` edges arise from a branch's
/// two successors (spec §4.F's outcome parameter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Unconditional,
    True,
    False,
}

/// A control-flow graph over some externally-defined node type `Node`.
pub trait ControlFlowGraph {
    type Node: Copy + Eq;

    fn entry(&self) -> Self::Node;
    fn exit(&self) -> Self::Node;
    fn successors(&self, node: Self::Node) -> Vec<(Self::Node, EdgeKind)>;
    fn predecessors(&self, node: Self::Node) -> Vec<Self::Node>;
}
