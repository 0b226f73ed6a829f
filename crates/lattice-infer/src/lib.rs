//! Flow-sensitive type inference (spec §4.F, §4.G): narrowing under
//! equality/truthiness/`typeof`/`instanceof`, and a dataflow fixpoint over
//! a function body that decorates variables with their inferred type.

mod cfg;
mod engine;
mod flow_state;
mod reverse_interpreter;

pub use cfg::{ControlFlowGraph, EdgeKind};
pub use engine::infer_function_body;
pub use flow_state::FlowState;
pub use reverse_interpreter::refine;
