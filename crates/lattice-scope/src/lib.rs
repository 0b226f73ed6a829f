//! Lexical scopes, doc-comment interpretation, and the typed scope creator
//! (spec §4.B–§4.D): the first pass over an AST that declares every name,
//! materializes nominal types, and registers the properties visible before
//! any flow-sensitive inference runs.

mod alias;
mod ast;
mod creator;
mod doc_info;
mod global_this;
mod scope;

pub use alias::{is_aliasable_nominal, is_pure_reference, should_alias};
pub use ast::{
    BinOp, Expr, FunctionLit, Literal, LogicalOp, ObjectProp, PathRoot, Stmt,
};
pub use creator::TypedScopeCreator;
pub use doc_info::{DocInfo, DocInfoAdapter, NominalKind, TypeExpr};
pub use global_this::create_or_link as create_global_this;
pub use scope::{FunctionScopeInfo, Scope, ScopeId, ScopeTree, Var};
