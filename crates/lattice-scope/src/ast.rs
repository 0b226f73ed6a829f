//! Abstract AST shapes consumed by the typed scope creator.
//!
//! The real parser is out of scope (spec §1); this module is the concrete
//! stand-in for its output, carrying exactly the shapes the special forms
//! in spec §4.D pattern-match on. Every node that can carry an annotation
//! embeds a `DocInfo` (spec's "optional parsed `DocInfo`" node slot).

use crate::doc_info::DocInfo;
use lattice_common::Span;

#[derive(Clone, Debug)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// One key of an object literal, with its own doc-comment (spec §4.D:
/// `F.prototype = {m1: ..., m2: ...}` — each key's annotation decides
/// declared-vs-inferred independently).
#[derive(Clone, Debug)]
pub struct ObjectProp {
    pub key: String,
    pub value: Expr,
    pub doc: DocInfo,
}

#[derive(Clone, Debug)]
pub struct FunctionLit {
    /// Present for `function F() {}`, absent for anonymous function
    /// expressions assigned elsewhere (`var F = function() {}`).
    pub name: Option<String>,
    pub params: Vec<String>,
    pub doc: DocInfo,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    This,
    /// `object.property`.
    Member(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
    New(Box<Expr>, Vec<Expr>),
    Assign(Box<Expr>, Box<Expr>),
    Function(Box<FunctionLit>),
    ObjectLiteral(Vec<ObjectProp>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    /// `==` when `strict` is false, `===` when true.
    Eq {
        strict: bool,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Typeof(Box<Expr>),
    InstanceOf(Box<Expr>, Box<Expr>),
}

#[derive(Clone, Debug)]
pub enum Stmt {
    VarDecl {
        name: String,
        init: Option<Expr>,
        doc: DocInfo,
        span: Span,
    },
    FunctionDecl(FunctionLit),
    /// A bare expression statement. `doc` carries any `@type` annotation
    /// attached to a stub property reference (spec §4.D: `/** @type T */
    /// x.y;`).
    ExprStmt {
        expr: Expr,
        span: Span,
        doc: DocInfo,
    },
    Block(Vec<Stmt>),
    If {
        test: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    For {
        init: Vec<Stmt>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
}

impl Expr {
    /// Flattens a `this`- or name-rooted member-access chain into a path,
    /// e.g. `F.prototype.m` -> `(Root::Name("F"), ["prototype", "m"])`.
    /// Returns `None` for expressions that aren't a pure member chain.
    #[must_use]
    pub fn flatten_path(&self) -> Option<(PathRoot, Vec<String>)> {
        fn go(expr: &Expr, segments: &mut Vec<String>) -> Option<PathRoot> {
            match expr {
                Expr::Ident(name) => Some(PathRoot::Name(name.clone())),
                Expr::This => Some(PathRoot::This),
                Expr::Member(obj, prop) => {
                    let root = go(obj, segments)?;
                    segments.push(prop.clone());
                    Some(root)
                }
                _ => None,
            }
        }
        let mut segments = Vec::new();
        let root = go(self, &mut segments)?;
        Some((root, segments))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathRoot {
    Name(String),
    This,
}
