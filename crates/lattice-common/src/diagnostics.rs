//! Diagnostic types for the type lattice core.
//!
//! Errors are accumulated, never interrupt analysis (spec §7): every
//! non-internal failure mode pushes a `Diagnostic` onto a `DiagnosticSink`
//! and the offending expression is typed `Unknown` so the rest of the pass
//! proceeds undisturbed.

use crate::span::Span;

/// Diagnostic severity, mirrored from the teacher compiler's diagnostic
/// category split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
}

/// Structured diagnostic codes this core can emit. Downstream checking
/// passes define their own codes (e.g. `TYPE_MISMATCH`); this core only
/// owns the ones listed in spec §6/§7.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCode {
    /// A doc-comment type expression failed to parse; the annotation site
    /// is typed `Unknown` and analysis proceeds.
    ParseError,
    /// `goog.reflect.object(ctor, {...})` was called with a first argument
    /// that does not resolve to a constructor.
    ConstructorExpected,
    /// `goog.reflect.object(ctor, {...})` was called with a second argument
    /// that is not an object literal.
    ObjectLiteralExpected,
    /// Two non-extern declarations of the same qualified name collided with
    /// incompatible types (SPEC_FULL §4.4 — extern duplicates stay silent
    /// per spec.md's open question, program-authored duplicates are not).
    DuplicateNominalDeclaration,
}

impl DiagnosticCode {
    #[must_use]
    pub const fn default_category(self) -> DiagnosticCategory {
        match self {
            DiagnosticCode::ParseError => DiagnosticCategory::Warning,
            DiagnosticCode::ConstructorExpected => DiagnosticCategory::Error,
            DiagnosticCode::ObjectLiteralExpected => DiagnosticCategory::Error,
            DiagnosticCode::DuplicateNominalDeclaration => DiagnosticCategory::Warning,
        }
    }
}

/// A single diagnostic. `span` is caller-relative; this core does not know
/// about files, so there is no `file` field the way the teacher's full
/// `Diagnostic` carries one — callers stamp file identity themselves when
/// surfacing these to a user.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub category: DiagnosticCategory,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            code,
            category: code.default_category(),
            message: message.into(),
            span,
        }
    }
}

/// Accumulates diagnostics without ever aborting analysis.
///
/// Internal invariant violations (spec §7 "Internal" taxonomy) are *not*
/// routed through this trait — those are bugs, not inputs, and the core
/// asserts/panics on them instead (see `debug_assert!` call sites in
/// `lattice-types`).
pub trait DiagnosticSink {
    fn push(&mut self, diagnostic: Diagnostic);
}

/// Default in-memory sink: just a growable log of diagnostics.
#[derive(Default, Debug)]
pub struct DiagnosticVec(Vec<Diagnostic>);

impl DiagnosticVec {
    #[must_use]
    pub fn new() -> Self {
        DiagnosticVec::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl DiagnosticSink for DiagnosticVec {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }
}
