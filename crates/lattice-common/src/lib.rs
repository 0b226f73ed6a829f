//! Shared foundation for the type lattice / scope construction workspace.
//!
//! This crate provides the ambient concerns every other crate leans on:
//! - Diagnostic types and a small, hand-written message table (`diagnostics`)
//! - Compiler-facing options (`options`)
//! - Centralized recursion/iteration limits (`limits`)
//! - Source span tracking (`span`)

pub mod diagnostics;
pub mod limits;
pub mod options;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCode, DiagnosticSink};
pub use options::LatticeOptions;
pub use span::Span;
