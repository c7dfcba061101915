//! Common types shared by every crate of the TL type checker.
//!
//! This crate provides foundational pieces that the type model, context,
//! solver and checker crates all depend on, so that none of them need to
//! depend on each other just to share a span type:
//! - Source spans (`Span`) and line/column locations (`SourceLocation`)
//! - The diagnostic rendering model (`Diagnostic`, `MultipleErrors`)
//! - Checker configuration (`CheckerOptions`)
//! - Recursion-depth guarding for the checker's recursive descents

pub mod span;
pub use span::Span;

pub mod position;
pub use position::SourceLocation;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, MultipleErrors};

pub mod checker_options;
pub use checker_options::{CheckerOptions, Strategy};

pub mod recursion;
pub use recursion::{RecursionGuard, RecursionScope};
