//! The rendered diagnostic shape. Error *variants* are defined in `tl-checker`
//! as `CheckError` (they need to reference `Type`, which would create a
//! cycle if it lived here); this module only defines the presentation-layer
//! record every variant renders into via `CheckError::to_diagnostic`.

use serde::{Deserialize, Serialize};

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub span: Span,
    pub message: String,
}

/// A single rendered diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// A stable numeric code per error variant, so tooling can filter or
    /// suppress by code the way a production compiler's diagnostics do.
    pub code: u32,
    pub span: Span,
    pub message: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(code: u32, span: Span, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            span,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            span,
            message: message.into(),
        });
        self
    }
}

/// Uniform multi-error envelope used for serialization at the program
/// boundary (e.g. to JSON for an LSP host or a test fixture comparison).
/// `tl-checker::MultipleErrors` wraps the typed `CheckError` list this is
/// rendered from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleErrors {
    pub diagnostics: Vec<Diagnostic>,
}
