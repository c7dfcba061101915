//! Line/column source locations, used only for diagnostic presentation.

use serde::{Deserialize, Serialize};

/// A 1-based line/column pair for presenting a [`crate::Span`] to a human.
///
/// The checker itself never computes these from source text (that is the
/// parser's job); callers that have line/column information available may
/// attach it to a [`crate::Diagnostic`] for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub character: u32,
}

impl SourceLocation {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}
