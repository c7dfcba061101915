//! Unifier failure modes.

use tl_common::Span;
use tl_types::{Type, TypeVar};

use crate::constraint::Constraint;

#[derive(Clone, Debug)]
pub enum UnificationError {
    TypeMismatch { expected: Type, actual: Type, span: Span },
    InfiniteType { var: TypeVar, ty: Type, span: Span },
    ArityMismatch { name: String, expected: usize, actual: usize, span: Span },
    /// A failure that occurred while solving a specific constraint in a
    /// `ConstraintSet`; wraps the underlying cause so the offending
    /// constraint is preserved for diagnostics.
    ConstraintSolvingFailed { constraint: Box<Constraint>, cause: Box<UnificationError> },
}

impl UnificationError {
    pub fn span(&self) -> Span {
        match self {
            UnificationError::TypeMismatch { span, .. }
            | UnificationError::InfiniteType { span, .. }
            | UnificationError::ArityMismatch { span, .. } => *span,
            UnificationError::ConstraintSolvingFailed { cause, .. } => cause.span(),
        }
    }
}
