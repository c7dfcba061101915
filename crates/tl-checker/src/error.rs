//! The checker's error taxonomy (component G's error model) and its
//! rendering into `tl_common::Diagnostic`.

use tl_common::{Diagnostic, Span};
use tl_solver::UnificationError;
use tl_types::Type;

#[derive(Clone, Debug)]
pub enum CheckError {
    UnresolvedSymbol { name: String, span: Span },
    TypeMismatch { expected: Type, actual: Type, span: Span },
    UndefinedType { type_name: String, span: Span },
    ArityMismatch { name: String, expected: usize, actual: usize, span: Span },
    InvalidOperation { op: String, operand_types: Vec<Type>, span: Span },
    NonExhaustiveMatch { missing_variants: Vec<String>, span: Span },
    DuplicateDefinition { name: String, span: Span },
    InfiniteType { var: String, ty: Type, span: Span },
    ConstraintSolvingFailed { span: Span, message: String },
    RecursionLimitExceeded { span: Span },
}

impl CheckError {
    pub fn span(&self) -> Span {
        match self {
            CheckError::UnresolvedSymbol { span, .. }
            | CheckError::TypeMismatch { span, .. }
            | CheckError::UndefinedType { span, .. }
            | CheckError::ArityMismatch { span, .. }
            | CheckError::InvalidOperation { span, .. }
            | CheckError::NonExhaustiveMatch { span, .. }
            | CheckError::DuplicateDefinition { span, .. }
            | CheckError::InfiniteType { span, .. }
            | CheckError::ConstraintSolvingFailed { span, .. }
            | CheckError::RecursionLimitExceeded { span, .. } => *span,
        }
    }

    /// Stable numeric diagnostic code per variant.
    pub fn code(&self) -> u32 {
        match self {
            CheckError::UnresolvedSymbol { .. } => 1001,
            CheckError::TypeMismatch { .. } => 1002,
            CheckError::UndefinedType { .. } => 1003,
            CheckError::ArityMismatch { .. } => 1004,
            CheckError::InvalidOperation { .. } => 1005,
            CheckError::NonExhaustiveMatch { .. } => 1006,
            CheckError::DuplicateDefinition { .. } => 1007,
            CheckError::InfiniteType { .. } => 1008,
            CheckError::ConstraintSolvingFailed { .. } => 1009,
            CheckError::RecursionLimitExceeded { .. } => 1010,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            CheckError::UnresolvedSymbol { name, .. } => format!("unresolved symbol `{name}`"),
            CheckError::TypeMismatch { expected, actual, .. } => {
                format!("type mismatch: expected `{expected:?}`, found `{actual:?}`")
            }
            CheckError::UndefinedType { type_name, .. } => format!("undefined type `{type_name}`"),
            CheckError::ArityMismatch { name, expected, actual, .. } => format!(
                "`{name}` expects {expected} argument(s), found {actual}"
            ),
            CheckError::InvalidOperation { op, operand_types, .. } => format!(
                "invalid operation `{op}` on {operand_types:?}"
            ),
            CheckError::NonExhaustiveMatch { missing_variants, .. } => format!(
                "non-exhaustive match, missing: {}",
                missing_variants.join(", ")
            ),
            CheckError::DuplicateDefinition { name, .. } => format!("duplicate definition of `{name}`"),
            CheckError::InfiniteType { var, ty, .. } => {
                format!("infinite type: `{var}` occurs in `{ty:?}`")
            }
            CheckError::ConstraintSolvingFailed { message, .. } => message.clone(),
            CheckError::RecursionLimitExceeded { .. } => {
                "expression nested too deeply for the checker's recursion limit".to_string()
            }
        };
        Diagnostic::error(self.code(), self.span(), message)
    }
}

impl From<UnificationError> for CheckError {
    fn from(err: UnificationError) -> Self {
        match err {
            UnificationError::TypeMismatch { expected, actual, span } => {
                CheckError::TypeMismatch { expected, actual, span }
            }
            UnificationError::InfiniteType { var, ty, span } => {
                CheckError::InfiniteType { var: var.0, ty, span }
            }
            UnificationError::ArityMismatch { name, expected, actual, span } => {
                CheckError::ArityMismatch { name, expected, actual, span }
            }
            UnificationError::ConstraintSolvingFailed { constraint, cause } => {
                let span = constraint.span();
                CheckError::ConstraintSolvingFailed {
                    span,
                    message: format!("failed to solve constraint: {}", CheckError::from(*cause).to_diagnostic().message),
                }
            }
        }
    }
}

/// Uniform multi-error envelope returned at the program boundary, even when
/// there is exactly one error.
#[derive(Clone, Debug, Default)]
pub struct MultipleErrors {
    pub errors: Vec<CheckError>,
}

impl MultipleErrors {
    pub fn new(errors: Vec<CheckError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_rendered(&self) -> tl_common::MultipleErrors {
        tl_common::MultipleErrors {
            diagnostics: self.errors.iter().map(CheckError::to_diagnostic).collect(),
        }
    }
}
