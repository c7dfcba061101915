//! Mutability and type checking for `Assignment` statements, shared by both
//! strategies.

use tl_ast::Assignment;
use tl_context::TypeContext;
use tl_solver::{Constraint, ConstraintSet};

use crate::error::CheckError;

/// Validates the target exists and is mutable; returns its declared type
/// (or `None` if the target is unresolved, in which case an error was
/// already pushed and the caller should not add further constraints).
fn validate_target<'a>(
    ctx: &'a TypeContext,
    assignment: &Assignment,
    errors: &mut Vec<CheckError>,
) -> Option<tl_types::Type> {
    let Some(binding) = ctx.lookup_variable(&assignment.name) else {
        errors.push(CheckError::UnresolvedSymbol { name: assignment.name.clone(), span: assignment.span });
        return None;
    };
    if !binding.mutable {
        errors.push(CheckError::InvalidOperation {
            op: "assign".to_string(),
            operand_types: vec![binding.scheme.ty.clone()],
            span: assignment.span,
        });
        return None;
    }
    Some(binding.scheme.ty.clone())
}

/// Constraint-based variant: collects the value's constraints and emits an
/// equality constraint against the declared type.
pub fn check_assignment_constraints(
    ctx: &TypeContext,
    assignment: &Assignment,
    set: &mut ConstraintSet,
    errors: &mut Vec<CheckError>,
) {
    let (value_ty, value_set) = crate::collect::collect_inner(ctx, &assignment.value, errors);
    set.merge(value_set);
    if let Some(declared_ty) = validate_target(ctx, assignment, errors) {
        set.add(Constraint::equality(value_ty, declared_ty, assignment.span));
    }
}

/// Algorithmic variant: synthesizes the value's type directly and compares
/// it to the declared type immediately.
pub fn check_assignment_algorithmic(ctx: &TypeContext, assignment: &Assignment, errors: &mut Vec<CheckError>) {
    let value_ty = crate::algorithmic::synthesize(ctx, &assignment.value, errors);
    if let Some(declared_ty) = validate_target(ctx, assignment, errors) {
        if !tl_types::are_equal(&value_ty, &declared_ty) {
            errors.push(CheckError::TypeMismatch {
                expected: declared_ty,
                actual: value_ty,
                span: assignment.span,
            });
        }
    }
}
