//! The single abstract operation both strategies sit behind.
//!
//! Callers outside this crate never call `algorithmic` or `collect`
//! directly; `type_check_expression` picks the strategy from
//! `CheckerOptions` and hides the difference in shape (direct recursion vs.
//! collect-then-solve) behind one signature.

use tl_ast::Expression;
use tl_common::{CheckerOptions, Strategy};
use tl_context::TypeContext;
use tl_types::Type;

use crate::error::CheckError;

/// Type-checks `expr`, optionally against `expected`, using whichever
/// strategy `options` names. Returns the type substitution has already been
/// applied to (for the constraint-based strategy) or synthesized directly
/// (for the algorithmic strategy) — in both cases the returned type is
/// fully resolved, never containing unsolved fresh variables left over from
/// this expression's own constraints.
pub fn type_check_expression(
    ctx: &TypeContext,
    expr: &Expression,
    expected: Option<&Type>,
    options: &CheckerOptions,
    errors: &mut Vec<CheckError>,
) -> Type {
    let _recursion_scope = tl_common::RecursionScope::new(options.max_recursion_depth);
    match options.strategy {
        Strategy::Algorithmic => match expected {
            Some(expected_ty) => crate::algorithmic::check(ctx, expr, expected_ty, errors),
            None => crate::algorithmic::synthesize(ctx, expr, errors),
        },
        Strategy::ConstraintBased => {
            let (ty, constraints) = crate::collect::collect_constraints(ctx, expr, expected, errors);
            match tl_solver::solve(&constraints) {
                Ok(subst) => subst.apply(&ty),
                Err(err) => {
                    errors.push(CheckError::from(err));
                    ty
                }
            }
        }
    }
}
