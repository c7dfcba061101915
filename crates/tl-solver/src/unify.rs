//! The Robinson-style unifier (component E).

use tl_common::Span;
use tl_subst::Substitution;
use tl_types::{are_equal, contains_type_variable, type_variable_name, Type, TypeScheme, TypeVar};

use crate::constraint::{Constraint, ConstraintSet};
use crate::error::UnificationError;

/// Instantiates a scheme by replacing every quantified variable with a
/// fresh one.
pub fn instantiate(scheme: &TypeScheme) -> Type {
    let mut sigma = Substitution::empty();
    for v in &scheme.quantified_vars {
        sigma = sigma.extend(v.clone(), tl_types::fresh_var());
    }
    sigma.apply(&scheme.ty)
}

fn bind(name: &str, target: &Type, span: Span) -> Result<Substitution, UnificationError> {
    let var = TypeVar::new(name);
    if contains_type_variable(target, &var) {
        tracing::debug!(var = %var.0, ty = ?target, "occurs check failed");
        return Err(UnificationError::InfiniteType { var, ty: target.clone(), span });
    }
    Ok(Substitution::single(var, target.clone()))
}

/// Most-general unifier of two types. Entry point for `Equality`
/// constraints and for the algorithmic strategy's direct type comparisons.
pub fn unify_types(a: &Type, b: &Type, span: Span) -> Result<Substitution, UnificationError> {
    if are_equal(a, b) {
        return Ok(Substitution::empty());
    }
    if let Some(name) = type_variable_name(a) {
        return bind(name, b, span);
    }
    if let Some(name) = type_variable_name(b) {
        return bind(name, a, span);
    }
    match (a, b) {
        (Type::Generic { name: n1, args: a1, .. }, Type::Generic { name: n2, args: a2, .. })
            if n1 == n2 =>
        {
            check_arity(n1, a1.len(), a2.len(), span)?;
            unify_pairs(a1.iter().zip(a2.iter()), span)
        }
        (
            Type::Union { name: n1, type_args: a1, .. },
            Type::Union { name: n2, type_args: a2, .. },
        ) if n1 == n2 => {
            check_arity(n1, a1.len(), a2.len(), span)?;
            unify_pairs(a1.iter().zip(a2.iter()), span)
        }
        (Type::Tuple { elems: e1, .. }, Type::Tuple { elems: e2, .. }) => {
            check_arity("tuple", e1.len(), e2.len(), span)?;
            unify_pairs(e1.iter().zip(e2.iter()), span)
        }
        (
            Type::Function { params: p1, ret: r1, .. },
            Type::Function { params: p2, ret: r2, .. },
        ) => {
            check_arity("function", p1.len(), p2.len(), span)?;
            let params_sub = unify_pairs(p1.iter().zip(p2.iter()), span)?;
            let r1_applied = params_sub.apply(r1);
            let r2_applied = params_sub.apply(r2);
            let ret_sub = unify_types(&r1_applied, &r2_applied, span)?;
            Ok(ret_sub.compose(&params_sub))
        }
        (Type::Nullable { base: b1, .. }, Type::Nullable { base: b2, .. }) => {
            unify_types(b1, b2, span)
        }
        (Type::Nullable { base, .. }, other) | (other, Type::Nullable { base, .. }) => {
            unify_types(base, other, span)
        }
        _ => Err(UnificationError::TypeMismatch { expected: a.clone(), actual: b.clone(), span }),
    }
}

fn check_arity(name: &str, expected: usize, actual: usize, span: Span) -> Result<(), UnificationError> {
    if expected != actual {
        return Err(UnificationError::ArityMismatch {
            name: name.to_string(),
            expected,
            actual,
            span,
        });
    }
    Ok(())
}

fn unify_pairs<'a>(
    pairs: impl Iterator<Item = (&'a Type, &'a Type)>,
    span: Span,
) -> Result<Substitution, UnificationError> {
    let mut sigma = Substitution::empty();
    for (x, y) in pairs {
        let x = sigma.apply(x);
        let y = sigma.apply(y);
        let step = unify_types(&x, &y, span)?;
        sigma = step.compose(&sigma);
    }
    Ok(sigma)
}

fn solve_subtype(sub: &Type, sup: &Type, span: Span) -> Result<Substitution, UnificationError> {
    if are_equal(sub, sup) {
        return Ok(Substitution::empty());
    }
    if are_equal(sub, &Type::int()) && are_equal(sup, &Type::double()) {
        return Ok(Substitution::empty());
    }
    if let Some(name) = type_variable_name(sub) {
        return bind(name, sup, span);
    }
    if let Some(name) = type_variable_name(sup) {
        if are_equal(sub, &Type::int()) {
            return bind(name, &Type::double(), span);
        }
        return bind(name, sub, span);
    }
    unify_types(sub, sup, span)
}

fn solve_one(constraint: &Constraint) -> Result<Substitution, UnificationError> {
    match constraint {
        Constraint::Equality { left, right, span } => unify_types(left, right, *span),
        Constraint::Subtype { sub, sup, span } => solve_subtype(sub, sup, *span),
        Constraint::Instance { tv, scheme, span } => {
            let instantiated = instantiate(scheme);
            unify_types(&Type::var(tv.clone()), &instantiated, *span)
        }
    }
}

/// Solves an entire constraint set in insertion order, threading the
/// accumulated substitution through each step (applying it to a
/// constraint's types before solving, and composing the result back in).
/// Order is deterministic, so error output is reproducible.
#[tracing::instrument(level = "debug", skip_all, fields(constraints = constraints.len()))]
pub fn solve(constraints: &ConstraintSet) -> Result<Substitution, UnificationError> {
    let mut sigma = Substitution::empty();
    for constraint in constraints.iter() {
        let applied = apply_to_constraint(&sigma, constraint);
        let step = solve_one(&applied).map_err(|cause| {
            tracing::debug!(?cause, "constraint solving failed");
            UnificationError::ConstraintSolvingFailed {
                constraint: Box::new(constraint.clone()),
                cause: Box::new(cause),
            }
        })?;
        sigma = step.compose(&sigma);
    }
    Ok(sigma)
}

fn apply_to_constraint(sigma: &Substitution, constraint: &Constraint) -> Constraint {
    match constraint {
        Constraint::Equality { left, right, span } => {
            Constraint::Equality { left: sigma.apply(left), right: sigma.apply(right), span: *span }
        }
        Constraint::Subtype { sub, sup, span } => {
            Constraint::Subtype { sub: sigma.apply(sub), sup: sigma.apply(sup), span: *span }
        }
        Constraint::Instance { tv, scheme, span } => {
            Constraint::Instance { tv: tv.clone(), scheme: scheme.clone(), span: *span }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_common::Span;

    #[test]
    fn unify_same_primitive() {
        let sigma = unify_types(&Type::int(), &Type::int(), Span::dummy()).unwrap();
        assert!(sigma.is_empty());
    }

    #[test]
    fn unify_var_binds() {
        let sigma = unify_types(&Type::named("T"), &Type::int(), Span::dummy()).unwrap();
        assert!(are_equal(&sigma.apply(&Type::named("T")), &Type::int()));
    }

    #[test]
    fn unify_occurs_check_fails() {
        let err = unify_types(
            &Type::named("T"),
            &Type::generic("List", vec![Type::named("T")]),
            Span::dummy(),
        )
        .unwrap_err();
        assert!(matches!(err, UnificationError::InfiniteType { .. }));
    }

    #[test]
    fn unify_arity_mismatch() {
        let err = unify_types(
            &Type::tuple(vec![Type::int()]),
            &Type::tuple(vec![Type::int(), Type::int()]),
            Span::dummy(),
        )
        .unwrap_err();
        assert!(matches!(err, UnificationError::ArityMismatch { .. }));
    }

    #[test]
    fn solve_is_sound() {
        let mut set = ConstraintSet::empty();
        set.add(Constraint::equality(Type::named("T"), Type::int(), Span::dummy()));
        set.add(Constraint::equality(
            Type::generic("List", vec![Type::named("T")]),
            Type::generic("List", vec![Type::named("U")]),
            Span::dummy(),
        ));
        let sigma = solve(&set).unwrap();
        assert!(are_equal(&sigma.apply(&Type::named("T")), &Type::int()));
        assert!(are_equal(&sigma.apply(&Type::named("U")), &Type::int()));
    }
}
