//! Structural equality, subtyping and free-variable queries (component B).
//!
//! None of these consult spans; two types built from different source
//! locations compare equal as long as their shapes agree.

use rustc_hash::FxHashSet;

use crate::numeric::{get_wider_numeric_type, is_numeric};
use crate::ty::{Type, TypeVar};

/// Returns the type-variable id this type stands for under the naming
/// convention, if any: an explicit `Var`, or a `Named` whose name is a
/// single uppercase letter or `T` followed by digits and is not a
/// declared primitive.
pub fn type_variable_name(ty: &Type) -> Option<&str> {
    match ty {
        Type::Var { var, .. } => Some(var.0.as_str()),
        Type::Named { name, .. } => {
            if crate::ty::PRIMITIVE_NAMES.contains(&name.as_str()) {
                return None;
            }
            let is_single_upper =
                name.len() == 1 && name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
            let is_t_digits = name.starts_with('T')
                && name.len() > 1
                && name[1..].chars().all(|c| c.is_ascii_digit());
            if is_single_upper || is_t_digits {
                Some(name.as_str())
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn are_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Primitive { name: n1, .. }, Type::Primitive { name: n2, .. }) => n1 == n2,
        (Type::Named { name: n1, .. }, Type::Named { name: n2, .. }) => n1 == n2,
        (Type::Var { var: v1, .. }, Type::Var { var: v2, .. }) => v1 == v2,
        (Type::Generic { name: n1, args: a1, .. }, Type::Generic { name: n2, args: a2, .. }) => {
            n1 == n2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| are_equal(x, y))
        }
        (
            Type::Union { name: n1, type_args: a1, .. },
            Type::Union { name: n2, type_args: a2, .. },
        ) => n1 == n2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| are_equal(x, y)),
        (Type::Nullable { base: b1, .. }, Type::Nullable { base: b2, .. }) => are_equal(b1, b2),
        (Type::Tuple { elems: e1, .. }, Type::Tuple { elems: e2, .. }) => {
            e1.len() == e2.len() && e1.iter().zip(e2).all(|(x, y)| are_equal(x, y))
        }
        (
            Type::Function { params: p1, ret: r1, .. },
            Type::Function { params: p2, ret: r2, .. },
        ) => p1.len() == p2.len() && p1.iter().zip(p2).all(|(x, y)| are_equal(x, y)) && are_equal(r1, r2),
        _ => {
            // A `Named` type-variable and an explicit `Var` with the same
            // id denote the same variable.
            match (type_variable_name(a), type_variable_name(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
    }
}

/// `sub <: sup`: reflexive, numeric widening, and nullable-base subtyping.
/// Function subtyping is invariant in parameters and covariant in return.
pub fn is_subtype(sub: &Type, sup: &Type) -> bool {
    if are_equal(sub, sup) {
        return true;
    }
    if is_numeric(sub) && is_numeric(sup) {
        if let Some(widest) = get_wider_numeric_type(sub, sup) {
            return are_equal(&widest, sup);
        }
    }
    match (sub, sup) {
        (Type::Nullable { base: b1, .. }, Type::Nullable { base: b2, .. }) => is_subtype(b1, b2),
        (_, Type::Nullable { base, .. }) => is_subtype(sub, base),
        (
            Type::Function { params: p1, ret: r1, .. },
            Type::Function { params: p2, ret: r2, .. },
        ) => {
            p1.len() == p2.len()
                && p1.iter().zip(p2).all(|(x, y)| are_equal(x, y))
                && is_subtype(r1, r2)
        }
        _ => false,
    }
}

/// True if `a` and `b` are equal, or related by numeric widening or
/// nullable wrapping in either direction.
pub fn are_compatible(a: &Type, b: &Type) -> bool {
    are_equal(a, b) || is_subtype(a, b) || is_subtype(b, a)
}

pub fn contains_type_variable(ty: &Type, v: &TypeVar) -> bool {
    if let Some(name) = type_variable_name(ty) {
        return name == v.0;
    }
    match ty {
        Type::Generic { args, .. } => args.iter().any(|a| contains_type_variable(a, v)),
        Type::Union { type_args, .. } => type_args.iter().any(|a| contains_type_variable(a, v)),
        Type::Nullable { base, .. } => contains_type_variable(base, v),
        Type::Tuple { elems, .. } => elems.iter().any(|e| contains_type_variable(e, v)),
        Type::Function { params, ret, .. } => {
            params.iter().any(|p| contains_type_variable(p, v)) || contains_type_variable(ret, v)
        }
        _ => false,
    }
}

pub fn extract_type_variables(ty: &Type) -> FxHashSet<TypeVar> {
    let mut out = FxHashSet::default();
    collect_type_variables(ty, &mut out);
    out
}

fn collect_type_variables(ty: &Type, out: &mut FxHashSet<TypeVar>) {
    if let Some(name) = type_variable_name(ty) {
        out.insert(TypeVar::new(name));
        return;
    }
    match ty {
        Type::Generic { args, .. } => args.iter().for_each(|a| collect_type_variables(a, out)),
        Type::Union { type_args, .. } => {
            type_args.iter().for_each(|a| collect_type_variables(a, out))
        }
        Type::Nullable { base, .. } => collect_type_variables(base, out),
        Type::Tuple { elems, .. } => elems.iter().for_each(|e| collect_type_variables(e, out)),
        Type::Function { params, ret, .. } => {
            params.iter().for_each(|p| collect_type_variables(p, out));
            collect_type_variables(ret, out);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ignores_span() {
        let a = Type::int().with_span(tl_common::Span::new(0, 3));
        let b = Type::int().with_span(tl_common::Span::new(10, 13));
        assert!(are_equal(&a, &b));
    }

    #[test]
    fn named_type_variable_convention() {
        assert_eq!(type_variable_name(&Type::named("T")), Some("T"));
        assert_eq!(type_variable_name(&Type::named("T1")), Some("T1"));
        assert_eq!(type_variable_name(&Type::named("List")), None);
        assert_eq!(type_variable_name(&Type::named("Int")), None);
    }

    #[test]
    fn int_widens_to_double() {
        assert!(is_subtype(&Type::int(), &Type::double()));
        assert!(!is_subtype(&Type::double(), &Type::int()));
    }

    #[test]
    fn nullable_wraps_base() {
        assert!(is_subtype(&Type::int(), &Type::nullable(Type::int())));
        assert!(!is_subtype(&Type::nullable(Type::int()), &Type::int()));
    }

    #[test]
    fn occurs_in_generic() {
        let v = TypeVar::new("T");
        let list_of_t = Type::generic("List", vec![Type::var(v.clone())]);
        assert!(contains_type_variable(&list_of_t, &v));
        assert!(!contains_type_variable(&Type::int(), &v));
    }
}
