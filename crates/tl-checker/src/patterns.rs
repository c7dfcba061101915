//! Pattern checking and match exhaustiveness (part of component G).
//!
//! Guard expressions are checked by a caller-supplied callback rather than
//! directly, so the same pattern-matching logic serves both the
//! algorithmic and constraint-based strategies: the caller decides whether
//! checking a guard means synthesizing its type immediately or collecting
//! constraints for later solving.

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use tl_ast::{Expression, Pattern};
use tl_common::Span;
use tl_context::TypeContext;
use tl_types::{are_equal, Type};

use crate::error::CheckError;
use crate::infer_type_args::substitute_named;
use crate::literals::literal_type;

pub type GuardCheck<'a> = dyn FnMut(&TypeContext, &Expression, &mut Vec<CheckError>) + 'a;

/// Which variants a pattern (or a whole case list) covers. `All` means the
/// pattern matches regardless of the scrutinee's shape (wildcard or bound
/// identifier); `Variants` names the specific constructors matched.
#[derive(Clone, Debug)]
pub enum Coverage {
    All,
    Variants(FxHashSet<String>),
}

impl Coverage {
    pub fn none() -> Self {
        Coverage::Variants(FxHashSet::default())
    }

    pub fn merge(self, other: Coverage) -> Coverage {
        match (self, other) {
            (Coverage::All, _) | (_, Coverage::All) => Coverage::All,
            (Coverage::Variants(mut a), Coverage::Variants(b)) => {
                a.extend(b);
                Coverage::Variants(a)
            }
        }
    }
}

/// Checks `pattern` against `scrutinee_ty`, returning the context extended
/// with the pattern's bindings and the variant coverage it contributes.
/// Errors are pushed to `errors` rather than aborting, matching the
/// façade's no-fail-fast aggregation policy. `check_guard` is invoked once
/// per `Guard` node encountered, with the scope extended by the guarded
/// pattern's own bindings.
pub fn check_pattern(
    ctx: &TypeContext,
    pattern: &Pattern,
    scrutinee_ty: &Type,
    errors: &mut Vec<CheckError>,
    check_guard: &mut GuardCheck<'_>,
) -> (TypeContext, Coverage) {
    let Some(_guard) = tl_common::RecursionGuard::enter() else {
        errors.push(CheckError::RecursionLimitExceeded { span: pattern.span() });
        return (ctx.clone(), Coverage::none());
    };
    match pattern {
        Pattern::Wildcard(_) => (ctx.clone(), Coverage::All),
        Pattern::Identifier(name, _) => {
            (ctx.with_variable(name.clone(), scrutinee_ty.clone(), false), Coverage::All)
        }
        Pattern::Literal(lit, span) => {
            let lit_ty = literal_type(lit);
            if !are_equal(&lit_ty, scrutinee_ty) && !tl_types::are_compatible(&lit_ty, scrutinee_ty) {
                errors.push(CheckError::TypeMismatch {
                    expected: scrutinee_ty.clone(),
                    actual: lit_ty,
                    span: *span,
                });
            }
            (ctx.clone(), Coverage::none())
        }
        Pattern::Constructor { name, subpatterns, span } => {
            check_constructor_pattern(ctx, name, subpatterns, scrutinee_ty, *span, errors, check_guard)
        }
        Pattern::Guard { pattern, guard, span: _ } => {
            let (inner_ctx, coverage) = check_pattern(ctx, pattern, scrutinee_ty, errors, check_guard);
            check_guard(&inner_ctx, guard, errors);
            // Guards do not reduce coverage: a guarded arm still counts
            // toward exhaustiveness as if the guard always held.
            (inner_ctx, coverage)
        }
    }
}

fn check_constructor_pattern(
    ctx: &TypeContext,
    name: &str,
    subpatterns: &[Pattern],
    scrutinee_ty: &Type,
    span: Span,
    errors: &mut Vec<CheckError>,
    check_guard: &mut GuardCheck<'_>,
) -> (TypeContext, Coverage) {
    let Some((union_name, type_parameters, variant)) = ctx.find_constructor(name) else {
        errors.push(CheckError::UnresolvedSymbol { name: name.to_string(), span });
        return (ctx.clone(), Coverage::Variants(FxHashSet::from_iter([name.to_string()])));
    };

    let scrutinee_type_args: &[Type] = match scrutinee_ty {
        Type::Union { name: n, type_args, .. } if n == union_name => type_args,
        _ => &[],
    };
    let bindings: FxHashMap<String, Type> =
        type_parameters.iter().cloned().zip(scrutinee_type_args.iter().cloned()).collect();

    if variant.fields.len() != subpatterns.len() {
        errors.push(CheckError::ArityMismatch {
            name: name.to_string(),
            expected: variant.fields.len(),
            actual: subpatterns.len(),
            span,
        });
    }

    let mut current = ctx.clone();
    for (field_ty, subpattern) in variant.fields.iter().zip(subpatterns.iter()) {
        let substituted = substitute_named(field_ty, &bindings);
        let (next_ctx, _) = check_pattern(&current, subpattern, &substituted, errors, check_guard);
        current = next_ctx;
    }

    (current, Coverage::Variants(FxHashSet::from_iter([name.to_string()])))
}

/// Given the scrutinee type and the merged coverage across every case,
/// returns the missing variant names (empty if not a union, or if fully
/// covered).
pub fn missing_variants(ctx: &TypeContext, scrutinee_ty: &Type, coverage: &Coverage) -> Vec<String> {
    let Type::Union { name, .. } = scrutinee_ty else {
        return Vec::new();
    };
    let Some(tl_context::TypeDefinition::Union { variants, .. }) = ctx.lookup_type(name) else {
        return Vec::new();
    };
    match coverage {
        Coverage::All => Vec::new(),
        Coverage::Variants(covered) => {
            variants.iter().map(|v| v.name.clone()).filter(|n| !covered.contains(n)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_ast::Literal;
    use tl_context::{TypeDefinition, UnionVariant};

    fn shape_context() -> TypeContext {
        TypeContext::with_builtins().with_type(
            "Shape",
            TypeDefinition::Union {
                type_parameters: vec![],
                variants: vec![
                    UnionVariant { name: "Circle".to_string(), fields: vec![Type::int()] },
                    UnionVariant { name: "Square".to_string(), fields: vec![Type::int()] },
                ],
            },
        )
    }

    fn no_guards(_: &TypeContext, _: &Expression, _: &mut Vec<CheckError>) {}

    #[test]
    fn wildcard_covers_all() {
        let ctx = shape_context();
        let mut errors = Vec::new();
        let (_, coverage) = check_pattern(
            &ctx,
            &Pattern::Wildcard(Span::dummy()),
            &Type::union("Shape", vec![]),
            &mut errors,
            &mut no_guards,
        );
        assert!(errors.is_empty());
        assert!(matches!(coverage, Coverage::All));
    }

    #[test]
    fn constructor_pattern_covers_one_variant() {
        let ctx = shape_context();
        let mut errors = Vec::new();
        let pattern = Pattern::Constructor {
            name: "Circle".to_string(),
            subpatterns: vec![Pattern::Identifier("r".to_string(), Span::dummy())],
            span: Span::dummy(),
        };
        let (_, coverage) =
            check_pattern(&ctx, &pattern, &Type::union("Shape", vec![]), &mut errors, &mut no_guards);
        assert!(errors.is_empty());
        let missing = missing_variants(&ctx, &Type::union("Shape", vec![]), &coverage);
        assert_eq!(missing, vec!["Square".to_string()]);
    }

    #[test]
    fn literal_mismatch_reports_error() {
        let ctx = TypeContext::with_builtins();
        let mut errors = Vec::new();
        check_pattern(
            &ctx,
            &Pattern::Literal(Literal::String("x".into()), Span::dummy()),
            &Type::int(),
            &mut errors,
            &mut no_guards,
        );
        assert_eq!(errors.len(), 1);
    }
}
