//! Argument-directed type-parameter inference, shared by function calls and
//! constructor calls.
//!
//! A single left-to-right walk over `(declared_param_type, argument_type)`
//! pairs maps each declared type parameter to the concrete type found in
//! the matching argument position. Any type parameter left unmapped
//! defaults to `Unit` — a deliberately conservative choice (see the design
//! notes on open questions) — and the call site is logged at `debug` level
//! so the default is visible to a caller running with tracing enabled.

use rustc_hash::FxHashMap;
use tl_types::Type;

pub fn infer_type_arguments(
    type_parameters: &[String],
    declared: &[Type],
    arguments: &[Type],
) -> FxHashMap<String, Type> {
    let mut bindings = FxHashMap::default();
    for (declared_ty, arg_ty) in declared.iter().zip(arguments.iter()) {
        match_declared_against_argument(declared_ty, arg_ty, &mut bindings);
    }
    for param in type_parameters {
        bindings.entry(param.clone()).or_insert_with(|| {
            tracing::debug!(type_parameter = %param, "defaulting unresolved type parameter to Unit");
            Type::unit()
        });
    }
    bindings
}

fn match_declared_against_argument(declared: &Type, argument: &Type, bindings: &mut FxHashMap<String, Type>) {
    if let Some(name) = tl_types::type_variable_name(declared) {
        bindings.entry(name.to_string()).or_insert_with(|| argument.clone());
        return;
    }
    match (declared, argument) {
        (Type::Generic { name: n1, args: d, .. }, Type::Generic { name: n2, args: a, .. })
            if n1 == n2 =>
        {
            for (d_ty, a_ty) in d.iter().zip(a.iter()) {
                match_declared_against_argument(d_ty, a_ty, bindings);
            }
        }
        (
            Type::Union { name: n1, type_args: d, .. },
            Type::Union { name: n2, type_args: a, .. },
        ) if n1 == n2 => {
            for (d_ty, a_ty) in d.iter().zip(a.iter()) {
                match_declared_against_argument(d_ty, a_ty, bindings);
            }
        }
        (Type::Tuple { elems: d, .. }, Type::Tuple { elems: a, .. }) => {
            for (d_ty, a_ty) in d.iter().zip(a.iter()) {
                match_declared_against_argument(d_ty, a_ty, bindings);
            }
        }
        (Type::Nullable { base: d, .. }, Type::Nullable { base: a, .. }) => {
            match_declared_against_argument(d, a, bindings);
        }
        _ => {}
    }
}

pub fn substitute_named(ty: &Type, bindings: &FxHashMap<String, Type>) -> Type {
    if let Some(name) = tl_types::type_variable_name(ty) {
        if let Some(bound) = bindings.get(name) {
            return bound.clone();
        }
        return ty.clone();
    }
    match ty {
        Type::Generic { name, args, span } => Type::Generic {
            name: name.clone(),
            args: args.iter().map(|a| substitute_named(a, bindings)).collect(),
            span: *span,
        },
        Type::Union { name, type_args, span } => Type::Union {
            name: name.clone(),
            type_args: type_args.iter().map(|a| substitute_named(a, bindings)).collect(),
            span: *span,
        },
        Type::Nullable { base, span } => {
            Type::Nullable { base: Box::new(substitute_named(base, bindings)), span: *span }
        }
        Type::Tuple { elems, span } => Type::Tuple {
            elems: elems.iter().map(|e| substitute_named(e, bindings)).collect(),
            span: *span,
        },
        Type::Function { params, ret, span } => Type::Function {
            params: params.iter().map(|p| substitute_named(p, bindings)).collect(),
            ret: Box::new(substitute_named(ret, bindings)),
            span: *span,
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_single_argument() {
        let type_params = vec!["T".to_string()];
        let declared = vec![Type::named("T")];
        let args = vec![Type::int()];
        let bindings = infer_type_arguments(&type_params, &declared, &args);
        assert!(tl_types::are_equal(bindings.get("T").unwrap(), &Type::int()));
    }

    #[test]
    fn defaults_unresolved_parameter_to_unit() {
        let type_params = vec!["T".to_string()];
        let bindings = infer_type_arguments(&type_params, &[], &[]);
        assert!(tl_types::are_equal(bindings.get("T").unwrap(), &Type::unit()));
    }

    #[test]
    fn infers_through_generic_nesting() {
        let type_params = vec!["T".to_string()];
        let declared = vec![Type::generic("List", vec![Type::named("T")])];
        let args = vec![Type::generic("List", vec![Type::string()])];
        let bindings = infer_type_arguments(&type_params, &declared, &args);
        assert!(tl_types::are_equal(bindings.get("T").unwrap(), &Type::string()));
    }
}
