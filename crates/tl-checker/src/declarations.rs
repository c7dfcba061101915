//! The declarations pass (component G, pass 1).
//!
//! Before any expression is checked, every top-level `type` and `function`
//! declaration is folded into the context so forward references and mutual
//! recursion work: a function can call another declared later in the same
//! program, and a union's constructors are visible to code anywhere in the
//! program, not just after the `type` statement.

use rustc_hash::FxHashSet;
use tl_ast::{FunctionDecl, Program, Statement, TypeDecl};
use tl_context::{FunctionSignature, TypeContext, TypeDefinition, UnionVariant};
use tl_types::Type;

use crate::error::CheckError;

/// Builds the program-level context by registering every `type` and
/// `function` declaration. Duplicate names (a second `type` or `function`
/// with an already-used name) are reported but do not stop the pass; the
/// first declaration wins.
pub fn collect_declarations(
    base: &TypeContext,
    program: &Program,
    errors: &mut Vec<CheckError>,
) -> TypeContext {
    let mut ctx = base.clone();
    let mut seen_types = FxHashSet::default();
    let mut seen_functions = FxHashSet::default();

    for statement in &program.statements {
        if let Statement::TypeDecl(decl) = statement {
            ctx = register_type(ctx, decl, &mut seen_types, errors);
        }
    }
    for statement in &program.statements {
        if let Statement::FunctionDecl(decl) = statement {
            ctx = register_function(ctx, decl, &mut seen_functions, errors);
        }
    }
    ctx
}

fn register_type(
    ctx: TypeContext,
    decl: &TypeDecl,
    seen: &mut FxHashSet<String>,
    errors: &mut Vec<CheckError>,
) -> TypeContext {
    if !seen.insert(decl.name.clone()) {
        errors.push(CheckError::DuplicateDefinition { name: decl.name.clone(), span: decl.span });
        return ctx;
    }
    let variants = decl
        .variants
        .iter()
        .map(|v| UnionVariant { name: v.name.clone(), fields: v.fields.clone() })
        .collect();
    let mut seen_variants = FxHashSet::default();
    for variant in &decl.variants {
        if !seen_variants.insert(variant.name.clone()) {
            errors.push(CheckError::DuplicateDefinition { name: variant.name.clone(), span: variant.span });
        }
    }
    ctx.with_type(
        decl.name.clone(),
        TypeDefinition::Union { type_parameters: decl.type_params.clone(), variants },
    )
}

fn register_function(
    ctx: TypeContext,
    decl: &FunctionDecl,
    seen: &mut FxHashSet<String>,
    errors: &mut Vec<CheckError>,
) -> TypeContext {
    if !seen.insert(decl.name.clone()) {
        errors.push(CheckError::DuplicateDefinition { name: decl.name.clone(), span: decl.span });
        return ctx;
    }
    let parameter_types = decl
        .params
        .iter()
        .map(|p| p.annotation.clone().unwrap_or_else(tl_types::fresh_var))
        .collect();
    let return_type = decl.return_type.clone().unwrap_or_else(tl_types::fresh_var);
    ctx.with_function(
        decl.name.clone(),
        FunctionSignature { type_parameters: decl.type_params.clone(), parameter_types, return_type },
    )
}

/// Validates that every type name referenced by a declaration (field types,
/// parameter annotations, return types) resolves to either a primitive or a
/// declared union. Called after `collect_declarations` so forward
/// references are already visible.
pub fn check_declared_types(ctx: &TypeContext, program: &Program, errors: &mut Vec<CheckError>) {
    for statement in &program.statements {
        match statement {
            Statement::TypeDecl(decl) => {
                for variant in &decl.variants {
                    for field in &variant.fields {
                        check_type_reference(ctx, field, &decl.type_params, errors);
                    }
                }
            }
            Statement::FunctionDecl(decl) => {
                for param in &decl.params {
                    if let Some(annotation) = &param.annotation {
                        check_type_reference(ctx, annotation, &decl.type_params, errors);
                    }
                }
                if let Some(return_type) = &decl.return_type {
                    check_type_reference(ctx, return_type, &decl.type_params, errors);
                }
            }
            _ => {}
        }
    }
}

fn check_type_reference(ctx: &TypeContext, ty: &Type, in_scope_params: &[String], errors: &mut Vec<CheckError>) {
    match ty {
        Type::Named { name, span } => {
            if in_scope_params.iter().any(|p| p == name) {
                return;
            }
            if tl_types::PRIMITIVE_NAMES.contains(&name.as_str()) {
                return;
            }
            if ctx.lookup_type(name).is_none() {
                errors.push(CheckError::UndefinedType { type_name: name.clone(), span: *span });
            }
        }
        Type::Generic { args, .. } => {
            for arg in args {
                check_type_reference(ctx, arg, in_scope_params, errors);
            }
        }
        Type::Union { type_args, .. } => {
            for arg in type_args {
                check_type_reference(ctx, arg, in_scope_params, errors);
            }
        }
        Type::Nullable { base, .. } => check_type_reference(ctx, base, in_scope_params, errors),
        Type::Tuple { elems, .. } => {
            for elem in elems {
                check_type_reference(ctx, elem, in_scope_params, errors);
            }
        }
        Type::Function { params, ret, .. } => {
            for param in params {
                check_type_reference(ctx, param, in_scope_params, errors);
            }
            check_type_reference(ctx, ret, in_scope_params, errors);
        }
        Type::Primitive { .. } | Type::Var { .. } => {}
    }
}
