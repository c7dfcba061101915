//! The algorithmic type-checking strategy (component G): direct, recursive
//! type synthesis with no intermediate constraint set. Diverges from the
//! constraint-based strategy in exactly one documented place — `if`/`else`
//! requires the branches to agree exactly rather than widening to a common
//! supertype.

use tl_ast::{BinaryOperator, Expression, Literal, UnaryOperator};
use tl_context::TypeContext;
use tl_types::{are_equal, Type};

use crate::error::CheckError;
use crate::infer_type_args::{infer_type_arguments, substitute_named};
use crate::literals::literal_type;
use crate::patterns::{check_pattern, missing_variants, Coverage};

/// Synthesizes a type for `expr` with no expected type to check against.
pub fn synthesize(ctx: &TypeContext, expr: &Expression, errors: &mut Vec<CheckError>) -> Type {
    let Some(_guard) = tl_common::RecursionGuard::enter() else {
        errors.push(CheckError::RecursionLimitExceeded { span: expr.span() });
        return tl_types::fresh_var().with_span(expr.span());
    };
    match expr {
        Expression::Literal(lit, span) => match lit {
            Literal::Null => Type::nullable(tl_types::fresh_var()).with_span(*span),
            other => literal_type(other).with_span(*span),
        },
        Expression::TupleLiteral(elems, span) => {
            let tys = elems.iter().map(|e| synthesize(ctx, e, errors)).collect();
            Type::tuple(tys).with_span(*span)
        }
        Expression::Identifier(name, span) => synthesize_identifier(ctx, name, *span, errors),
        Expression::BinaryOp { op, left, right, span } => {
            synthesize_binary_op(ctx, *op, left, right, *span, errors)
        }
        Expression::UnaryOp { op, operand, span } => synthesize_unary_op(ctx, *op, operand, *span, errors),
        Expression::FunctionCall { callee, args, span } => {
            synthesize_function_call(ctx, callee, args, *span, errors)
        }
        Expression::ConstructorCall { name, args, span } => {
            synthesize_constructor_call(ctx, name, args, *span, errors)
        }
        Expression::PropertyAccess { target, property, span } => {
            synthesize_property_access(ctx, target, property, *span, errors)
        }
        Expression::IndexAccess { target, index, span } => {
            synthesize(ctx, target, errors);
            let index_ty = synthesize(ctx, index, errors);
            if !are_equal(&index_ty, &Type::int()) {
                errors.push(CheckError::TypeMismatch { expected: Type::int(), actual: index_ty, span: index.span() });
            }
            tl_types::fresh_var().with_span(*span)
        }
        Expression::If { condition, then_branch, else_branch, span } => {
            synthesize_if(ctx, condition, then_branch, else_branch.as_deref(), *span, errors)
        }
        Expression::While { condition, body, span } => {
            check(ctx, condition, &Type::boolean(), errors);
            synthesize(ctx, body, errors);
            Type::unit().with_span(*span)
        }
        Expression::For { binder, iterable, body, span } => {
            synthesize(ctx, iterable, errors);
            let element_ty = tl_types::fresh_var();
            let body_ctx = ctx.child_scope().with_variable(binder.clone(), element_ty, false);
            synthesize(&body_ctx, body, errors);
            tl_types::fresh_var().with_span(*span)
        }
        Expression::Match { scrutinee, cases, span } => synthesize_match(ctx, scrutinee, cases, *span, errors),
        Expression::Block { statements, span } => synthesize_block(ctx, statements, *span, errors),
        Expression::Lambda { params, body, span } => synthesize_lambda(ctx, params, body, *span, errors),
    }
}

/// Synthesizes a type for `expr` and checks it against `expected`, pushing
/// a `TypeMismatch` if they disagree. Returns the synthesized type.
///
/// `Literal::Null` is special-cased rather than synthesized blindly:
/// `synthesize` has no `expected` to bind its fresh nullable variable
/// against, so `null` checked against a concrete `Int?` would otherwise
/// synthesize `Nullable(Var(_))` and fail the structural comparison below
/// even though `null` is valid for any nullable type.
pub fn check(ctx: &TypeContext, expr: &Expression, expected: &Type, errors: &mut Vec<CheckError>) -> Type {
    if let Expression::Literal(Literal::Null, span) = expr {
        return check_null_literal(expected, *span, errors);
    }
    let actual = synthesize(ctx, expr, errors);
    if !are_equal(&actual, expected) && !tl_types::are_compatible(&actual, expected) {
        errors.push(CheckError::TypeMismatch { expected: expected.clone(), actual: actual.clone(), span: expr.span() });
    }
    actual
}

fn check_null_literal(expected: &Type, span: tl_common::Span, errors: &mut Vec<CheckError>) -> Type {
    match expected {
        Type::Nullable { .. } => expected.clone().with_span(span),
        _ => {
            let actual = Type::nullable(tl_types::fresh_var()).with_span(span);
            errors.push(CheckError::TypeMismatch { expected: expected.clone(), actual: actual.clone(), span });
            actual
        }
    }
}

fn synthesize_identifier(ctx: &TypeContext, name: &str, span: tl_common::Span, errors: &mut Vec<CheckError>) -> Type {
    if let Some(binding) = ctx.lookup_variable(name) {
        let ty = if binding.scheme.is_monomorphic() {
            binding.scheme.ty.clone()
        } else {
            tl_solver::instantiate(&binding.scheme)
        };
        return ty.with_span(span);
    }
    if let Some(sig) = ctx.lookup_function(name) {
        if sig.parameter_types.is_empty() {
            return sig.return_type.clone().with_span(span);
        }
    }
    errors.push(CheckError::UnresolvedSymbol { name: name.to_string(), span });
    tl_types::fresh_var().with_span(span)
}

fn synthesize_binary_op(
    ctx: &TypeContext,
    op: BinaryOperator,
    left: &Expression,
    right: &Expression,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let left_ty = synthesize(ctx, left, errors);
    let right_ty = synthesize(ctx, right, errors);
    match op {
        BinaryOperator::Add if are_equal(&left_ty, &Type::string()) && are_equal(&right_ty, &Type::string()) => {
            Type::string().with_span(span)
        }
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => {
            match tl_types::get_wider_numeric_type(&left_ty, &right_ty) {
                Some(widened) => widened.with_span(span),
                None => {
                    if !tl_types::is_numeric(&left_ty) {
                        errors.push(CheckError::InvalidOperation {
                            op: format!("{op:?}"),
                            operand_types: vec![left_ty.clone()],
                            span: left.span(),
                        });
                    }
                    if !tl_types::is_numeric(&right_ty) {
                        errors.push(CheckError::InvalidOperation {
                            op: format!("{op:?}"),
                            operand_types: vec![right_ty.clone()],
                            span: right.span(),
                        });
                    }
                    Type::double().with_span(span)
                }
            }
        }
        BinaryOperator::Lt | BinaryOperator::Le | BinaryOperator::Gt | BinaryOperator::Ge => {
            if !tl_types::is_numeric(&left_ty) || !tl_types::is_numeric(&right_ty) {
                errors.push(CheckError::InvalidOperation {
                    op: format!("{op:?}"),
                    operand_types: vec![left_ty, right_ty],
                    span,
                });
            }
            Type::boolean().with_span(span)
        }
        BinaryOperator::Eq | BinaryOperator::Ne => {
            if !tl_types::are_compatible(&left_ty, &right_ty) {
                errors.push(CheckError::TypeMismatch { expected: left_ty, actual: right_ty, span });
            }
            Type::boolean().with_span(span)
        }
        BinaryOperator::And | BinaryOperator::Or => {
            if !are_equal(&left_ty, &Type::boolean()) {
                errors.push(CheckError::TypeMismatch { expected: Type::boolean(), actual: left_ty, span: left.span() });
            }
            if !are_equal(&right_ty, &Type::boolean()) {
                errors.push(CheckError::TypeMismatch { expected: Type::boolean(), actual: right_ty, span: right.span() });
            }
            Type::boolean().with_span(span)
        }
        BinaryOperator::NullCoalesce => {
            if !matches!(left_ty, Type::Nullable { .. }) {
                errors.push(CheckError::InvalidOperation {
                    op: "?:".to_string(),
                    operand_types: vec![left_ty],
                    span: left.span(),
                });
            }
            right_ty.with_span(span)
        }
    }
}

fn synthesize_unary_op(
    ctx: &TypeContext,
    op: UnaryOperator,
    operand: &Expression,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let operand_ty = synthesize(ctx, operand, errors);
    match op {
        UnaryOperator::Neg => {
            if !tl_types::is_numeric(&operand_ty) {
                errors.push(CheckError::InvalidOperation {
                    op: "-".to_string(),
                    operand_types: vec![operand_ty.clone()],
                    span,
                });
            }
            operand_ty.with_span(span)
        }
        UnaryOperator::Not => {
            if !are_equal(&operand_ty, &Type::boolean()) {
                errors.push(CheckError::TypeMismatch { expected: Type::boolean(), actual: operand_ty, span });
            }
            Type::boolean().with_span(span)
        }
    }
}

fn synthesize_function_call(
    ctx: &TypeContext,
    callee: &Expression,
    args: &[Expression],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    if let Expression::PropertyAccess { target, property, .. } = callee {
        return synthesize_method_call(ctx, target, property, args, span, errors);
    }

    let arg_types: Vec<Type> = args.iter().map(|a| synthesize(ctx, a, errors)).collect();

    if let Expression::Identifier(name, _) = callee {
        if let Some(sig) = ctx.lookup_function(name) {
            if sig.parameter_types.len() != args.len() {
                errors.push(CheckError::ArityMismatch {
                    name: name.clone(),
                    expected: sig.parameter_types.len(),
                    actual: args.len(),
                    span,
                });
            }
            let bindings = infer_type_arguments(&sig.type_parameters, &sig.parameter_types, &arg_types);
            for ((param_ty, arg_ty), arg_expr) in sig.parameter_types.iter().zip(arg_types.iter()).zip(args.iter()) {
                let expected = substitute_named(param_ty, &bindings);
                if !tl_types::are_compatible(arg_ty, &expected) {
                    errors.push(CheckError::TypeMismatch {
                        expected,
                        actual: arg_ty.clone(),
                        span: arg_expr.span(),
                    });
                }
            }
            return substitute_named(&sig.return_type, &bindings).with_span(span);
        }
        errors.push(CheckError::UnresolvedSymbol { name: name.clone(), span });
        return tl_types::fresh_var().with_span(span);
    }

    synthesize(ctx, callee, errors);
    tl_types::fresh_var().with_span(span)
}

/// A `FunctionCall` whose callee is `target.property`: one of the §6
/// built-in methods. Unlike the constraint-based path, the receiver's
/// type is already resolved by the time it reaches here, so a mismatch is
/// reported immediately rather than deferred to a solver.
fn synthesize_method_call(
    ctx: &TypeContext,
    target: &Expression,
    method: &str,
    args: &[Expression],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let receiver_ty = synthesize(ctx, target, errors);
    for arg in args {
        synthesize(ctx, arg, errors);
    }
    if !args.is_empty() {
        errors.push(CheckError::ArityMismatch {
            name: method.to_string(),
            expected: 0,
            actual: args.len(),
            span,
        });
    }

    match crate::builtin_methods::builtin_method(method) {
        Some((Some(expected_receiver), result)) => {
            if !are_equal(&receiver_ty, &expected_receiver) {
                errors.push(CheckError::TypeMismatch {
                    expected: expected_receiver,
                    actual: receiver_ty,
                    span: target.span(),
                });
            }
            result.with_span(span)
        }
        Some((None, result)) => result.with_span(span),
        None => {
            errors.push(CheckError::UnresolvedSymbol { name: method.to_string(), span });
            tl_types::fresh_var().with_span(span)
        }
    }
}

fn synthesize_constructor_call(
    ctx: &TypeContext,
    name: &str,
    args: &[Expression],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let arg_types: Vec<Type> = args.iter().map(|a| synthesize(ctx, a, errors)).collect();

    let Some((union_name, type_parameters, variant)) = ctx.find_constructor(name) else {
        errors.push(CheckError::UnresolvedSymbol { name: name.to_string(), span });
        return tl_types::fresh_var().with_span(span);
    };
    let union_name = union_name.to_string();
    let type_parameters = type_parameters.to_vec();
    let fields = variant.fields.clone();

    if fields.len() != args.len() {
        errors.push(CheckError::ArityMismatch { name: name.to_string(), expected: fields.len(), actual: args.len(), span });
    }

    let bindings = infer_type_arguments(&type_parameters, &fields, &arg_types);
    for ((field_ty, arg_ty), arg_expr) in fields.iter().zip(arg_types.iter()).zip(args.iter()) {
        let expected = substitute_named(field_ty, &bindings);
        if !tl_types::are_compatible(arg_ty, &expected) {
            errors.push(CheckError::TypeMismatch { expected, actual: arg_ty.clone(), span: arg_expr.span() });
        }
    }

    let type_args: Vec<Type> =
        type_parameters.iter().map(|p| bindings.get(p).cloned().unwrap_or_else(Type::unit)).collect();
    Type::union(union_name, type_args).with_span(span)
}

fn synthesize_property_access(
    ctx: &TypeContext,
    target: &Expression,
    property: &str,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let target_ty = synthesize(ctx, target, errors);
    if let Type::Union { name, .. } = &target_ty {
        if let Some(tl_context::TypeDefinition::Union { variants, .. }) = ctx.lookup_type(name) {
            if variants.iter().any(|v| v.name == property) {
                tracing::debug!(property, union = %name, "property access resolves to a known union field name but field lookup is deferred");
            }
        }
    }
    tl_types::fresh_var().with_span(span)
}

fn synthesize_if(
    ctx: &TypeContext,
    condition: &Expression,
    then_branch: &Expression,
    else_branch: Option<&Expression>,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    check(ctx, condition, &Type::boolean(), errors);
    let then_ty = synthesize(ctx, then_branch, errors);
    match else_branch {
        Some(else_expr) => {
            let else_ty = synthesize(ctx, else_expr, errors);
            if !are_equal(&then_ty, &else_ty) {
                errors.push(CheckError::TypeMismatch { expected: then_ty, actual: else_ty, span });
                return Type::unit().with_span(span);
            }
            then_ty.with_span(span)
        }
        None => Type::nullable(then_ty).with_span(span),
    }
}

fn synthesize_match(
    ctx: &TypeContext,
    scrutinee: &Expression,
    cases: &[tl_ast::MatchCase],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let scrutinee_ty = synthesize(ctx, scrutinee, errors);
    let mut result_ty: Option<Type> = None;
    let mut coverage = Coverage::none();

    for case in cases {
        let (case_ctx, case_coverage) = check_pattern(
            ctx,
            &case.pattern,
            &scrutinee_ty,
            errors,
            &mut |guard_ctx, guard_expr, guard_errors| {
                check(guard_ctx, guard_expr, &Type::boolean(), guard_errors);
            },
        );
        coverage = coverage.merge(case_coverage);
        let case_ty = synthesize(&case_ctx, &case.body, errors);
        result_ty = Some(match result_ty {
            None => case_ty,
            Some(prev) if are_equal(&prev, &case_ty) => prev,
            Some(prev) => {
                errors.push(CheckError::TypeMismatch { expected: prev.clone(), actual: case_ty, span: case.body.span() });
                prev
            }
        });
    }

    let missing = missing_variants(ctx, &scrutinee_ty, &coverage);
    if !missing.is_empty() {
        errors.push(CheckError::NonExhaustiveMatch { missing_variants: missing, span });
    }

    result_ty.unwrap_or_else(Type::unit).with_span(span)
}

fn synthesize_block(
    ctx: &TypeContext,
    statements: &[tl_ast::Statement],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let mut current_ctx = ctx.child_scope();
    let mut result_ty = Type::unit();

    for (i, statement) in statements.iter().enumerate() {
        let is_last = i == statements.len() - 1;
        match statement {
            tl_ast::Statement::ValDecl(decl) => {
                let bound_ty = if let Some(annotation) = &decl.annotation {
                    check(&current_ctx, &decl.init, annotation, errors);
                    annotation.clone()
                } else {
                    synthesize(&current_ctx, &decl.init, errors)
                };
                current_ctx = current_ctx.with_variable(decl.name.clone(), bound_ty, false);
                result_ty = Type::unit();
            }
            tl_ast::Statement::VarDecl(decl) => {
                let bound_ty = if let Some(annotation) = &decl.annotation {
                    check(&current_ctx, &decl.init, annotation, errors);
                    annotation.clone()
                } else {
                    synthesize(&current_ctx, &decl.init, errors)
                };
                current_ctx = current_ctx.with_variable(decl.name.clone(), bound_ty, true);
                result_ty = Type::unit();
            }
            tl_ast::Statement::Assignment(assignment) => {
                crate::assignment::check_assignment_algorithmic(&current_ctx, assignment, errors);
                result_ty = Type::unit();
            }
            tl_ast::Statement::Expr(expr) => {
                let ty = synthesize(&current_ctx, expr, errors);
                if is_last {
                    result_ty = ty;
                }
            }
            tl_ast::Statement::Return(Some(expr), _) => {
                synthesize(&current_ctx, expr, errors);
            }
            tl_ast::Statement::Return(None, _) => {}
            tl_ast::Statement::TypeDecl(_) | tl_ast::Statement::FunctionDecl(_) => {}
        }
    }

    result_ty.with_span(span)
}

fn synthesize_lambda(
    ctx: &TypeContext,
    params: &[tl_ast::Param],
    body: &Expression,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> Type {
    let mut body_ctx = ctx.child_scope();
    let mut param_types = Vec::with_capacity(params.len());
    for param in params {
        let param_ty = param.annotation.clone().unwrap_or_else(tl_types::fresh_var);
        body_ctx = body_ctx.with_variable(param.name.clone(), param_ty.clone(), false);
        param_types.push(param_ty);
    }
    let body_ty = synthesize(&body_ctx, body, errors);
    Type::function(param_types, body_ty).with_span(span)
}
