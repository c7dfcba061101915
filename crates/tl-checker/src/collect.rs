//! The bidirectional constraint collector (component F).
//!
//! `collect_constraints` walks one expression and returns its inferred type
//! together with the constraint set required to pin that type down. It
//! never calls the unifier itself — solving is the caller's job (see
//! `dispatch::type_check_expression`) — so the same collected constraints
//! can be merged across a whole program before solving once.

use tl_ast::{BinaryOperator, Expression, Literal, UnaryOperator};
use tl_context::TypeContext;
use tl_solver::{Constraint, ConstraintSet};
use tl_types::Type;

use crate::error::CheckError;
use crate::infer_type_args::{infer_type_arguments, substitute_named};
use crate::literals::literal_type;
use crate::patterns::{check_pattern, missing_variants, Coverage};

/// Collects constraints for `expr`, optionally against an expected type.
/// When `expected` is present, an equality or subtype constraint ties the
/// synthesized type to it.
pub fn collect_constraints(
    ctx: &TypeContext,
    expr: &Expression,
    expected: Option<&Type>,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let (ty, mut constraints) = collect_inner(ctx, expr, errors);
    if let Some(expected_ty) = expected {
        constraints.add(Constraint::subtype(ty.clone(), expected_ty.clone(), expr.span()));
    }
    (ty, constraints)
}

pub(crate) fn collect_inner(
    ctx: &TypeContext,
    expr: &Expression,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let Some(_guard) = tl_common::RecursionGuard::enter() else {
        errors.push(CheckError::RecursionLimitExceeded { span: expr.span() });
        return (tl_types::fresh_var().with_span(expr.span()), ConstraintSet::empty());
    };
    match expr {
        Expression::Literal(lit, span) => {
            let ty = match lit {
                Literal::Null => Type::nullable(tl_types::fresh_var()).with_span(*span),
                other => literal_type(other).with_span(*span),
            };
            (ty, ConstraintSet::empty())
        }
        Expression::TupleLiteral(elems, span) => {
            let mut set = ConstraintSet::empty();
            let mut tys = Vec::with_capacity(elems.len());
            for elem in elems {
                let (t, c) = collect_inner(ctx, elem, errors);
                tys.push(t);
                set.merge(c);
            }
            (Type::tuple(tys).with_span(*span), set)
        }
        Expression::Identifier(name, span) => collect_identifier(ctx, name, *span, errors),
        Expression::BinaryOp { op, left, right, span } => {
            collect_binary_op(ctx, *op, left, right, *span, errors)
        }
        Expression::UnaryOp { op, operand, span } => collect_unary_op(ctx, *op, operand, *span, errors),
        Expression::FunctionCall { callee, args, span } => {
            collect_function_call(ctx, callee, args, *span, errors)
        }
        Expression::ConstructorCall { name, args, span } => {
            collect_constructor_call(ctx, name, args, *span, errors)
        }
        Expression::PropertyAccess { target, property: _, span } => {
            let (_, set) = collect_inner(ctx, target, errors);
            (tl_types::fresh_var().with_span(*span), set)
        }
        Expression::IndexAccess { target, index, span } => {
            let (_, mut set) = collect_inner(ctx, target, errors);
            let (index_ty, index_set) = collect_inner(ctx, index, errors);
            set.merge(index_set);
            set.add(Constraint::equality(index_ty, Type::int(), index.span()));
            (tl_types::fresh_var().with_span(*span), set)
        }
        Expression::If { condition, then_branch, else_branch, span } => {
            collect_if(ctx, condition, then_branch, else_branch.as_deref(), *span, errors)
        }
        Expression::While { condition, body, span } => {
            let (cond_ty, mut set) = collect_inner(ctx, condition, errors);
            set.add(Constraint::equality(cond_ty, Type::boolean(), condition.span()));
            let (_, body_set) = collect_inner(ctx, body, errors);
            set.merge(body_set);
            (Type::unit().with_span(*span), set)
        }
        Expression::For { binder, iterable, body, span } => {
            let (_, mut set) = collect_inner(ctx, iterable, errors);
            let element_ty = tl_types::fresh_var();
            let body_ctx = ctx.child_scope().with_variable(binder.clone(), element_ty, false);
            let (_, body_set) = collect_inner(&body_ctx, body, errors);
            set.merge(body_set);
            (tl_types::fresh_var().with_span(*span), set)
        }
        Expression::Match { scrutinee, cases, span } => {
            collect_match(ctx, scrutinee, cases, *span, errors)
        }
        Expression::Block { statements, span } => collect_block(ctx, statements, *span, errors),
        Expression::Lambda { params, body, span } => collect_lambda(ctx, params, body, *span, errors),
    }
}

fn collect_identifier(
    ctx: &TypeContext,
    name: &str,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    if let Some(binding) = ctx.lookup_variable(name) {
        if binding.scheme.is_monomorphic() {
            return (binding.scheme.ty.clone().with_span(span), ConstraintSet::empty());
        }
        let tv = tl_types::fresh_var();
        let var = match &tv {
            Type::Var { var, .. } => var.clone(),
            _ => unreachable!("fresh_var always returns Type::Var"),
        };
        let mut set = ConstraintSet::empty();
        set.add(Constraint::instance(var, binding.scheme.clone(), span));
        return (tv.with_span(span), set);
    }
    if let Some(sig) = ctx.lookup_function(name) {
        if sig.parameter_types.is_empty() {
            return (sig.return_type.clone().with_span(span), ConstraintSet::empty());
        }
    }
    errors.push(CheckError::UnresolvedSymbol { name: name.to_string(), span });
    (tl_types::fresh_var().with_span(span), ConstraintSet::empty())
}

fn collect_binary_op(
    ctx: &TypeContext,
    op: BinaryOperator,
    left: &Expression,
    right: &Expression,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let (left_ty, mut set) = collect_inner(ctx, left, errors);
    let (right_ty, right_set) = collect_inner(ctx, right, errors);
    set.merge(right_set);

    match op {
        BinaryOperator::Add
            if tl_types::are_equal(&left_ty, &Type::string())
                && tl_types::are_equal(&right_ty, &Type::string()) =>
        {
            (Type::string().with_span(span), set)
        }
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => {
            if let Some(widened) = tl_types::get_wider_numeric_type(&left_ty, &right_ty) {
                (widened.with_span(span), set)
            } else {
                set.add(Constraint::subtype(left_ty, Type::double(), left.span()));
                set.add(Constraint::subtype(right_ty, Type::double(), right.span()));
                (Type::double().with_span(span), set)
            }
        }
        BinaryOperator::Lt | BinaryOperator::Le | BinaryOperator::Gt | BinaryOperator::Ge => {
            set.add(Constraint::subtype(left_ty, Type::double(), left.span()));
            set.add(Constraint::subtype(right_ty, Type::double(), right.span()));
            (Type::boolean().with_span(span), set)
        }
        BinaryOperator::Eq | BinaryOperator::Ne => {
            set.add(Constraint::equality(left_ty, right_ty, span));
            (Type::boolean().with_span(span), set)
        }
        BinaryOperator::And | BinaryOperator::Or => {
            set.add(Constraint::equality(left_ty, Type::boolean(), left.span()));
            set.add(Constraint::equality(right_ty, Type::boolean(), right.span()));
            (Type::boolean().with_span(span), set)
        }
        BinaryOperator::NullCoalesce => {
            set.add(Constraint::equality(
                left_ty.clone(),
                Type::nullable(tl_types::fresh_var()),
                left.span(),
            ));
            (right_ty.with_span(span), set)
        }
    }
}

fn collect_unary_op(
    ctx: &TypeContext,
    op: UnaryOperator,
    operand: &Expression,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let (operand_ty, mut set) = collect_inner(ctx, operand, errors);
    match op {
        UnaryOperator::Neg => {
            set.add(Constraint::subtype(operand_ty.clone(), Type::double(), operand.span()));
            (operand_ty.with_span(span), set)
        }
        UnaryOperator::Not => {
            set.add(Constraint::equality(operand_ty, Type::boolean(), operand.span()));
            (Type::boolean().with_span(span), set)
        }
    }
}

fn collect_function_call(
    ctx: &TypeContext,
    callee: &Expression,
    args: &[Expression],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    if let Expression::PropertyAccess { target, property, .. } = callee {
        return collect_method_call(ctx, target, property, args, span, errors);
    }

    let mut set = ConstraintSet::empty();
    let mut arg_types = Vec::with_capacity(args.len());
    for arg in args {
        let (t, c) = collect_inner(ctx, arg, errors);
        arg_types.push(t);
        set.merge(c);
    }

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
            for (param_ty, arg_ty) in sig.parameter_types.iter().zip(arg_types.iter()) {
                let substituted = substitute_named(param_ty, &bindings);
                set.add(Constraint::subtype(arg_ty.clone(), substituted, span));
            }
            let ret = substitute_named(&sig.return_type, &bindings);
            return (ret.with_span(span), set);
        }
    }

    let (_, callee_set) = collect_inner(ctx, callee, errors);
    set.merge(callee_set);
    let param_vars: Vec<Type> = arg_types.iter().map(|_| tl_types::fresh_var()).collect();
    for (param_var, arg_ty) in param_vars.iter().zip(arg_types.iter()) {
        set.add(Constraint::equality(param_var.clone(), arg_ty.clone(), span));
    }
    (tl_types::fresh_var().with_span(span), set)
}

/// A `FunctionCall` whose callee is `target.property`: one of the §6
/// built-in methods. The receiver's required type (if any) is tied to its
/// collected type with an equality constraint, so a receiver that's still
/// a fresh variable at this point (e.g. an unannotated parameter) gets
/// bound by the solver rather than rejected outright.
fn collect_method_call(
    ctx: &TypeContext,
    target: &Expression,
    method: &str,
    args: &[Expression],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let (receiver_ty, mut set) = collect_inner(ctx, target, errors);
    for arg in args {
        let (_, arg_set) = collect_inner(ctx, arg, errors);
        set.merge(arg_set);
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
            set.add(Constraint::equality(receiver_ty, expected_receiver, target.span()));
            (result.with_span(span), set)
        }
        Some((None, result)) => (result.with_span(span), set),
        None => {
            errors.push(CheckError::UnresolvedSymbol { name: method.to_string(), span });
            (tl_types::fresh_var().with_span(span), set)
        }
    }
}

fn collect_constructor_call(
    ctx: &TypeContext,
    name: &str,
    args: &[Expression],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let mut set = ConstraintSet::empty();
    let mut arg_types = Vec::with_capacity(args.len());
    for arg in args {
        let (t, c) = collect_inner(ctx, arg, errors);
        arg_types.push(t);
        set.merge(c);
    }

    let Some((union_name, type_parameters, variant)) = ctx.find_constructor(name) else {
        errors.push(CheckError::UnresolvedSymbol { name: name.to_string(), span });
        return (tl_types::fresh_var().with_span(span), set);
    };
    let union_name = union_name.to_string();
    let type_parameters = type_parameters.to_vec();
    let fields = variant.fields.clone();

    if fields.len() != args.len() {
        errors.push(CheckError::ArityMismatch {
            name: name.to_string(),
            expected: fields.len(),
            actual: args.len(),
            span,
        });
    }

    let bindings = infer_type_arguments(&type_parameters, &fields, &arg_types);
    for (field_ty, arg_ty) in fields.iter().zip(arg_types.iter()) {
        let substituted = substitute_named(field_ty, &bindings);
        set.add(Constraint::subtype(arg_ty.clone(), substituted, span));
    }

    let type_args: Vec<Type> =
        type_parameters.iter().map(|p| bindings.get(p).cloned().unwrap_or_else(Type::unit)).collect();
    (Type::union(union_name, type_args).with_span(span), set)
}

fn collect_if(
    ctx: &TypeContext,
    condition: &Expression,
    then_branch: &Expression,
    else_branch: Option<&Expression>,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let (cond_ty, mut set) = collect_inner(ctx, condition, errors);
    set.add(Constraint::equality(cond_ty, Type::boolean(), condition.span()));
    let (then_ty, then_set) = collect_inner(ctx, then_branch, errors);
    set.merge(then_set);

    match else_branch {
        Some(else_expr) => {
            let (else_ty, else_set) = collect_inner(ctx, else_expr, errors);
            set.merge(else_set);
            let result = tl_types::fresh_var();
            set.add(Constraint::subtype(then_ty, result.clone(), then_branch.span()));
            set.add(Constraint::subtype(else_ty, result.clone(), else_expr.span()));
            (result.with_span(span), set)
        }
        None => (Type::nullable(then_ty).with_span(span), set),
    }
}

fn collect_match(
    ctx: &TypeContext,
    scrutinee: &Expression,
    cases: &[tl_ast::MatchCase],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let (scrutinee_ty, mut set) = collect_inner(ctx, scrutinee, errors);
    let result = tl_types::fresh_var();
    let mut coverage = Coverage::none();

    for case in cases {
        let mut guard_set = ConstraintSet::empty();
        let (case_ctx, case_coverage) = check_pattern(
            ctx,
            &case.pattern,
            &scrutinee_ty,
            errors,
            &mut |guard_ctx, guard_expr, guard_errors| {
                let (guard_ty, inner_set) = collect_inner(guard_ctx, guard_expr, guard_errors);
                guard_set.merge(inner_set);
                guard_set.add(Constraint::equality(guard_ty, Type::boolean(), guard_expr.span()));
            },
        );
        set.merge(guard_set);
        coverage = coverage.merge(case_coverage);
        let (case_ty, case_set) = collect_inner(&case_ctx, &case.body, errors);
        set.merge(case_set);
        set.add(Constraint::subtype(case_ty, result.clone(), case.body.span()));
    }

    let missing = missing_variants(ctx, &scrutinee_ty, &coverage);
    if !missing.is_empty() {
        errors.push(CheckError::NonExhaustiveMatch { missing_variants: missing, span });
    }

    (result.with_span(span), set)
}

fn collect_block(
    ctx: &TypeContext,
    statements: &[tl_ast::Statement],
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let mut set = ConstraintSet::empty();
    let mut current_ctx = ctx.child_scope();
    let mut result_ty = Type::unit();

    for (i, statement) in statements.iter().enumerate() {
        let is_last = i == statements.len() - 1;
        match statement {
            tl_ast::Statement::ValDecl(decl) => {
                let (init_ty, init_set) = collect_inner(&current_ctx, &decl.init, errors);
                set.merge(init_set);
                let bound_ty = if let Some(annotation) = &decl.annotation {
                    set.add(Constraint::equality(init_ty, annotation.clone(), decl.span));
                    annotation.clone()
                } else {
                    init_ty
                };
                current_ctx = current_ctx.with_variable(decl.name.clone(), bound_ty, false);
                result_ty = Type::unit();
            }
            tl_ast::Statement::VarDecl(decl) => {
                let (init_ty, init_set) = collect_inner(&current_ctx, &decl.init, errors);
                set.merge(init_set);
                let bound_ty = if let Some(annotation) = &decl.annotation {
                    set.add(Constraint::equality(init_ty, annotation.clone(), decl.span));
                    annotation.clone()
                } else {
                    init_ty
                };
                current_ctx = current_ctx.with_variable(decl.name.clone(), bound_ty, true);
                result_ty = Type::unit();
            }
            tl_ast::Statement::Assignment(assignment) => {
                crate::assignment::check_assignment_constraints(
                    &current_ctx,
                    assignment,
                    &mut set,
                    errors,
                );
                result_ty = Type::unit();
            }
            tl_ast::Statement::Expr(expr) => {
                let (ty, expr_set) = collect_inner(&current_ctx, expr, errors);
                set.merge(expr_set);
                if is_last {
                    result_ty = ty;
                }
            }
            tl_ast::Statement::Return(Some(expr), _) => {
                let (_, expr_set) = collect_inner(&current_ctx, expr, errors);
                set.merge(expr_set);
            }
            tl_ast::Statement::Return(None, _) => {}
            tl_ast::Statement::TypeDecl(_) | tl_ast::Statement::FunctionDecl(_) => {
                // Nested declarations inside a block are out of scope for
                // this checker; the declarations pass only runs at the
                // top level of a program.
            }
        }
    }

    (result_ty.with_span(span), set)
}

fn collect_lambda(
    ctx: &TypeContext,
    params: &[tl_ast::Param],
    body: &Expression,
    span: tl_common::Span,
    errors: &mut Vec<CheckError>,
) -> (Type, ConstraintSet) {
    let mut body_ctx = ctx.child_scope();
    let mut param_types = Vec::with_capacity(params.len());
    for param in params {
        let param_ty = param.annotation.clone().unwrap_or_else(tl_types::fresh_var);
        body_ctx = body_ctx.with_variable(param.name.clone(), param_ty.clone(), false);
        param_types.push(param_ty);
    }
    let (body_ty, set) = collect_inner(&body_ctx, body, errors);
    (Type::function(param_types, body_ty).with_span(span), set)
}
