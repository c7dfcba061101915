//! The façade: `check_program` ties the declarations pass, per-declaration
//! checking, and error aggregation into the one entry point callers use.

use tl_ast::{Program, Statement};
use tl_common::CheckerOptions;
use tl_context::TypeContext;

use crate::declarations::{check_declared_types, collect_declarations};
use crate::dispatch::type_check_expression;
use crate::error::{CheckError, MultipleErrors};
use crate::typed_program::{TypedBinding, TypedFunction, TypedProgram};

/// Type-checks `program` under `options`, returning the typed output on
/// success or every error collected along the way. Errors never stop the
/// pass early: a malformed function body doesn't prevent the rest of the
/// program from being checked, so a caller sees every problem in one run.
pub fn check_program(program: &Program, options: &CheckerOptions) -> Result<TypedProgram, MultipleErrors> {
    if options.reset_fresh_vars_per_run {
        tl_types::reset_fresh_counter();
    }

    let _recursion_scope = tl_common::RecursionScope::new(options.max_recursion_depth);
    let mut errors = Vec::new();
    let base = TypeContext::with_builtins();
    let declared = collect_declarations(&base, program, &mut errors);
    check_declared_types(&declared, program, &mut errors);

    let mut typed = TypedProgram::new();
    let mut running = declared.clone();

    for statement in &program.statements {
        match statement {
            Statement::FunctionDecl(decl) => {
                typed.functions.push(check_function(&declared, decl, options, &mut errors));
            }
            Statement::TypeDecl(_) => {}
            Statement::ValDecl(decl) => {
                let init_ty =
                    type_check_expression(&running, &decl.init, decl.annotation.as_ref(), options, &mut errors);
                let bound_ty = decl.annotation.clone().unwrap_or(init_ty);
                running = running.with_variable(decl.name.clone(), bound_ty.clone(), false);
                typed.bindings.push(TypedBinding { name: decl.name.clone(), ty: bound_ty, mutable: false });
            }
            Statement::VarDecl(decl) => {
                let init_ty =
                    type_check_expression(&running, &decl.init, decl.annotation.as_ref(), options, &mut errors);
                let bound_ty = decl.annotation.clone().unwrap_or(init_ty);
                running = running.with_variable(decl.name.clone(), bound_ty.clone(), true);
                typed.bindings.push(TypedBinding { name: decl.name.clone(), ty: bound_ty, mutable: true });
            }
            Statement::Assignment(assignment) => match options.strategy {
                tl_common::Strategy::Algorithmic => {
                    crate::assignment::check_assignment_algorithmic(&running, assignment, &mut errors);
                }
                tl_common::Strategy::ConstraintBased => {
                    let mut set = tl_solver::ConstraintSet::empty();
                    crate::assignment::check_assignment_constraints(&running, assignment, &mut set, &mut errors);
                    if let Err(err) = tl_solver::solve(&set) {
                        errors.push(CheckError::from(err));
                    }
                }
            },
            Statement::Expr(expr) => {
                type_check_expression(&running, expr, None, options, &mut errors);
            }
            Statement::Return(expr, _) => {
                if let Some(expr) = expr {
                    type_check_expression(&running, expr, None, options, &mut errors);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(typed)
    } else {
        Err(MultipleErrors::new(errors))
    }
}

fn check_function(
    declared: &TypeContext,
    decl: &tl_ast::FunctionDecl,
    options: &CheckerOptions,
    errors: &mut Vec<CheckError>,
) -> TypedFunction {
    let sig = declared
        .lookup_function(&decl.name)
        .expect("declarations pass registers every FunctionDecl before bodies are checked");
    let parameter_types = sig.parameter_types.clone();
    let return_type = sig.return_type.clone();

    let mut body_ctx = declared.child_scope();
    for (param, param_ty) in decl.params.iter().zip(parameter_types.iter()) {
        body_ctx = body_ctx.with_variable(param.name.clone(), param_ty.clone(), false);
    }

    let body_type = type_check_expression(&body_ctx, &decl.body, Some(&return_type), options, errors);

    TypedFunction { name: decl.name.clone(), parameter_types, return_type, body_type }
}
