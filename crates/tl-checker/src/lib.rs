//! Bidirectional type checking for TL programs (components F and G).
//!
//! [`check_program`] is the public entry point: it runs the declarations
//! pass, then checks every function body and top-level statement under
//! whichever strategy [`tl_common::CheckerOptions`] names, aggregating
//! every error into one [`MultipleErrors`] rather than stopping at the
//! first.

mod algorithmic;
mod assignment;
mod builtin_methods;
mod checker;
mod collect;
mod declarations;
mod dispatch;
mod error;
mod infer_type_args;
mod literals;
mod patterns;
mod typed_program;

pub use checker::check_program;
pub use dispatch::type_check_expression;
pub use error::{CheckError, MultipleErrors};
pub use patterns::{check_pattern, missing_variants, Coverage, GuardCheck};
pub use typed_program::{TypedBinding, TypedFunction, TypedProgram};

#[cfg(test)]
mod tests {
    use super::*;
    use tl_ast::{Expression, FunctionDecl, Literal, Param, Program, Statement, ValDecl};
    use tl_common::{CheckerOptions, Span, Strategy};
    use tl_types::Type;

    fn ident_fn(name: &str, return_type: Type, body: Expression) -> FunctionDecl {
        FunctionDecl {
            name: name.to_string(),
            type_params: vec![],
            params: vec![],
            return_type: Some(return_type),
            body,
            span: Span::dummy(),
        }
    }

    #[test]
    fn checks_a_trivial_function() {
        let program = Program {
            statements: vec![Statement::FunctionDecl(ident_fn(
                "answer",
                Type::int(),
                Expression::Literal(Literal::Int(42), Span::dummy()),
            ))],
        };
        let result = check_program(&program, &CheckerOptions::default());
        assert!(result.is_ok(), "{result:?}");
        let typed = result.unwrap();
        assert_eq!(typed.functions.len(), 1);
        assert!(tl_types::are_equal(&typed.functions[0].body_type, &Type::int()));
    }

    #[test]
    fn reports_return_type_mismatch_under_both_strategies() {
        for strategy in [Strategy::Algorithmic, Strategy::ConstraintBased] {
            let program = Program {
                statements: vec![Statement::FunctionDecl(ident_fn(
                    "oops",
                    Type::string(),
                    Expression::Literal(Literal::Int(1), Span::dummy()),
                ))],
            };
            let options = CheckerOptions { strategy, ..CheckerOptions::default() };
            let result = check_program(&program, &options);
            assert!(result.is_err(), "strategy {strategy:?} should have failed");
        }
    }

    #[test]
    fn top_level_val_binding_is_visible_to_later_statements() {
        let program = Program {
            statements: vec![
                Statement::ValDecl(ValDecl {
                    name: "x".to_string(),
                    annotation: None,
                    init: Expression::Literal(Literal::Int(1), Span::dummy()),
                    span: Span::dummy(),
                }),
                Statement::Expr(Expression::Identifier("x".to_string(), Span::dummy())),
            ],
        };
        let result = check_program(&program, &CheckerOptions::default());
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(result.unwrap().bindings[0].name, "x");
    }

    #[test]
    fn unresolved_function_parameter_type_reports_undefined_type() {
        let program = Program {
            statements: vec![Statement::FunctionDecl(FunctionDecl {
                name: "f".to_string(),
                type_params: vec![],
                params: vec![Param {
                    name: "p".to_string(),
                    annotation: Some(Type::named("Nonexistent")),
                    span: Span::dummy(),
                }],
                return_type: Some(Type::unit()),
                body: Expression::Literal(Literal::Boolean(true), Span::dummy()),
                span: Span::dummy(),
            })],
        };
        let result = check_program(&program, &CheckerOptions::default());
        let err = result.unwrap_err();
        assert!(err.errors.iter().any(|e| matches!(e, CheckError::UndefinedType { .. })));
    }
}
