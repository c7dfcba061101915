//! End-to-end scenarios exercising `check_program` against small programs
//! built directly from the AST (no parser in scope — these stand in for
//! the source text a parser would have produced).

use tl_ast::{
    Assignment, BinaryOperator, Expression, FunctionDecl, Literal, MatchCase, Param, Pattern,
    Program, Statement, TypeDecl, UnionVariant, ValDecl, VarDecl,
};
use tl_checker::{check_program, CheckError};
use tl_common::{CheckerOptions, Span, Strategy};
use tl_types::Type;

fn span() -> Span {
    Span::dummy()
}

fn lit_int(n: i64) -> Expression {
    Expression::Literal(Literal::Int(n), span())
}

fn ident(name: &str) -> Expression {
    Expression::Identifier(name.to_string(), span())
}

/// Installs a `tracing` subscriber the first time a test calls this, so the
/// `debug!` events on the occurs-check, constraint-solving, and recursion
/// guard paths are visible under `RUST_LOG=debug cargo test -- --nocapture`.
/// Mirrors the teacher's own `fmt().with_env_filter(...)` setup in
/// `conformance/src/main.rs`, just invoked from a test instead of a binary,
/// since this workspace has no CLI entry point of its own.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
            .with_test_writer()
            .try_init();
    });
}

#[test]
fn numeric_widening_mixes_int_and_double() {
    let body = Expression::BinaryOp {
        op: BinaryOperator::Add,
        left: Box::new(lit_int(1)),
        right: Box::new(Expression::Literal(Literal::Float(2.5), span())),
        span: span(),
    };
    let program = Program {
        statements: vec![Statement::FunctionDecl(FunctionDecl {
            name: "mix".to_string(),
            type_params: vec![],
            params: vec![],
            return_type: Some(Type::double()),
            body,
            span: span(),
        })],
    };
    let result = check_program(&program, &CheckerOptions::default());
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn string_concatenation_stays_string() {
    let body = Expression::BinaryOp {
        op: BinaryOperator::Add,
        left: Box::new(Expression::Literal(Literal::String("a".to_string()), span())),
        right: Box::new(Expression::Literal(Literal::String("b".to_string()), span())),
        span: span(),
    };
    let program = Program {
        statements: vec![Statement::FunctionDecl(FunctionDecl {
            name: "greet".to_string(),
            type_params: vec![],
            params: vec![],
            return_type: Some(Type::string()),
            body,
            span: span(),
        })],
    };
    let result = check_program(&program, &CheckerOptions::default());
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn polymorphic_identity_function_infers_at_each_call_site() {
    let identity = FunctionDecl {
        name: "identity".to_string(),
        type_params: vec!["T".to_string()],
        params: vec![Param { name: "x".to_string(), annotation: Some(Type::named("T")), span: span() }],
        return_type: Some(Type::named("T")),
        body: ident("x"),
        span: span(),
    };
    let call_int = Expression::FunctionCall {
        callee: Box::new(ident("identity")),
        args: vec![lit_int(1)],
        span: span(),
    };
    let program = Program {
        statements: vec![
            Statement::FunctionDecl(identity),
            Statement::ValDecl(ValDecl {
                name: "one".to_string(),
                annotation: Some(Type::int()),
                init: call_int,
                span: span(),
            }),
        ],
    };
    let result = check_program(&program, &CheckerOptions::default());
    assert!(result.is_ok(), "{result:?}");
}

fn shape_type_decl() -> TypeDecl {
    TypeDecl {
        name: "Shape".to_string(),
        type_params: vec![],
        variants: vec![
            UnionVariant { name: "Circle".to_string(), fields: vec![Type::int()], span: span() },
            UnionVariant { name: "Square".to_string(), fields: vec![Type::int()], span: span() },
        ],
        span: span(),
    }
}

#[test]
fn non_exhaustive_match_over_union_is_rejected() {
    let match_expr = Expression::Match {
        scrutinee: Box::new(Expression::ConstructorCall {
            name: "Circle".to_string(),
            args: vec![lit_int(1)],
            span: span(),
        }),
        cases: vec![MatchCase {
            pattern: Pattern::Constructor {
                name: "Circle".to_string(),
                subpatterns: vec![Pattern::Identifier("r".to_string(), span())],
                span: span(),
            },
            body: lit_int(0),
            span: span(),
        }],
        span: span(),
    };
    let program = Program {
        statements: vec![
            Statement::TypeDecl(shape_type_decl()),
            Statement::FunctionDecl(FunctionDecl {
                name: "area".to_string(),
                type_params: vec![],
                params: vec![],
                return_type: Some(Type::int()),
                body: match_expr,
                span: span(),
            }),
        ],
    };
    let result = check_program(&program, &CheckerOptions::default());
    let err = result.unwrap_err();
    assert!(err.errors.iter().any(|e| matches!(e, CheckError::NonExhaustiveMatch { .. })));
}

#[test]
fn exhaustive_match_over_union_succeeds() {
    let match_expr = Expression::Match {
        scrutinee: Box::new(Expression::ConstructorCall {
            name: "Circle".to_string(),
            args: vec![lit_int(1)],
            span: span(),
        }),
        cases: vec![
            MatchCase {
                pattern: Pattern::Constructor {
                    name: "Circle".to_string(),
                    subpatterns: vec![Pattern::Identifier("r".to_string(), span())],
                    span: span(),
                },
                body: lit_int(0),
                span: span(),
            },
            MatchCase {
                pattern: Pattern::Constructor {
                    name: "Square".to_string(),
                    subpatterns: vec![Pattern::Identifier("s".to_string(), span())],
                    span: span(),
                },
                body: lit_int(1),
                span: span(),
            },
        ],
        span: span(),
    };
    let program = Program {
        statements: vec![
            Statement::TypeDecl(shape_type_decl()),
            Statement::FunctionDecl(FunctionDecl {
                name: "area".to_string(),
                type_params: vec![],
                params: vec![],
                return_type: Some(Type::int()),
                body: match_expr,
                span: span(),
            }),
        ],
    };
    let result = check_program(&program, &CheckerOptions::default());
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn mutually_recursive_functions_see_each_other_regardless_of_declaration_order() {
    let is_even_call = Expression::FunctionCall {
        callee: Box::new(ident("is_odd")),
        args: vec![ident("n")],
        span: span(),
    };
    let is_odd_call = Expression::FunctionCall {
        callee: Box::new(ident("is_even")),
        args: vec![ident("n")],
        span: span(),
    };
    let program = Program {
        statements: vec![
            Statement::FunctionDecl(FunctionDecl {
                name: "is_even".to_string(),
                type_params: vec![],
                params: vec![Param { name: "n".to_string(), annotation: Some(Type::int()), span: span() }],
                return_type: Some(Type::boolean()),
                body: is_even_call,
                span: span(),
            }),
            Statement::FunctionDecl(FunctionDecl {
                name: "is_odd".to_string(),
                type_params: vec![],
                params: vec![Param { name: "n".to_string(), annotation: Some(Type::int()), span: span() }],
                return_type: Some(Type::boolean()),
                body: is_odd_call,
                span: span(),
            }),
        ],
    };
    let result = check_program(&program, &CheckerOptions::default());
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn unification_occurs_check_rejects_self_referential_generic() {
    init_tracing();
    let err = tl_solver::unify_types(
        &Type::named("T"),
        &Type::generic("List", vec![Type::named("T")]),
        span(),
    )
    .unwrap_err();
    assert!(matches!(err, tl_solver::UnificationError::InfiniteType { .. }));
}

#[test]
fn if_branch_disagreement_diverges_between_strategies() {
    let if_expr = Expression::If {
        condition: Box::new(Expression::Literal(Literal::Boolean(true), span())),
        then_branch: Box::new(Expression::Literal(Literal::Int(1), span())),
        else_branch: Some(Box::new(Expression::Literal(Literal::String("no".to_string()), span()))),
        span: span(),
    };
    let program = Program {
        statements: vec![Statement::FunctionDecl(FunctionDecl {
            name: "pick".to_string(),
            type_params: vec![],
            params: vec![],
            return_type: None,
            body: if_expr,
            span: span(),
        })],
    };

    let algorithmic = CheckerOptions { strategy: Strategy::Algorithmic, ..CheckerOptions::default() };
    let result = check_program(&program, &algorithmic);
    let err = result.unwrap_err();
    assert!(err.errors.iter().any(|e| matches!(e, CheckError::TypeMismatch { .. })));
}

#[test]
fn mutable_var_reassignment_is_allowed_but_val_is_not() {
    let program = Program {
        statements: vec![
            Statement::VarDecl(VarDecl {
                name: "counter".to_string(),
                annotation: Some(Type::int()),
                init: lit_int(0),
                span: span(),
            }),
            Statement::Assignment(Assignment { name: "counter".to_string(), value: lit_int(1), span: span() }),
        ],
    };
    let result = check_program(&program, &CheckerOptions::default());
    assert!(result.is_ok(), "{result:?}");

    let immutable_program = Program {
        statements: vec![
            Statement::ValDecl(ValDecl {
                name: "counter".to_string(),
                annotation: Some(Type::int()),
                init: lit_int(0),
                span: span(),
            }),
            Statement::Assignment(Assignment { name: "counter".to_string(), value: lit_int(1), span: span() }),
        ],
    };
    let result = check_program(&immutable_program, &CheckerOptions::default());
    let err = result.unwrap_err();
    assert!(err.errors.iter().any(|e| matches!(e, CheckError::InvalidOperation { .. })));
}

#[test]
fn builtin_methods_resolve_to_their_documented_result_types() {
    fn method_call(receiver: Expression, method: &str) -> Expression {
        Expression::FunctionCall {
            callee: Box::new(Expression::PropertyAccess {
                target: Box::new(receiver),
                property: method.to_string(),
                span: span(),
            }),
            args: vec![],
            span: span(),
        }
    }

    let cases = [
        (method_call(lit_int(1), "toString"), Type::string()),
        (method_call(lit_int(1), "toDouble"), Type::double()),
        (method_call(Expression::Literal(Literal::Float(1.5), span()), "toInt"), Type::int()),
        (method_call(Expression::Literal(Literal::String("hi".to_string()), span()), "length"), Type::int()),
    ];

    for strategy in [Strategy::Algorithmic, Strategy::ConstraintBased] {
        for (body, return_type) in &cases {
            let program = Program {
                statements: vec![Statement::FunctionDecl(FunctionDecl {
                    name: "call_method".to_string(),
                    type_params: vec![],
                    params: vec![],
                    return_type: Some(return_type.clone()),
                    body: body.clone(),
                    span: span(),
                })],
            };
            let options = CheckerOptions { strategy, ..CheckerOptions::default() };
            let result = check_program(&program, &options);
            assert!(result.is_ok(), "strategy {strategy:?}: {result:?}");
        }
    }
}

#[test]
fn builtin_method_on_wrong_receiver_type_is_rejected() {
    let body = Expression::FunctionCall {
        callee: Box::new(Expression::PropertyAccess {
            target: Box::new(lit_int(1)),
            property: "length".to_string(),
            span: span(),
        }),
        args: vec![],
        span: span(),
    };
    for strategy in [Strategy::Algorithmic, Strategy::ConstraintBased] {
        let program = Program {
            statements: vec![Statement::FunctionDecl(FunctionDecl {
                name: "bad_call".to_string(),
                type_params: vec![],
                params: vec![],
                return_type: Some(Type::int()),
                body: body.clone(),
                span: span(),
            })],
        };
        let options = CheckerOptions { strategy, ..CheckerOptions::default() };
        let result = check_program(&program, &options);
        assert!(result.is_err(), "strategy {strategy:?} should have rejected Int.length()");
    }
}

#[test]
fn null_literal_checks_against_a_nullable_annotation_under_both_strategies() {
    for strategy in [Strategy::Algorithmic, Strategy::ConstraintBased] {
        let program = Program {
            statements: vec![Statement::ValDecl(ValDecl {
                name: "maybe".to_string(),
                annotation: Some(Type::nullable(Type::int())),
                init: Expression::Literal(Literal::Null, span()),
                span: span(),
            })],
        };
        let options = CheckerOptions { strategy, ..CheckerOptions::default() };
        let result = check_program(&program, &options);
        assert!(result.is_ok(), "strategy {strategy:?}: {result:?}");
    }
}

#[test]
fn null_returning_function_checks_against_nullable_return_type_under_both_strategies() {
    for strategy in [Strategy::Algorithmic, Strategy::ConstraintBased] {
        let program = Program {
            statements: vec![Statement::FunctionDecl(FunctionDecl {
                name: "absent".to_string(),
                type_params: vec![],
                params: vec![],
                return_type: Some(Type::nullable(Type::string())),
                body: Expression::Literal(Literal::Null, span()),
                span: span(),
            })],
        };
        let options = CheckerOptions { strategy, ..CheckerOptions::default() };
        let result = check_program(&program, &options);
        assert!(result.is_ok(), "strategy {strategy:?}: {result:?}");
    }
}

#[test]
fn duplicate_type_declaration_is_reported_once_but_does_not_abort() {
    let program = Program {
        statements: vec![
            Statement::TypeDecl(shape_type_decl()),
            Statement::TypeDecl(shape_type_decl()),
            Statement::ValDecl(ValDecl {
                name: "c".to_string(),
                annotation: None,
                init: Expression::ConstructorCall {
                    name: "Circle".to_string(),
                    args: vec![lit_int(3)],
                    span: span(),
                },
                span: span(),
            }),
        ],
    };
    let result = check_program(&program, &CheckerOptions::default());
    let err = result.unwrap_err();
    let duplicate_count =
        err.errors.iter().filter(|e| matches!(e, CheckError::DuplicateDefinition { .. })).count();
    assert_eq!(duplicate_count, 1);
}

#[test]
fn deeply_nested_expression_past_the_recursion_limit_is_reported_under_both_strategies() {
    init_tracing();
    for strategy in [Strategy::Algorithmic, Strategy::ConstraintBased] {
        let mut body = lit_int(1);
        for _ in 0..100 {
            body = Expression::BinaryOp {
                op: BinaryOperator::Add,
                left: Box::new(body),
                right: Box::new(lit_int(1)),
                span: span(),
            };
        }
        let program = Program { statements: vec![Statement::Expr(body)] };
        let options = CheckerOptions { strategy, max_recursion_depth: Some(20), ..CheckerOptions::default() };
        let result = check_program(&program, &options);
        let err = result.unwrap_err();
        assert!(
            err.errors.iter().any(|e| matches!(e, CheckError::RecursionLimitExceeded { .. })),
            "strategy {strategy:?}: expected a RecursionLimitExceeded error, got {err:?}"
        );
    }
}
