//! Literal type synthesis, shared between expression and pattern checking.

use tl_ast::Literal;
use tl_types::Type;

/// The type of a literal when no expected type is available. `Null`
/// synthesizes `Nullable(fresh)`; callers with an expected nullable type
/// should special-case `Null` themselves rather than call this.
pub fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::int(),
        Literal::Float(_) => Type::double(),
        Literal::String(_) => Type::string(),
        Literal::Boolean(_) => Type::boolean(),
        Literal::Null => Type::nullable(tl_types::fresh_var()),
    }
}
