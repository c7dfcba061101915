//! The §6 built-in method table: `x.toString()`, `x.toDouble()`,
//! `x.toInt()`, `s.length()`. A `FunctionCall` whose callee is a
//! `PropertyAccess` is a call to one of these rather than a user-defined
//! function, since TL has no user-declared methods.

use tl_types::Type;

/// Looks up a §6 built-in method by name, returning the receiver type it
/// requires (`None` for `toString`, which accepts any receiver) paired
/// with its result type. `None` overall means the name isn't one of the
/// four built-in methods.
pub fn builtin_method(name: &str) -> Option<(Option<Type>, Type)> {
    match name {
        "toString" => Some((None, Type::string())),
        "toDouble" => Some((Some(Type::int()), Type::double())),
        "toInt" => Some((Some(Type::double()), Type::int())),
        "length" => Some((Some(Type::string()), Type::int())),
        _ => None,
    }
}
