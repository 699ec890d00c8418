//! quill: a small text-template engine.
//!
//! Templates mix literal text with directives:
//!
//! | Directive | Meaning |
//! |---|---|
//! | `{{ expr }}` | stringify `expr` and emit it |
//! | `{{#if expr}} … {{/#else}} … {{/}}` | conditional, else branch optional |
//! | `{{#each list item}} … {{/}}` | render the body once per element of `list` |
//!
//! Expressions are dotted paths (`user.address.city`, `items.0`), literals,
//! comparisons (`>`, `<`, `>=`, `<=`, `==`, `!=`), `!`, `&&`, `||` and
//! parentheses. Templates are parsed once by [`Engine::add_template`];
//! [`Engine::compile`] renders the cached tree against a fresh context each
//! call.
//!
//! Rendering never fails on missing data: an unresolvable path is
//! `undefined`, which renders as the empty string and is falsy.

pub mod interpreter;
pub mod parser;
pub mod types;

pub use interpreter::{
    Engine, EscapeError, EscapeFn, RenderError, Scope, TemplateRegistry, compute_suggestions,
    escape, evaluate, render,
};
pub use parser::{
    ConfigError, ExpressionParseError, LexError, ParseError, Syntax, Template, TemplateError,
    parse_expression, parse_template,
};
pub use types::Value;

/// Creates a [`Value::Map`] from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, lists or nested contexts directly.
///
/// # Example
///
/// ```
/// use quill::{context, Value};
///
/// let ctx = context! { "count" => 3, "name" => "Alice", "tags" => vec!["a", "b"] };
/// assert_eq!(ctx.get("count").and_then(Value::as_number), Some(3));
/// assert_eq!(ctx.get("name").and_then(Value::as_str), Some("Alice"));
/// ```
#[macro_export]
macro_rules! context {
    {} => {
        $crate::Value::Map(::std::collections::BTreeMap::new())
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::BTreeMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            $crate::Value::Map(map)
        }
    };
}
