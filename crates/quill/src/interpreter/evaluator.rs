//! Expression evaluation.
//!
//! Evaluation is total: missing keys, out-of-range indexes and comparisons
//! between incompatible kinds all produce [`Value::Undefined`] or `false`
//! instead of an error.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::interpreter::Scope;
use crate::interpreter::scope::undefined;
use crate::parser::ast::{BinaryOp, Expr};
use crate::types::Value;

/// Evaluate an expression against a scope chain.
///
/// Paths and literals are returned borrowed from the context or the tree;
/// only operators allocate new values.
///
/// `&&` and `||` short-circuit and yield the operand that decided the result,
/// so `{{ nickname || name }}` renders the first non-empty of the two.
pub fn evaluate<'a>(expr: &'a Expr, scope: &Scope<'a>) -> Cow<'a, Value> {
    match expr {
        Expr::Literal(value) => Cow::Borrowed(value),
        Expr::Path(segments) => Cow::Borrowed(resolve_path(segments, scope)),
        Expr::Not(inner) => Cow::Owned(Value::Bool(!evaluate(inner, scope).is_truthy())),
        Expr::Binary { op, left, right } => {
            let lhs = evaluate(left, scope);
            match op {
                BinaryOp::And => {
                    if lhs.is_truthy() {
                        evaluate(right, scope)
                    } else {
                        lhs
                    }
                }
                BinaryOp::Or => {
                    if lhs.is_truthy() {
                        lhs
                    } else {
                        evaluate(right, scope)
                    }
                }
                BinaryOp::Eq => Cow::Owned(Value::Bool(lhs.equals(&evaluate(right, scope)))),
                BinaryOp::Ne => Cow::Owned(Value::Bool(!lhs.equals(&evaluate(right, scope)))),
                BinaryOp::Gt => Cow::Owned(order(&lhs, &evaluate(right, scope), Ordering::is_gt)),
                BinaryOp::Lt => Cow::Owned(order(&lhs, &evaluate(right, scope), Ordering::is_lt)),
                BinaryOp::Ge => Cow::Owned(order(&lhs, &evaluate(right, scope), Ordering::is_ge)),
                BinaryOp::Le => Cow::Owned(order(&lhs, &evaluate(right, scope), Ordering::is_le)),
            }
        }
    }
}

/// Resolve a dotted path left to right.
///
/// The first segment is looked up through the scope chain; each later
/// segment indexes into the previous value. The first miss short-circuits
/// to undefined.
pub fn resolve_path<'a>(segments: &[String], scope: &Scope<'a>) -> &'a Value {
    let Some((first, rest)) = segments.split_first() else {
        return undefined();
    };

    let mut current = scope.lookup(first);
    for segment in rest {
        match current.get(segment) {
            Some(next) => current = next,
            None => return undefined(),
        }
    }
    current
}

/// Apply an ordering test, or yield undefined when the operands don't order.
fn order(left: &Value, right: &Value, test: fn(Ordering) -> bool) -> Value {
    compare(left, right).map_or(Value::Undefined, |ordering| Value::Bool(test(ordering)))
}

/// Order two numbers or two strings. Any other pairing has no order.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn eval(source: &str, context: &Value) -> Value {
        let expr = parse_expression(source).unwrap();
        let scope = Scope::new(context);
        evaluate(&expr, &scope).into_owned()
    }

    #[test]
    fn mixed_number_kinds_order() {
        let ctx = Value::from(serde_json::json!({ "a": 2, "b": 2.5 }));
        assert_eq!(eval("a < b", &ctx), Value::Bool(true));
        assert_eq!(eval("b >= 2.5", &ctx), Value::Bool(true));
    }

    #[test]
    fn strings_order_lexicographically() {
        assert_eq!(eval("\"apple\" < \"banana\"", &Value::Null), Value::Bool(true));
    }

    #[test]
    fn incompatible_ordering_is_undefined() {
        assert_eq!(eval("1 < \"2\"", &Value::Null), Value::Undefined);
        assert_eq!(eval("missing > 18", &Value::Null), Value::Undefined);
    }

    #[test]
    fn nan_has_no_order() {
        let ctx = Value::from(serde_json::json!({}));
        let nan = Value::Float(f64::NAN);
        assert_eq!(compare(&nan, &Value::Number(1)), None);
        assert_eq!(eval("1 < 2", &ctx), Value::Bool(true));
    }
}
