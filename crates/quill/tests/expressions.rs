//! Integration tests for expression parsing and evaluation.

use quill::{Scope, Value, evaluate, parse_expression};
use serde_json::json;

fn eval(source: &str, context: &Value) -> Value {
    let expr = parse_expression(source).unwrap();
    evaluate(&expr, &Scope::new(context)).into_owned()
}

fn ctx() -> Value {
    Value::from(json!({
        "user": { "name": "Ada", "age": 36, "tags": ["admin", "ops"] },
        "empty": "",
        "zero": 0,
        "ratio": 0.5,
        "flag": true,
    }))
}

// =============================================================================
// Paths
// =============================================================================

#[test]
fn test_paths_resolve_nested_values() {
    let ctx = ctx();
    assert_eq!(eval("user.name", &ctx), Value::from("Ada"));
    assert_eq!(eval("user.tags.1", &ctx), Value::from("ops"));
    assert_eq!(eval("user.missing.deeper", &ctx), Value::Undefined);
    assert_eq!(eval("user.tags.9", &ctx), Value::Undefined);
}

#[test]
fn test_scope_bindings_shadow_context() {
    let ctx = ctx();
    let root = Scope::new(&ctx);
    let shadow = Value::from("inner");
    let child = root.bind("user", &shadow);

    let expr = parse_expression("user").unwrap();
    assert_eq!(*evaluate(&expr, &child), shadow);
    assert_eq!(evaluate(&expr, &root).get("name"), Some(&Value::from("Ada")));
}

#[test]
fn test_scope_falls_through_to_outer_bindings() {
    let ctx = ctx();
    let root = Scope::new(&ctx);
    let outer_value = Value::from(1);
    let inner_value = Value::from(2);
    let outer = root.bind("a", &outer_value);
    let inner = outer.bind("b", &inner_value);

    assert_eq!(inner.lookup("a"), &outer_value);
    assert_eq!(inner.lookup("b"), &inner_value);
    assert_eq!(inner.lookup("flag"), &Value::Bool(true));
    assert_eq!(inner.lookup("nope"), &Value::Undefined);
}

// =============================================================================
// Boolean operators
// =============================================================================

#[test]
fn test_not() {
    let ctx = ctx();
    assert_eq!(eval("!flag", &ctx), Value::Bool(false));
    assert_eq!(eval("!empty", &ctx), Value::Bool(true));
    assert_eq!(eval("!!user", &ctx), Value::Bool(true));
    assert_eq!(eval("!missing", &ctx), Value::Bool(true));
}

#[test]
fn test_or_returns_deciding_operand() {
    let ctx = ctx();
    assert_eq!(eval("empty || \"fallback\"", &ctx), Value::from("fallback"));
    assert_eq!(eval("user.name || \"fallback\"", &ctx), Value::from("Ada"));
    assert_eq!(eval("zero || missing", &ctx), Value::Undefined);
}

#[test]
fn test_and_returns_deciding_operand() {
    let ctx = ctx();
    assert_eq!(eval("flag && user.age", &ctx), Value::Number(36));
    assert_eq!(eval("zero && user.age", &ctx), Value::Number(0));
}

#[test]
fn test_precedence_and_grouping() {
    let ctx = ctx();
    // && binds tighter: true || (false && false)
    assert_eq!(eval("flag || zero && empty", &ctx), Value::Bool(true));
    assert_eq!(eval("(flag || zero) && empty", &ctx), Value::from(""));
    assert_eq!(eval("!(user.age > 40) && flag", &ctx), Value::Bool(true));
}

// =============================================================================
// Comparisons
// =============================================================================

#[test]
fn test_numeric_comparisons() {
    let ctx = ctx();
    assert_eq!(eval("user.age > 18", &ctx), Value::Bool(true));
    assert_eq!(eval("user.age <= 36", &ctx), Value::Bool(true));
    assert_eq!(eval("user.age < 36", &ctx), Value::Bool(false));
    assert_eq!(eval("ratio < 1", &ctx), Value::Bool(true));
    assert_eq!(eval("-1 < zero", &ctx), Value::Bool(true));
}

#[test]
fn test_string_comparisons() {
    let ctx = ctx();
    assert_eq!(eval("user.name == \"Ada\"", &ctx), Value::Bool(true));
    assert_eq!(eval("user.name >= 'Ab'", &ctx), Value::Bool(true));
    assert_eq!(eval("'b' > 'a'", &ctx), Value::Bool(true));
}

#[test]
fn test_incompatible_ordering_is_falsy() {
    let ctx = ctx();
    let result = eval("user.name > 3", &ctx);
    assert_eq!(result, Value::Undefined);
    assert!(!result.is_truthy());
    assert!(!eval("missing < 1", &ctx).is_truthy());
    assert!(!eval("flag > false", &ctx).is_truthy());
}

#[test]
fn test_equality_across_kinds() {
    let ctx = ctx();
    assert_eq!(eval("zero == 0", &ctx), Value::Bool(true));
    assert_eq!(eval("zero == 0.0", &ctx), Value::Bool(true));
    assert_eq!(eval("zero == \"0\"", &ctx), Value::Bool(false));
    assert_eq!(eval("zero != false", &ctx), Value::Bool(true));
    assert_eq!(eval("missing == undefined", &ctx), Value::Bool(true));
    assert_eq!(eval("missing == null", &ctx), Value::Bool(false));
    assert_eq!(eval("user.tags == user.tags", &ctx), Value::Bool(true));
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_string_escapes() {
    assert_eq!(
        eval(r#""line\nnext \"quoted\" it\'s""#, &Value::Null),
        Value::from("line\nnext \"quoted\" it's")
    );
}

#[test]
fn test_keywords_are_literals() {
    assert_eq!(eval("true", &Value::Null), Value::Bool(true));
    assert_eq!(eval("null", &Value::Null), Value::Null);
    assert_eq!(eval("undefined", &Value::Null), Value::Undefined);
}

#[test]
fn test_dollar_identifiers() {
    let ctx = Value::from(json!({ "$price": 12 }));
    assert_eq!(eval("$price", &ctx), Value::Number(12));
}
