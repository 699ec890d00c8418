//! Inline expression parser using winnow.
//!
//! Precedence, loosest first: `||`, `&&`, comparisons, unary `!`, atoms.
//! Atoms are parenthesized expressions, number and string literals, the
//! keywords `true`/`false`/`null`/`undefined`, and dotted paths.
//!
//! The input carries a little state next to the text: the current nesting
//! depth, and where the innermost unfinished construct began so that an
//! error at end of input can point back at it.

use std::iter;

use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::{Stateful, Stream};
use winnow::token::{any, one_of, take_while};

use super::ast::{BinaryOp, Expr};
use super::error::ExpressionParseError;
use crate::types::Value;

/// Deepest allowed nesting of parentheses and `!` within one expression.
pub const MAX_EXPRESSION_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
struct Nesting {
    depth: usize,
    exceeded: bool,
    /// Remaining input length where the innermost unfinished construct began.
    anchor: Option<usize>,
}

type Input<'i> = Stateful<&'i str, Nesting>;

/// Parse a complete expression.
pub fn parse_expression(input: &str) -> Result<Expr, ExpressionParseError> {
    let (expr, rest) = parse_expression_prefix(input)?;
    let trailing = rest.trim_start();
    if trailing.is_empty() {
        Ok(expr)
    } else {
        Err(error_at(input, input.len() - trailing.len(), "unexpected input"))
    }
}

/// Parse the longest expression at the start of `input`, returning it and
/// whatever text follows.
pub(crate) fn parse_expression_prefix(input: &str) -> Result<(Expr, &str), ExpressionParseError> {
    if input.trim().is_empty() {
        return Err(ExpressionParseError {
            text: input.to_string(),
            fragment: String::new(),
            offset: 0,
            message: "empty expression".to_string(),
        });
    }

    let mut stream = Stateful {
        input,
        state: Nesting::default(),
    };
    match expression(&mut stream) {
        Ok(expr) => Ok((expr, stream.input)),
        Err(_) => {
            let Nesting {
                exceeded, anchor, ..
            } = stream.state;
            let rest = stream.input.trim_start();
            let (start, message) = if exceeded {
                (input.len() - rest.len(), "expression nested too deeply")
            } else if rest.is_empty() {
                let start = anchor.map_or(input.len(), |len| input.len() - len);
                (start, "unexpected end of expression")
            } else {
                (input.len() - rest.len(), "expected an operand")
            };
            Err(error_at(input, start, message))
        }
    }
}

fn error_at(input: &str, start: usize, message: &str) -> ExpressionParseError {
    ExpressionParseError {
        text: input.to_string(),
        fragment: input[start..].trim_end().to_string(),
        offset: start,
        message: message.to_string(),
    }
}

/// Returns true if `name` is usable as an `#each` binding.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_ident_start)
        && chars.all(is_ident_cont)
        && !matches!(name, "true" | "false" | "null" | "undefined")
}

/// Run `parser` with the error anchor at `start`, the remaining length where
/// the construct began. The outer anchor comes back unless the parser cut.
fn anchored<'i, O>(
    input: &mut Input<'i>,
    start: usize,
    parser: impl FnOnce(&mut Input<'i>) -> ModalResult<O>,
) -> ModalResult<O> {
    let outer = input.state.anchor.replace(start);
    let result = parser(input);
    if !matches!(result, Err(ErrMode::Cut(_))) {
        input.state.anchor = outer;
    }
    result
}

fn expression(input: &mut Input<'_>) -> ModalResult<Expr> {
    or_expr(input)
}

/// Parse `operand (operator operand)*`, folding left-associatively.
fn chain<'i>(
    input: &mut Input<'i>,
    operand: fn(&mut Input<'i>) -> ModalResult<Expr>,
    operator: fn(&mut Input<'i>) -> ModalResult<BinaryOp>,
) -> ModalResult<Expr> {
    let mut expr = operand(input)?;
    loop {
        let checkpoint = input.checkpoint();
        ws(input)?;
        let start = input.input.len();
        let op = match operator(input) {
            Ok(op) => op,
            Err(ErrMode::Backtrack(_)) => {
                input.reset(&checkpoint);
                return Ok(expr);
            }
            Err(error) => return Err(error),
        };
        let right = anchored(input, start, |input| cut_err(operand).parse_next(input))?;
        expr = Expr::binary(op, expr, right);
    }
}

fn or_expr(input: &mut Input<'_>) -> ModalResult<Expr> {
    chain(input, and_expr, or_op)
}

fn and_expr(input: &mut Input<'_>) -> ModalResult<Expr> {
    chain(input, comparison, and_op)
}

fn comparison(input: &mut Input<'_>) -> ModalResult<Expr> {
    chain(input, unary, comparison_op)
}

fn or_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    "||".value(BinaryOp::Or).parse_next(input)
}

fn and_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    "&&".value(BinaryOp::And).parse_next(input)
}

/// Two-character operators are tried before their one-character prefixes.
fn comparison_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    alt((
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Ne),
        ">=".value(BinaryOp::Ge),
        "<=".value(BinaryOp::Le),
        ">".value(BinaryOp::Gt),
        "<".value(BinaryOp::Lt),
    ))
    .parse_next(input)
}

/// Every level of parentheses or `!` passes through here once, so this is
/// where nesting depth is counted.
fn unary(input: &mut Input<'_>) -> ModalResult<Expr> {
    ws(input)?;
    input.state.depth += 1;
    if input.state.depth > MAX_EXPRESSION_DEPTH {
        input.state.exceeded = true;
        return Err(ErrMode::Cut(ContextError::new()));
    }
    let result = alt((negation, atom)).parse_next(input);
    input.state.depth -= 1;
    result
}

fn negation(input: &mut Input<'_>) -> ModalResult<Expr> {
    let start = input.input.len();
    '!'.parse_next(input)?;
    anchored(input, start, |input| {
        cut_err(unary)
            .map(|e| Expr::Not(Box::new(e)))
            .parse_next(input)
    })
}

fn atom(input: &mut Input<'_>) -> ModalResult<Expr> {
    alt((group, string_literal, number, path_or_keyword)).parse_next(input)
}

/// Parse a parenthesized expression: ( expr )
fn group(input: &mut Input<'_>) -> ModalResult<Expr> {
    let start = input.input.len();
    '('.parse_next(input)?;
    anchored(input, start, |input| {
        cut_err((expression, ws, ')'))
            .map(|(expr, (), _)| expr)
            .parse_next(input)
    })
}

/// Parse a number: -12, 1_000, 3.25
fn number(input: &mut Input<'_>) -> ModalResult<Expr> {
    let raw = number_text(input)?;

    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    let value = if cleaned.contains('.') {
        cleaned.parse::<f64>().ok().map(Value::Float)
    } else {
        cleaned
            .parse::<i64>()
            .map(Value::Number)
            .or_else(|_| cleaned.parse::<f64>().map(Value::Float))
            .ok()
    };

    value
        .map(Expr::Literal)
        .ok_or_else(|| ErrMode::Cut(ContextError::new()))
}

fn number_text<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (
        opt('-'),
        digit1,
        take_while(0.., |c: char| c.is_ascii_digit() || c == '_'),
        opt(('.', digit1)),
    )
        .take()
        .parse_next(input)
}

/// Parse a quoted string with backslash escapes.
fn string_literal(input: &mut Input<'_>) -> ModalResult<Expr> {
    let start = input.input.len();
    let quote = opening_quote(input)?;
    anchored(input, start, |input| {
        let mut value = String::new();
        loop {
            match string_char(input)? {
                c if c == quote => return Ok(Expr::Literal(Value::String(value))),
                '\\' => {
                    let escaped = string_char(input)?;
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                c => value.push(c),
            }
        }
    })
}

fn opening_quote(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(['"', '\'']).parse_next(input)
}

/// A character inside a string literal; running out of input is fatal.
fn string_char(input: &mut Input<'_>) -> ModalResult<char> {
    cut_err(any).parse_next(input)
}

/// Parse a dotted path, or one of the literal keywords.
fn path_or_keyword(input: &mut Input<'_>) -> ModalResult<Expr> {
    let start = input.input.len();
    let head = identifier(input)?;
    let tail: Vec<&str> = anchored(input, start, |input| {
        repeat(0.., preceded('.', cut_err(alt((identifier, digit1))))).parse_next(input)
    })?;

    if tail.is_empty() {
        let literal = match head {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            "null" => Some(Value::Null),
            "undefined" => Some(Value::Undefined),
            _ => None,
        };
        if let Some(value) = literal {
            return Ok(Expr::Literal(value));
        }
    }

    let segments = iter::once(head)
        .chain(tail)
        .map(str::to_string)
        .collect();
    Ok(Expr::Path(segments))
}

/// Parse an identifier.
fn identifier<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (one_of(is_ident_start), take_while(0.., is_ident_cont))
        .take()
        .parse_next(input)
}

/// Parse optional whitespace.
fn ws(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier.
fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
