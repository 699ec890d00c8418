//! Public AST types for parsed templates and inline expressions.
//!
//! These types are public to enable external tooling (linters, formatters, etc.).

use std::fmt::{self, Display, Formatter};

use crate::types::Value;

/// A parsed template: an ordered list of nodes.
///
/// Trees are immutable once built. The registry hands them out behind an
/// `Arc` so concurrent renders can share one tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub nodes: Vec<Node>,
}

/// A node within a template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, emitted verbatim.
    Text(String),
    /// An interpolation: `{{ expr }}`
    Interpolation(Expr),
    /// `{{#if cond}} then {{/#else}} else {{/}}`
    Conditional {
        condition: Expr,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
    },
    /// `{{#each collection binding}} body {{/}}`
    Iteration {
        collection: Expr,
        binding: String,
        body: Vec<Node>,
    },
}

/// An inline expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal: number, string, `true`, `false`, `null` or `undefined`.
    Literal(Value),
    /// A dotted property path such as `user.address.city` or `items.0`.
    Path(Vec<String>),
    /// Logical negation: `!expr`
    Not(Box<Expr>),
    /// A comparison or boolean operator applied to two operands.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub(crate) fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Binary operators, loosest-binding last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    /// The operator as written in a template.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Ge => ">=",
            BinaryOp::Le => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The kind of a block directive, used in structural errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    Each,
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::If => f.write_str("#if"),
            BlockKind::Each => f.write_str("#each"),
        }
    }
}
