//! Template lexer and parser.
//!
//! This module turns template text into a [`Template`] tree: the lexer splits
//! literal text from directives, the expression parser handles the text
//! inside directives, and the template parser matches block directives.

pub mod ast;
pub mod error;
mod expression;
mod lexer;
mod template;

pub use ast::*;
pub use error::{
    ConfigError, ElseMisuse, ExpressionParseError, LexError, ParseError, Position, TemplateError,
};
pub use expression::{MAX_EXPRESSION_DEPTH, parse_expression};
pub use lexer::{DEFAULT_CLOSE, DEFAULT_OPEN, DirectiveKind, Lexer, Syntax, Token};
pub use template::{MAX_BLOCK_DEPTH, parse_template};
