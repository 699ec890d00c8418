//! Error types raised while lexing and parsing templates.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use super::ast::BlockKind;

/// A location in template source.
///
/// `offset` is a byte offset. `line` and `column` are 1-based, and `column`
/// counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An error that occurred while splitting template text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// An open marker with no close marker before end of input.
    #[error("unterminated directive at {position}: expected `{close}`")]
    Unterminated { position: Position, close: String },
}

/// Why an else marker was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElseMisuse {
    /// No block is open.
    OutsideBlock,
    /// The innermost open block is an `#each`.
    InsideEach,
    /// The enclosing `#if` already has an else branch.
    Duplicate,
}

impl Display for ElseMisuse {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElseMisuse::OutsideBlock => "no enclosing #if",
            ElseMisuse::InsideEach => "#each blocks cannot have an else branch",
            ElseMisuse::Duplicate => "#if already has an else branch",
        })
    }
}

/// A structural error in the directive tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A close directive with no open block.
    #[error("unmatched close directive at {position}")]
    UnmatchedClose { position: Position },

    /// End of input reached with a block still open.
    #[error("`{kind}` block opened at {position} is never closed")]
    UnclosedBlock { kind: BlockKind, position: Position },

    /// An else marker in a place where it cannot apply.
    #[error("misplaced else at {position}: {reason}")]
    MisplacedElse {
        position: Position,
        reason: ElseMisuse,
    },

    /// `#each` without exactly a collection and a binding name.
    #[error("malformed `#each` at {position}: {message}")]
    MalformedEach { position: Position, message: String },

    /// A block opened while `limit` blocks are already open.
    #[error("`{kind}` block at {position} nests deeper than {limit} levels")]
    NestedTooDeeply {
        kind: BlockKind,
        position: Position,
        limit: usize,
    },

    /// A `#name` or `/name` directive the grammar does not define.
    #[error("unknown directive `{text}` at {position}")]
    UnknownDirective { position: Position, text: String },
}

/// An inline expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid expression `{text}`: {message} at `{fragment}`")]
pub struct ExpressionParseError {
    /// The raw expression text.
    pub text: String,
    /// The offending substring.
    pub fragment: String,
    /// Byte offset of `fragment` within `text`.
    pub offset: usize,
    pub message: String,
}

/// Any error raised while turning template text into a [`Template`].
///
/// [`Template`]: super::ast::Template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("directive at {position}: {source}")]
    Expression {
        position: Position,
        #[source]
        source: ExpressionParseError,
    },
}

/// Invalid delimiter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("directive markers must not be empty")]
    EmptyMarker,

    #[error("open and close markers must differ, both are `{marker}`")]
    IdenticalMarkers { marker: String },
}
