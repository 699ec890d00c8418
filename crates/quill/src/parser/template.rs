//! Template parser.
//!
//! Consumes the lexer's token stream and builds a [`Template`] tree. Block
//! directives are matched with an explicit stack: `#if` and `#each` push a
//! frame, `{{/}}` pops the innermost frame into a node, and `{{/#else}}`
//! switches the innermost `#if` frame to its else branch.

use std::mem;

use super::ast::{BlockKind, Expr, Node, Template};
use super::error::{ElseMisuse, ParseError, Position, TemplateError};
use super::expression::{is_identifier, parse_expression, parse_expression_prefix};
use super::lexer::{DirectiveKind, Lexer, Syntax, Token};

/// Deepest allowed nesting of `#if` and `#each` blocks.
pub const MAX_BLOCK_DEPTH: usize = 256;

/// Parse template text into a tree.
pub fn parse_template(input: &str, syntax: &Syntax) -> Result<Template, TemplateError> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in Lexer::new(input, syntax) {
        let (kind, position) = match token? {
            Token::Text(text) => {
                current(&mut root, &mut stack).push(Node::Text(text.to_string()));
                continue;
            }
            Token::Directive { kind, position } => (kind, position),
        };

        match kind {
            DirectiveKind::Interpolation(source) => {
                let expr = expression(source, position)?;
                current(&mut root, &mut stack).push(Node::Interpolation(expr));
            }
            DirectiveKind::If(source) => {
                check_depth(&stack, BlockKind::If, position)?;
                let condition = expression(source, position)?;
                stack.push(Frame::new(
                    Block::If {
                        condition,
                        then_branch: None,
                    },
                    position,
                ));
            }
            DirectiveKind::Each(source) => {
                check_depth(&stack, BlockKind::Each, position)?;
                let (collection, binding) = each_header(source, position)?;
                stack.push(Frame::new(
                    Block::Each {
                        collection,
                        binding,
                    },
                    position,
                ));
            }
            DirectiveKind::Else => {
                let frame = stack.last_mut().ok_or(ParseError::MisplacedElse {
                    position,
                    reason: ElseMisuse::OutsideBlock,
                })?;
                frame.start_else(position)?;
            }
            DirectiveKind::Close => {
                let frame = stack
                    .pop()
                    .ok_or(ParseError::UnmatchedClose { position })?;
                current(&mut root, &mut stack).push(frame.finish());
            }
            DirectiveKind::Unknown(text) => {
                return Err(ParseError::UnknownDirective {
                    position,
                    text: text.to_string(),
                }
                .into());
            }
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(ParseError::UnclosedBlock {
            kind: frame.block.kind(),
            position: frame.position,
        }
        .into());
    }

    Ok(Template { nodes: root })
}

/// The node list new children are appended to: the innermost open frame,
/// or the root when no block is open.
fn current<'s>(root: &'s mut Vec<Node>, stack: &'s mut [Frame]) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.nodes,
        None => root,
    }
}

fn check_depth(stack: &[Frame], kind: BlockKind, position: Position) -> Result<(), ParseError> {
    if stack.len() >= MAX_BLOCK_DEPTH {
        return Err(ParseError::NestedTooDeeply {
            kind,
            position,
            limit: MAX_BLOCK_DEPTH,
        });
    }
    Ok(())
}

fn expression(source: &str, position: Position) -> Result<Expr, TemplateError> {
    parse_expression(source).map_err(|source| TemplateError::Expression { position, source })
}

/// Split `#each` arguments into a collection expression and a binding name.
fn each_header(source: &str, position: Position) -> Result<(Expr, String), TemplateError> {
    let malformed = |message: String| -> TemplateError {
        ParseError::MalformedEach { position, message }.into()
    };

    if source.is_empty() {
        return Err(malformed("expected a collection and a binding name".to_string()));
    }

    let (collection, rest) = parse_expression_prefix(source)
        .map_err(|source| TemplateError::Expression { position, source })?;

    let mut words = rest.split_whitespace();
    let Some(binding) = words.next() else {
        return Err(malformed("missing binding name".to_string()));
    };
    if let Some(extra) = words.next() {
        return Err(malformed(format!("unexpected `{extra}` after binding name")));
    }
    if !is_identifier(binding) {
        return Err(malformed(format!("`{binding}` is not a valid binding name")));
    }
    Ok((collection, binding.to_string()))
}

/// An open block awaiting its close directive.
struct Frame {
    block: Block,
    position: Position,
    nodes: Vec<Node>,
}

enum Block {
    If {
        condition: Expr,
        /// Set once `{{/#else}}` has been seen; `nodes` then holds the else branch.
        then_branch: Option<Vec<Node>>,
    },
    Each {
        collection: Expr,
        binding: String,
    },
}

impl Block {
    fn kind(&self) -> BlockKind {
        match self {
            Block::If { .. } => BlockKind::If,
            Block::Each { .. } => BlockKind::Each,
        }
    }
}

impl Frame {
    fn new(block: Block, position: Position) -> Self {
        Frame {
            block,
            position,
            nodes: Vec::new(),
        }
    }

    /// Close the then branch of an `#if` and start collecting its else branch.
    fn start_else(&mut self, position: Position) -> Result<(), ParseError> {
        match &mut self.block {
            Block::If { then_branch, .. } => {
                if then_branch.is_some() {
                    return Err(ParseError::MisplacedElse {
                        position,
                        reason: ElseMisuse::Duplicate,
                    });
                }
                *then_branch = Some(mem::take(&mut self.nodes));
                Ok(())
            }
            Block::Each { .. } => Err(ParseError::MisplacedElse {
                position,
                reason: ElseMisuse::InsideEach,
            }),
        }
    }

    fn finish(self) -> Node {
        match self.block {
            Block::If {
                condition,
                then_branch: Some(then_branch),
            } => Node::Conditional {
                condition,
                then_branch,
                else_branch: Some(self.nodes),
            },
            Block::If {
                condition,
                then_branch: None,
            } => Node::Conditional {
                condition,
                then_branch: self.nodes,
                else_branch: None,
            },
            Block::Each {
                collection,
                binding,
            } => Node::Iteration {
                collection,
                binding,
                body: self.nodes,
            },
        }
    }
}
