//! Splits template text into literal runs and directives.
//!
//! The lexer makes a single forward pass. Literal text is returned as
//! borrowed slices of the input, byte for byte; directives are classified by
//! their leading sigil but their expression text is left for the expression
//! parser.

use super::error::{ConfigError, LexError, Position};

pub const DEFAULT_OPEN: &str = "{{";
pub const DEFAULT_CLOSE: &str = "}}";

/// The open/close marker pair that delimits directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    open: String,
    close: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Syntax {
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
        }
    }
}

impl Syntax {
    /// Create a marker pair, e.g. `Syntax::new("<%", "%>")`.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, ConfigError> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if open == close {
            return Err(ConfigError::IdenticalMarkers { marker: open });
        }
        Ok(Syntax { open, close })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text between directives, never empty.
    Text(&'a str),
    /// A directive; `position` points at its open marker.
    Directive {
        kind: DirectiveKind<'a>,
        position: Position,
    },
}

/// What a directive asks for, decided by its leading sigil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind<'a> {
    /// `{{ expr }}`
    Interpolation(&'a str),
    /// `{{#if expr}}`
    If(&'a str),
    /// `{{#each expr name}}`
    Each(&'a str),
    /// `{{/#else}}`
    Else,
    /// `{{/}}`
    Close,
    /// Any other `#…` or `/…` directive, with its trimmed body.
    Unknown(&'a str),
}

/// Iterator over the tokens of one template.
///
/// Line and column are tracked as the cursor advances, so positions cost
/// nothing beyond the scan itself. After yielding an error the lexer is
/// exhausted.
pub struct Lexer<'a, 's> {
    input: &'a str,
    syntax: &'s Syntax,
    cursor: usize,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'a, 's> Lexer<'a, 's> {
    pub fn new(input: &'a str, syntax: &'s Syntax) -> Self {
        Self {
            input,
            syntax,
            cursor: 0,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    /// Position of the cursor.
    fn position(&self) -> Position {
        Position {
            offset: self.cursor,
            line: self.line,
            column: self.column,
        }
    }

    /// Move the cursor `len` bytes forward, updating line and column.
    fn advance(&mut self, len: usize) {
        let skipped = &self.input[self.cursor..self.cursor + len];
        match skipped.rfind('\n') {
            Some(last) => {
                self.line += skipped.matches('\n').count();
                self.column = skipped[last + 1..].chars().count() + 1;
            }
            None => self.column += skipped.chars().count(),
        }
        self.cursor += len;
    }

    fn directive(&mut self) -> Result<Token<'a>, LexError> {
        let position = Self::position(self);
        let open_len = self.syntax.open.len();
        let after_open = &self.remaining()[open_len..];

        let Some(len) = after_open.find(self.syntax.close.as_str()) else {
            return Err(LexError::Unterminated {
                position,
                close: self.syntax.close.clone(),
            });
        };

        self.advance(open_len + len + self.syntax.close.len());
        Ok(Token::Directive {
            kind: classify(&after_open[..len]),
            position,
        })
    }
}

impl<'a> Iterator for Lexer<'a, '_> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.remaining();
        if self.failed || rest.is_empty() {
            return None;
        }

        match rest.find(self.syntax.open.as_str()) {
            Some(0) => {
                let token = self.directive();
                self.failed = token.is_err();
                Some(token)
            }
            Some(idx) => {
                self.advance(idx);
                Some(Ok(Token::Text(&rest[..idx])))
            }
            None => {
                self.advance(rest.len());
                Some(Ok(Token::Text(rest)))
            }
        }
    }
}

/// Classify a directive body by its leading sigil.
fn classify(body: &str) -> DirectiveKind<'_> {
    let body = body.trim();

    if let Some(rest) = body.strip_prefix('#') {
        let keyword_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        let (keyword, args) = rest.split_at(keyword_len);
        return match keyword {
            "if" => DirectiveKind::If(args.trim()),
            "each" => DirectiveKind::Each(args.trim()),
            _ => DirectiveKind::Unknown(body),
        };
    }

    if let Some(rest) = body.strip_prefix('/') {
        return match rest.trim() {
            "" => DirectiveKind::Close,
            "#else" => DirectiveKind::Else,
            _ => DirectiveKind::Unknown(body),
        };
    }

    DirectiveKind::Interpolation(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<DirectiveKind<'_>> {
        classify_all(input, &Syntax::default())
    }

    fn classify_all<'a>(input: &'a str, syntax: &Syntax) -> Vec<DirectiveKind<'a>> {
        Lexer::new(input, syntax)
            .filter_map(|t| match t.unwrap() {
                Token::Directive { kind, .. } => Some(kind),
                Token::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn classifies_sigils() {
        assert_eq!(
            kinds("{{#if a > 1}}{{/#else}}{{ /  }}{{#each xs x}}{{ name }}{{#with x}}{{/if}}"),
            vec![
                DirectiveKind::If("a > 1"),
                DirectiveKind::Else,
                DirectiveKind::Close,
                DirectiveKind::Each("xs x"),
                DirectiveKind::Interpolation("name"),
                DirectiveKind::Unknown("#with x"),
                DirectiveKind::Unknown("/if"),
            ]
        );
    }

    #[test]
    fn keyword_must_be_whole_word() {
        assert_eq!(kinds("{{#iffy}}"), vec![DirectiveKind::Unknown("#iffy")]);
    }

    #[test]
    fn custom_markers() {
        let syntax = Syntax::new("<%", "%>").unwrap();
        assert_eq!(
            classify_all("a {{b}} <% c %>", &syntax),
            vec![DirectiveKind::Interpolation("c")]
        );
    }

    #[test]
    fn rejects_bad_markers() {
        assert_eq!(Syntax::new("", "}}"), Err(ConfigError::EmptyMarker));
        assert_eq!(
            Syntax::new("%%", "%%"),
            Err(ConfigError::IdenticalMarkers {
                marker: "%%".to_string()
            })
        );
    }

    fn positions(input: &str) -> Vec<(usize, usize, usize)> {
        Lexer::new(input, &Syntax::default())
            .filter_map(|t| match t.unwrap() {
                Token::Directive { position, .. } => {
                    Some((position.offset, position.line, position.column))
                }
                Token::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn tracks_lines_and_columns() {
        assert_eq!(
            positions("ab{{x}}\ncd {{y}}{{z}}\n\n{{w}}"),
            vec![(2, 1, 3), (11, 2, 4), (16, 2, 9), (23, 4, 1)]
        );
    }

    #[test]
    fn columns_count_characters() {
        // Multi-byte characters still take one column each.
        assert_eq!(positions("é → {{x}}"), vec![(7, 1, 5)]);
        assert_eq!(positions("{{ \"ü\" }}{{y}}"), vec![(0, 1, 1), (10, 1, 10)]);
    }

    #[test]
    fn unterminated_position_after_newlines() {
        let syntax = Syntax::default();
        let err = Lexer::new("a\nbé {{x", &syntax)
            .find_map(Result::err)
            .unwrap();
        assert_eq!(
            err,
            LexError::Unterminated {
                position: Position {
                    offset: 6,
                    line: 2,
                    column: 4,
                },
                close: "}}".to_string(),
            }
        );
    }

    #[test]
    fn stops_after_error() {
        let syntax = Syntax::default();
        let mut lexer = Lexer::new("a{{b", &syntax);
        assert_eq!(lexer.next(), Some(Ok(Token::Text("a"))));
        assert!(matches!(lexer.next(), Some(Err(LexError::Unterminated { .. }))));
        assert_eq!(lexer.next(), None);
    }
}
