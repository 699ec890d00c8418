//! Escape hooks applied to interpolated values.
//!
//! An escape hook receives the stringified value of every `{{ expr }}` and
//! returns the text to emit. Literal template text never passes through it.
//! Engines have no hook by default, so output is raw.

use std::sync::Arc;

use thiserror::Error;

/// Escape hook signature.
///
/// Takes the stringified value and returns the text to emit, or an error
/// that aborts the render.
pub type EscapeFn = Arc<dyn Fn(&str) -> Result<String, EscapeError> + Send + Sync>;

/// An escape hook refused a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("escape hook rejected value: {message}")]
pub struct EscapeError {
    pub message: String,
}

impl EscapeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Passes text through unchanged.
pub fn identity(raw: &str) -> Result<String, EscapeError> {
    Ok(raw.to_string())
}

/// Escapes the five HTML-significant characters.
pub fn html(raw: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Ok(out)
}
