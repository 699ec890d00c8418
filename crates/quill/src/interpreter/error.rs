//! Error types for rendering.

use thiserror::Error;

use crate::interpreter::escape::EscapeError;

/// An error that occurred while rendering a template.
///
/// Missing data is never an error; only an unknown template name or a
/// failing escape hook stops a render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No template is registered under `name`.
    #[error("template not found: '{name}'{}", format_suggestions(suggestions))]
    NotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// The escape hook rejected an interpolated value.
    #[error(transparent)]
    Escape(#[from] EscapeError),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Find names in `available` close to `key`, closest first.
///
/// Keys of up to three characters tolerate one edit, longer keys two. At
/// most three suggestions are returned.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.chars().count() <= 3 { 1 } else { 2 };
    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|name| (strsim::levenshtein(key, name), name))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(3)
        .map(|(_, name)| name.clone())
        .collect()
}
