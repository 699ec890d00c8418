//! The engine: a template registry plus the syntax and escape settings used
//! to parse and render its templates.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use bon::Builder;
use tracing::{debug, trace};

use crate::interpreter::error::compute_suggestions;
use crate::interpreter::escape::EscapeFn;
use crate::interpreter::{RenderError, TemplateRegistry, render};
use crate::parser::ast::Template;
use crate::parser::{Syntax, TemplateError, parse_template};
use crate::types::Value;

/// User-facing template engine.
///
/// Templates are parsed once, when registered, and the resulting trees are
/// reused by every render. Engines are independent of each other; an engine
/// is `Send + Sync` and can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use quill::{Engine, context};
///
/// let engine = Engine::new();
/// engine
///     .add_template("greeting", "{{#if user.age > 18}}OVER{{/#else}}UNDER{{/}}")
///     .unwrap();
///
/// let ctx = context! { "user" => context! { "age" => 19 } };
/// assert_eq!(engine.compile("greeting", &ctx).unwrap(), "OVER");
/// ```
///
/// Custom markers and an escape hook are set through the builder:
///
/// ```
/// use std::sync::Arc;
/// use quill::{Engine, Syntax, context, escape};
///
/// let engine = Engine::builder()
///     .syntax(Syntax::new("<%", "%>").unwrap())
///     .escape(Arc::new(escape::html))
///     .build();
/// engine.add_template("t", "<p><% body %></p>").unwrap();
///
/// let ctx = context! { "body" => "a < b" };
/// assert_eq!(engine.compile("t", &ctx).unwrap(), "<p>a &lt; b</p>");
/// ```
#[derive(Builder)]
pub struct Engine {
    /// Directive markers, `{{` and `}}` unless overridden.
    #[builder(default)]
    syntax: Syntax,

    /// Hook applied to every interpolated value.
    escape: Option<EscapeFn>,

    #[builder(skip)]
    registry: TemplateRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::builder().build()
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("syntax", &self.syntax)
            .field("escape", &self.escape.is_some())
            .field("templates", &self.registry.names())
            .finish()
    }
}

impl Engine {
    /// Create an engine with default markers and no escaping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Get the underlying registry (read-only).
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Parse `text` and install it under `name`.
    ///
    /// Registering an existing name **replaces** its template. If `text`
    /// fails to lex or parse, the error is returned and whatever was
    /// registered under `name` before stays in place.
    pub fn add_template(&self, name: &str, text: &str) -> Result<(), TemplateError> {
        let template = parse_template(text, &self.syntax).inspect_err(|error| {
            debug!(name, %error, "rejected template");
        })?;

        let nodes = template.nodes.len();
        let replaced = self.registry.insert(name, template);
        debug!(name, nodes, replaced, "registered template");
        Ok(())
    }

    /// Remove the template registered under `name`, if any.
    pub fn remove_template(&self, name: &str) -> bool {
        let removed = self.registry.remove(name);
        if removed {
            debug!(name, "removed template");
        }
        removed
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Registered template names in sorted order.
    pub fn template_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Get the tree registered under `name`.
    ///
    /// The returned `Arc` stays valid even if the name is re-registered
    /// afterwards.
    pub fn lookup(&self, name: &str) -> Result<Arc<Template>, RenderError> {
        self.registry.get(name).ok_or_else(|| {
            debug!(name, "template not found");
            RenderError::NotFound {
                name: name.to_string(),
                suggestions: compute_suggestions(name, &self.registry.names()),
            }
        })
    }

    /// Render the template registered under `name` against `context`.
    pub fn compile(&self, name: &str, context: &Value) -> Result<String, RenderError> {
        let template = self.lookup(name)?;
        let output = self.render(&template, context)?;
        trace!(name, bytes = output.len(), "rendered template");
        Ok(output)
    }

    /// Render an already-looked-up tree with this engine's escape hook.
    pub fn render(&self, template: &Template, context: &Value) -> Result<String, RenderError> {
        render(template, context, self.escape.as_ref())
    }
}
