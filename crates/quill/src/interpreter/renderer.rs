//! Tree-walking renderer.

use crate::interpreter::escape::EscapeFn;
use crate::interpreter::{RenderError, Scope, evaluate};
use crate::parser::ast::{Node, Template};
use crate::types::Value;

/// Render a template tree against a context.
///
/// Rendering is a pure function of its inputs: the tree and context are only
/// read, and the scope chain lives on this call's stack. Missing data never
/// fails a render; the only error is one raised by the escape hook.
pub fn render(
    template: &Template,
    context: &Value,
    escape: Option<&EscapeFn>,
) -> Result<String, RenderError> {
    let mut output = String::new();
    let scope = Scope::new(context);
    render_nodes(&template.nodes, &scope, escape, &mut output)?;
    Ok(output)
}

fn render_nodes<'a>(
    nodes: &'a [Node],
    scope: &Scope<'a>,
    escape: Option<&EscapeFn>,
    output: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Interpolation(expr) => {
                let text = evaluate(expr, scope).to_string();
                match escape {
                    Some(hook) => output.push_str(&hook.as_ref()(&text)?),
                    None => output.push_str(&text),
                }
            }
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if evaluate(condition, scope).is_truthy() {
                    render_nodes(then_branch, scope, escape, output)?;
                } else if let Some(else_branch) = else_branch {
                    render_nodes(else_branch, scope, escape, output)?;
                }
            }
            Node::Iteration {
                collection,
                binding,
                body,
            } => {
                let collection = evaluate(collection, scope);
                // Anything that isn't a list iterates zero times.
                if let Some(items) = collection.as_list() {
                    for item in items {
                        let child = scope.bind(binding, item);
                        render_nodes(body, &child, escape, output)?;
                    }
                }
            }
        }
    }
    Ok(())
}
