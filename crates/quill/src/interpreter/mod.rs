//! Template evaluation.
//!
//! This module holds the render side of the engine: expression evaluation
//! against a scope chain, the tree-walking renderer, escape hooks, and the
//! registry and [`Engine`] that tie parsing and rendering together.

mod engine;
mod error;
pub mod escape;
mod evaluator;
mod registry;
mod renderer;
mod scope;

pub use engine::Engine;
pub use error::{RenderError, compute_suggestions};
pub use escape::{EscapeError, EscapeFn};
pub use evaluator::{evaluate, resolve_path};
pub use registry::TemplateRegistry;
pub use renderer::render;
pub use scope::Scope;
