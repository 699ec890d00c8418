//! Template registry for storing and looking up parsed templates.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::parser::ast::Template;

/// A registry of parsed templates keyed by name.
///
/// Trees are stored behind `Arc`, so a lookup only holds the lock long
/// enough to clone a pointer and renders run without locking. Installing a
/// template swaps the pointer under the write lock: a concurrent render
/// sees either the old tree or the new one, never a mix.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: RwLock<BTreeMap<String, Arc<Template>>>,
}

impl TemplateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a template by name.
    pub fn get(&self, name: &str) -> Option<Arc<Template>> {
        self.templates.read().get(name).cloned()
    }

    /// Install a template, replacing any previous one with the same name.
    ///
    /// Returns true if a template was replaced.
    pub fn insert(&self, name: impl Into<String>, template: Template) -> bool {
        self.templates
            .write()
            .insert(name.into(), Arc::new(template))
            .is_some()
    }

    /// Remove a template. Returns true if one was registered.
    pub fn remove(&self, name: &str) -> bool {
        self.templates.write().remove(name).is_some()
    }

    /// Check whether a template is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.read().contains_key(name)
    }

    /// Registered template names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.templates.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }
}
