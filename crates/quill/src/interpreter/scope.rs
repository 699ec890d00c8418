//! Scope chain for name resolution during rendering.

use crate::types::Value;

static UNDEFINED: Value = Value::Undefined;

/// The bindings visible at one point of a render.
///
/// The chain is a linked list of frames living on the render's call stack:
/// the root frame wraps the caller's context, and each `#each` iteration
/// links a frame binding one name to the current element. Lookups walk
/// innermost-first, so an iteration binding shadows outer bindings and
/// context keys of the same name only within its body.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    frame: Frame<'a>,
}

#[derive(Debug, Clone, Copy)]
enum Frame<'a> {
    Root(&'a Value),
    Binding {
        name: &'a str,
        value: &'a Value,
        parent: &'a Scope<'a>,
    },
}

impl<'a> Scope<'a> {
    /// Create the root scope over a render context.
    pub fn new(context: &'a Value) -> Self {
        Scope {
            frame: Frame::Root(context),
        }
    }

    /// Create a child scope binding `name` to `value`.
    pub fn bind<'b>(&'b self, name: &'b str, value: &'b Value) -> Scope<'b> {
        Scope {
            frame: Frame::Binding {
                name,
                value,
                parent: self,
            },
        }
    }

    /// Resolve a bare name, innermost binding first, then the context root.
    ///
    /// Returns [`Value::Undefined`] if nothing binds `name`.
    pub fn lookup(&self, name: &str) -> &'a Value {
        let mut scope = self;
        loop {
            match scope.frame {
                Frame::Binding {
                    name: bound,
                    value,
                    parent,
                } => {
                    if bound == name {
                        return value;
                    }
                    scope = parent;
                }
                Frame::Root(context) => return context.get(name).unwrap_or(&UNDEFINED),
            }
        }
    }
}

/// The shared undefined sentinel.
pub(crate) fn undefined() -> &'static Value {
    &UNDEFINED
}
