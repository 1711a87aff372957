//! Lexical scopes
//!
//! An `Environment` is a handle to one scope. Cloning the handle shares the
//! scope; `child()` creates a new scope whose parent is this one. Children
//! keep their parent alive, so a closure can hold its declaration scope for as
//! long as the function value exists.
//!
//! A function declared in a scope is stored in that same scope, so scopes and
//! closures form reference cycles. Handles are counted separately from the
//! links held inside the value graph (`ScopeLink`); once a scope has no
//! handles left, `release` finds the scopes that only the graph itself still
//! reaches and clears their bindings.

mod release;

use crate::value::{RuntimeError, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) use release::{release_function, release_object};

/// Whether a binding can be reassigned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `let` bindings and function parameters
    Mutable,
    /// `const` bindings, functions and standard globals
    Constant,
}

impl Mutability {
    pub fn from_constant(constant: bool) -> Self {
        if constant {
            Mutability::Constant
        } else {
            Mutability::Mutable
        }
    }

    #[inline]
    pub fn is_constant(self) -> bool {
        matches!(self, Mutability::Constant)
    }
}

/// A variable binding
#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// A single scope containing variable bindings
#[derive(Default)]
struct Scope {
    bindings: HashMap<String, Binding>,
    parent: Option<ScopeLink>,
}

/// A scope and the number of `Environment` handles pointing at it
#[derive(Default)]
struct ScopeCell {
    handles: Cell<usize>,
    scope: RefCell<Scope>,
}

type ScopeRef = Rc<ScopeCell>;

/// Shared handle to a scope
///
/// A scope with at least one live handle is never released.
pub struct Environment(ScopeRef);

impl Environment {
    /// Create a root scope with no parent
    pub fn new() -> Self {
        Self::from_ref(ScopeRef::default())
    }

    fn from_ref(scope: ScopeRef) -> Self {
        scope.handles.set(scope.handles.get() + 1);
        Environment(scope)
    }

    /// Create a new scope nested in this one
    pub fn child(&self) -> Self {
        self.link().child()
    }

    /// A non-owning link to this scope, as captured by a closure
    pub fn link(&self) -> ScopeLink {
        ScopeLink(Rc::clone(&self.0))
    }

    /// A weak reference that does not keep the scope alive
    pub fn downgrade(&self) -> WeakEnvironment {
        WeakEnvironment(Rc::downgrade(&self.0))
    }

    /// The enclosing scope, if any
    pub fn parent(&self) -> Option<Environment> {
        let scope = self.0.scope.borrow();
        scope.parent.as_ref().map(ScopeLink::environment)
    }

    /// Add a binding to this scope
    ///
    /// Fails if `name` is already bound in this scope. Shadowing a binding of
    /// an enclosing scope is allowed.
    pub fn declare(
        &self,
        name: impl Into<String>,
        value: Value,
        constant: bool,
    ) -> Result<Value, RuntimeError> {
        let name = name.into();
        let mut scope = self.0.scope.borrow_mut();
        if scope.bindings.contains_key(&name) {
            return Err(RuntimeError::Redeclaration { name });
        }
        scope.bindings.insert(
            name,
            Binding {
                value: value.clone(),
                mutability: Mutability::from_constant(constant),
            },
        );
        Ok(value)
    }

    /// Bind `name` in this scope, replacing any existing binding
    ///
    /// Used by hosts to seed a root scope; programs go through `declare`.
    pub fn define(&self, name: impl Into<String>, value: Value, mutability: Mutability) {
        let previous = self
            .0
            .scope
            .borrow_mut()
            .bindings
            .insert(name.into(), Binding { value, mutability });
        drop(previous);
    }

    /// Overwrite the nearest binding of `name`
    pub fn assign(&self, name: &str, value: Value) -> Result<Value, RuntimeError> {
        let owner = self.find(name).ok_or_else(|| RuntimeError::UndefinedVariable {
            name: name.to_string(),
        })?;
        let previous = {
            let mut scope = owner.scope.borrow_mut();
            match scope.bindings.get_mut(name) {
                Some(binding) if binding.mutability.is_constant() => {
                    return Err(RuntimeError::ConstantReassignment {
                        name: name.to_string(),
                    });
                }
                Some(binding) => std::mem::replace(&mut binding.value, value.clone()),
                None => {
                    return Err(RuntimeError::UndefinedVariable {
                        name: name.to_string(),
                    });
                }
            }
        };
        // Dropped outside the borrow so the scope can be inspected on release
        drop(previous);
        Ok(value)
    }

    /// Value of the nearest binding of `name`
    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        self.find(name)
            .and_then(|owner| local(&owner, name).map(|binding| binding.value))
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// The scope that binds `name`, searching outward from this one
    pub fn resolve(&self, name: &str) -> Option<Environment> {
        self.find(name).map(Self::from_ref)
    }

    /// Iterative so long scope chains cannot exhaust the stack
    fn find(&self, name: &str) -> Option<ScopeRef> {
        let mut current = Rc::clone(&self.0);
        loop {
            let parent = {
                let scope = current.scope.borrow();
                if scope.bindings.contains_key(name) {
                    None
                } else {
                    Some(Rc::clone(&scope.parent.as_ref()?.0))
                }
            };
            match parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// True if `name` is bound in this scope (parents are not searched)
    pub fn has_local(&self, name: &str) -> bool {
        let scope = self.0.scope.borrow();
        scope.bindings.contains_key(name)
    }

    /// True if the nearest binding of `name` is constant
    pub fn is_constant(&self, name: &str) -> bool {
        self.find(name)
            .and_then(|owner| local(&owner, name))
            .is_some_and(|binding| binding.mutability.is_constant())
    }

    /// Names bound in this scope, sorted
    pub fn names(&self) -> Vec<String> {
        let scope = self.0.scope.borrow();
        let mut names: Vec<String> = scope.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Bindings of this scope as `(name, value, mutability)`, sorted by name
    pub fn bindings(&self) -> Vec<(String, Value, Mutability)> {
        let scope = self.0.scope.borrow();
        let mut bindings: Vec<_> = scope
            .bindings
            .iter()
            .map(|(name, binding)| (name.clone(), binding.value.clone(), binding.mutability))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }

    /// True if both handles refer to the same scope
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// `owner`'s own binding of `name`
fn local(owner: &ScopeRef, name: &str) -> Option<Binding> {
    let scope = owner.scope.borrow();
    scope.bindings.get(name).cloned()
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Environment {
    fn clone(&self) -> Self {
        Self::from_ref(Rc::clone(&self.0))
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        let handles = self.0.handles.get().saturating_sub(1);
        self.0.handles.set(handles);
        if handles == 0 && Rc::strong_count(&self.0) > 1 {
            release::release_scope(&self.0);
        }
    }
}

/// Link to a scope from inside the value graph
///
/// Closures hold their declaration scope this way, and every scope holds its
/// parent this way. A link keeps the scope allocated but, unlike an
/// `Environment`, does not count as a handle.
#[derive(Clone)]
pub struct ScopeLink(ScopeRef);

impl ScopeLink {
    /// A handle to the linked scope
    pub fn environment(&self) -> Environment {
        Environment::from_ref(Rc::clone(&self.0))
    }

    /// Create a new scope nested in the linked one
    pub fn child(&self) -> Environment {
        Environment::from_ref(Rc::new(ScopeCell {
            handles: Cell::new(0),
            scope: RefCell::new(Scope {
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            }),
        }))
    }

    /// True if this links to the scope behind `env`
    pub fn ptr_eq(&self, env: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &env.0)
    }

    fn is_held(&self) -> bool {
        self.0.handles.get() > 0
    }
}

impl Drop for ScopeLink {
    fn drop(&mut self) {
        if !self.is_held() && Rc::strong_count(&self.0) > 1 {
            release::release_scope(&self.0);
        }
    }
}

impl fmt::Debug for ScopeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeLink")
            .field("handles", &self.0.handles.get())
            .finish()
    }
}

/// Weak reference to a scope, see `Environment::downgrade`
#[derive(Clone, Debug)]
pub struct WeakEnvironment(Weak<ScopeCell>);

impl WeakEnvironment {
    /// A handle to the scope, if it is still allocated
    pub fn upgrade(&self) -> Option<Environment> {
        self.0.upgrade().map(Environment::from_ref)
    }

    /// True while the scope is still allocated
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values can hold this scope again through closures; print names only
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("has_parent", &self.parent().is_some())
            .finish()
    }
}
