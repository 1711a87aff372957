//! Releasing scopes that only reference cycles keep alive
//!
//! Trial deletion over the part of the value graph reachable from one node:
//! for every scope, function and object found, count the references coming
//! from inside the traced part. A node whose reference count is higher is
//! held from outside (a Rust local, a host value, a scope with a live
//! handle) and is live, and so is everything it reaches. Scopes left over are
//! unreachable; clearing their bindings breaks the cycles and `Rc` frees the
//! rest.
//!
//! Scopes with live `Environment` handles are not traced into. They are live,
//! and whatever they reach is live with them.

use super::{Binding, ScopeRef};
use crate::stack::ensure_sufficient_stack;
use crate::value::{FunctionValue, Value};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;

type ObjectRef = Rc<HashMap<String, Value>>;

/// Check a scope that just lost a handle or a link
pub(super) fn release_scope(scope: &ScopeRef) {
    release(Node::Scope(Rc::clone(scope)));
}

/// Check the scope of a function value that just lost a reference
pub(crate) fn release_function(func: &Rc<FunctionValue>) {
    if func.closure.is_held() {
        return;
    }
    release(Node::Function(Rc::clone(func)));
}

/// Check an object that just lost a reference
pub(crate) fn release_object(object: &ObjectRef) {
    let reaches_scope = object
        .values()
        .any(|value| matches!(value, Value::Function(_) | Value::Object(_)));
    if reaches_scope {
        release(Node::Object(Rc::clone(object)));
    }
}

enum Node {
    Scope(ScopeRef),
    Function(Rc<FunctionValue>),
    Object(ObjectRef),
}

impl Node {
    fn address(&self) -> usize {
        match self {
            Node::Scope(scope) => Rc::as_ptr(scope) as *const () as usize,
            Node::Function(func) => Rc::as_ptr(func) as *const () as usize,
            Node::Object(object) => Rc::as_ptr(object) as *const () as usize,
        }
    }

    fn strong_count(&self) -> usize {
        match self {
            Node::Scope(scope) => Rc::strong_count(scope),
            Node::Function(func) => Rc::strong_count(func),
            Node::Object(object) => Rc::strong_count(object),
        }
    }

    /// Nodes this one references, or `None` if a scope is mid-update
    fn targets(&self) -> Option<Vec<Node>> {
        let mut targets = Vec::new();
        match self {
            Node::Scope(cell) => {
                let scope = cell.scope.try_borrow().ok()?;
                if let Some(parent) = &scope.parent {
                    push_scope(&mut targets, &parent.0);
                }
                for binding in scope.bindings.values() {
                    push_value(&mut targets, &binding.value);
                }
            }
            Node::Function(func) => push_scope(&mut targets, &func.closure.0),
            Node::Object(object) => {
                for value in object.values() {
                    push_value(&mut targets, value);
                }
            }
        }
        Some(targets)
    }
}

fn push_scope(targets: &mut Vec<Node>, scope: &ScopeRef) {
    if scope.handles.get() == 0 {
        targets.push(Node::Scope(Rc::clone(scope)));
    }
}

fn push_value(targets: &mut Vec<Node>, value: &Value) {
    match value {
        Value::Function(func) => targets.push(Node::Function(Rc::clone(func.shared()))),
        Value::Object(map) => targets.push(Node::Object(Rc::clone(map.shared()))),
        _ => {}
    }
}

/// The traced part of the graph; node 0 is where tracing started
#[derive(Default)]
struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Vec<usize>>,
    internal: Vec<usize>,
    index: HashMap<usize, usize>,
}

impl Graph {
    fn trace(start: Node) -> Option<Self> {
        let mut graph = Graph::default();
        graph.insert(start);

        let mut next = 0;
        while next < graph.nodes.len() {
            for target in graph.nodes[next].targets()? {
                let id = graph.insert(target);
                graph.edges[next].push(id);
                graph.internal[id] += 1;
            }
            next += 1;
        }
        Some(graph)
    }

    fn insert(&mut self, node: Node) -> usize {
        let address = node.address();
        if let Some(&id) = self.index.get(&address) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(node);
        self.edges.push(Vec::new());
        self.internal.push(0);
        self.index.insert(address, id);
        id
    }

    /// Scopes no outside reference can reach
    fn unreachable_scopes(&self) -> Vec<ScopeRef> {
        let mut live = vec![false; self.nodes.len()];
        let mut pending: Vec<usize> = (0..self.nodes.len())
            .filter(|&id| {
                // One reference is the graph's own; node 0 also lost the one
                // being dropped, which is still counted
                let traced = 1 + self.internal[id] + usize::from(id == 0);
                self.nodes[id].strong_count() > traced
            })
            .collect();

        while let Some(id) = pending.pop() {
            if std::mem::replace(&mut live[id], true) {
                continue;
            }
            pending.extend(self.edges[id].iter().filter(|&&target| !live[target]));
        }

        self.nodes
            .iter()
            .zip(live)
            .filter_map(|(node, live)| match node {
                Node::Scope(scope) if !live => Some(Rc::clone(scope)),
                _ => None,
            })
            .collect()
    }
}

fn release(start: Node) {
    let Some(graph) = Graph::trace(start) else {
        return;
    };
    let unreachable = graph.unreachable_scopes();
    drop(graph);
    if unreachable.is_empty() {
        return;
    }

    let mut released: Vec<HashMap<String, Binding>> = Vec::new();
    for cell in &unreachable {
        if let Ok(mut scope) = cell.scope.try_borrow_mut() {
            released.push(std::mem::take(&mut scope.bindings));
        }
    }
    drop(unreachable);

    trace!(scopes = released.len(), "released unreachable scopes");
    ensure_sufficient_stack(|| drop(released));
}
