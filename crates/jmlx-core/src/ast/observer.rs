//! Change notification for syntax trees
//!
//! Every mutation of an [`Ast`](super::Ast) emits [`AstEvent`]s to the
//! observers registered on that tree. Observers are plain closures or
//! `crossbeam_channel` senders; there is no global registry.

use super::{NodeId, Property, Value};
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;
use std::fmt;

/// Old or new content of a single-valued property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Node(Option<NodeId>),
    Value(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Added { index: usize, child: NodeId },
    Removed { index: usize, child: NodeId },
    Replaced { index: usize, old: NodeId, new: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstEvent {
    PropertyChanged {
        node: NodeId,
        property: Property,
        old: PropertyValue,
        new: PropertyValue,
    },
    ListChanged {
        node: NodeId,
        property: Property,
        change: ListChange,
    },
    ParentChanged {
        node: NodeId,
        old: Option<NodeId>,
        new: Option<NodeId>,
    },
}

impl AstEvent {
    /// The node the event is about
    pub fn node(&self) -> NodeId {
        match self {
            AstEvent::PropertyChanged { node, .. }
            | AstEvent::ListChanged { node, .. }
            | AstEvent::ParentChanged { node, .. } => *node,
        }
    }
}

pub trait AstObserver {
    fn on_event(&mut self, event: &AstEvent);
}

impl<F> AstObserver for F
where
    F: FnMut(&AstEvent),
{
    fn on_event(&mut self, event: &AstEvent) {
        self(event)
    }
}

impl AstObserver for Sender<AstEvent> {
    fn on_event(&mut self, event: &AstEvent) {
        if self.send(event.clone()).is_err() {
            tracing::trace!("observer channel disconnected");
        }
    }
}

/// Which events an observer receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverScope {
    /// Everything in the tree
    All,
    /// Events about this node only
    Node(NodeId),
    /// Events about this node or anything currently below it
    Subtree(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

struct Registration {
    id: ObserverId,
    scope: ObserverScope,
    observer: Box<dyn AstObserver>,
}

#[derive(Default)]
pub struct ObserverRegistry {
    next: u32,
    entries: Vec<Registration>,
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.entries.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn register(&mut self, scope: ObserverScope, observer: Box<dyn AstObserver>) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.entries.push(Registration { id, scope, observer });
        id
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `event` in registration order
    ///
    /// `within(root, node)` tells whether `node` is `root` or below it.
    pub fn dispatch(&mut self, event: &AstEvent, within: impl Fn(NodeId, NodeId) -> bool) {
        let subject = event.node();
        for entry in &mut self.entries {
            let wanted = match entry.scope {
                ObserverScope::All => true,
                ObserverScope::Node(node) => node == subject,
                ObserverScope::Subtree(root) => within(root, subject),
            };
            if wanted {
                entry.observer.on_event(event);
            }
        }
    }
}

/// Records which nodes were edited since it was attached
///
/// Parent changes alone do not mark a node: moving an untouched subtree
/// keeps its original text valid.
#[derive(Debug)]
pub struct ChangeTracker {
    id: ObserverId,
    receiver: Receiver<AstEvent>,
    touched: HashSet<NodeId>,
}

impl ChangeTracker {
    pub fn attach(ast: &mut super::Ast) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let id = ast.observe(ObserverScope::All, sender);
        Self {
            id,
            receiver,
            touched: HashSet::new(),
        }
    }

    pub fn detach(self, ast: &mut super::Ast) {
        ast.unobserve(self.id);
    }

    /// Drain pending events and return every touched node
    pub fn touched(&mut self) -> &HashSet<NodeId> {
        for event in self.receiver.try_iter() {
            match event {
                AstEvent::PropertyChanged { node, .. } | AstEvent::ListChanged { node, .. } => {
                    self.touched.insert(node);
                }
                AstEvent::ParentChanged { .. } => {}
            }
        }
        &self.touched
    }

    pub fn is_touched(&mut self, node: NodeId) -> bool {
        self.touched().contains(&node)
    }
}
