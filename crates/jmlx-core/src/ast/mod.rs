//! Mutable syntax trees
//!
//! An [`Ast`] is an arena of [`Node`]s addressed by [`NodeId`]. Child slots
//! and lists hold ids, parents are id back-references, and every structural
//! change goes through the methods here so that a node is reachable from its
//! parent through exactly one slot or list.
//!
//! Nodes are never freed. A detached subtree stays in the arena and can be
//! re-attached; ids stay valid for the lifetime of the tree.

mod builder;
mod kind;
pub mod observer;
mod structure;
mod value;
pub mod visitor;

pub use builder::NodeBuilder;
pub use kind::{Accepts, Category, FieldShape, FieldSpec, NodeKind, Property};
pub use observer::{
    AstEvent, AstObserver, ChangeTracker, ListChange, ObserverId, ObserverScope, PropertyValue,
};
pub use value::{
    AssignOperator, BinaryOperator, JmlBehavior, JmlClauseKind, JmlStatementKind, ModifierKeyword,
    PrimitiveKind, UnaryOperator, Value, ValueType,
};

pub(crate) use kind::with_node_kinds;

use crate::error::JmlxError;
use crate::position::Range;
use crate::result::Result;
use crate::token::{TokenList, TokenRange};
use la_arena::{Arena, Idx};
use observer::ObserverRegistry;
use std::fmt;

/// Handle of a node inside its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Idx<Node>);

#[cfg(test)]
impl NodeId {
    /// Id of the `raw`-th allocation, for tests that need ids without a tree
    pub(crate) fn from_raw(raw: u32) -> Self {
        NodeId(Idx::from_raw(la_arena::RawIdx::from(raw)))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", u32::from(self.0.into_raw()))
    }
}

/// Storage of one schema entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Value(Value),
    Child(Option<NodeId>),
    List(Vec<NodeId>),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) token_range: Option<TokenRange>,
    pub(crate) range: Option<Range>,
    pub(crate) comment: Option<NodeId>,
    pub(crate) orphan_comments: Vec<NodeId>,
    pub(crate) fields: Box<[Field]>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        let fields = kind
            .schema()
            .iter()
            .map(|spec| match spec.shape {
                FieldShape::Value(ty) => Field::Value(ty.default_value()),
                FieldShape::Required(_) | FieldShape::Optional(_) => Field::Child(None),
                FieldShape::List(_) => Field::List(Vec::new()),
            })
            .collect();
        Self {
            kind,
            parent: None,
            token_range: None,
            range: None,
            comment: None,
            orphan_comments: Vec::new(),
            fields,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn token_range(&self) -> Option<TokenRange> {
        self.token_range
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    pub fn comment(&self) -> Option<NodeId> {
        self.comment
    }

    pub fn orphan_comments(&self) -> &[NodeId] {
        &self.orphan_comments
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Arena of nodes plus the token list they were parsed from
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Arena<Node>,
    tokens: TokenList,
    observers: ObserverRegistry,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenList) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenList {
        &mut self.tokens
    }

    /// Number of nodes ever created in this arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn token_range(&self, id: NodeId) -> Option<TokenRange> {
        self.node(id).token_range
    }

    pub fn range(&self, id: NodeId) -> Option<Range> {
        self.node(id).range
    }

    /// Assign the token range; the positional range follows it
    pub fn set_token_range(&mut self, id: NodeId, token_range: Option<TokenRange>) {
        let range = token_range.and_then(|tr| tr.to_range(&self.tokens));
        let node = &mut self.nodes[id.0];
        node.token_range = token_range;
        node.range = range;
    }

    pub fn set_range(&mut self, id: NodeId, range: Option<Range>) {
        self.nodes[id.0].range = range;
    }

    /// Verbatim source text of a parsed node
    pub fn source_text(&self, id: NodeId) -> Option<String> {
        self.token_range(id).map(|tr| tr.text(&self.tokens))
    }

    /// Allocate a node with default values and empty children
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        NodeId(self.nodes.alloc(Node::new(kind)))
    }

    /// Start building a node of `kind`
    pub fn build(&mut self, kind: NodeKind) -> NodeBuilder<'_> {
        NodeBuilder::new(self, kind)
    }

    pub fn observe(&mut self, scope: ObserverScope, observer: impl AstObserver + 'static) -> ObserverId {
        self.observers.register(scope, Box::new(observer))
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    // ----- reading -----

    fn field(&self, id: NodeId, property: Property) -> Option<&Field> {
        let index = self.kind(id).field_index(property)?;
        self.node(id).fields.get(index)
    }

    /// Content of a single child slot; `None` when empty or not a slot
    pub fn child(&self, id: NodeId, property: Property) -> Option<NodeId> {
        match self.field(id, property) {
            Some(Field::Child(child)) => *child,
            _ => None,
        }
    }

    /// Content of a child list; empty when not a list
    pub fn list(&self, id: NodeId, property: Property) -> &[NodeId] {
        match self.field(id, property) {
            Some(Field::List(items)) => items,
            _ => &[],
        }
    }

    pub fn value(&self, id: NodeId, property: Property) -> Option<&Value> {
        match self.field(id, property) {
            Some(Field::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId, property: Property) -> Option<&str> {
        self.value(id, property).and_then(Value::as_text)
    }

    pub fn flag(&self, id: NodeId, property: Property) -> bool {
        self.value(id, property)
            .and_then(Value::as_flag)
            .unwrap_or(false)
    }

    /// Identifier of the `Name` child, for declarations and name expressions
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        let name = self.child(id, Property::Name)?;
        self.text(name, Property::Identifier)
    }

    /// Structural children in schema order, then orphan comments
    ///
    /// The attached comment is not included.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        let mut children = Vec::new();
        for field in node.fields.iter() {
            match field {
                Field::Child(Some(child)) => children.push(*child),
                Field::List(items) => children.extend(items.iter().copied()),
                Field::Child(None) | Field::Value(_) => {}
            }
        }
        children.extend(node.orphan_comments.iter().copied());
        children
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Whether `node` is `ancestor` or lies below it
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Root of the tree containing `id`
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Pre-order walk including attached and orphan comments
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            let mut next = self.children(current);
            if let Some(comment) = self.node(current).comment {
                next.insert(0, comment);
            }
            stack.extend(next.into_iter().rev());
        }
        result
    }

    /// Every node of `kind` at or below `root`, in pre-order
    pub fn find_all(&self, root: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.kind(id) == kind)
            .collect()
    }

    // ----- writing -----

    fn lookup(&self, id: NodeId, property: Property, shape: &'static str) -> Result<(usize, FieldShape)> {
        let kind = self.kind(id);
        match kind.field_index(property) {
            Some(index) if kind.schema()[index].shape.describe() == shape => {
                Ok((index, kind.schema()[index].shape))
            }
            _ => Err(JmlxError::UnknownProperty {
                kind,
                property,
                shape,
            }),
        }
    }

    /// Preconditions for making `child` a child of `parent`
    pub(crate) fn check_attachable(
        &self,
        parent: NodeId,
        property: Property,
        accepts: Accepts,
        child: NodeId,
    ) -> Result<()> {
        let child_kind = self.kind(child);
        if !accepts.admits(child_kind) {
            return Err(JmlxError::InadmissibleChild {
                kind: self.kind(parent),
                property,
                child: child_kind,
            });
        }
        if self.parent(child).is_some() {
            return Err(JmlxError::AlreadyAttached { node: child });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(JmlxError::Cycle {
                node: child,
                parent,
            });
        }
        Ok(())
    }

    pub(crate) fn notify(&mut self, event: AstEvent) {
        if self.observers.is_empty() {
            return;
        }
        let nodes = &self.nodes;
        let within = |root: NodeId, node: NodeId| {
            let mut current = Some(node);
            while let Some(id) = current {
                if id == root {
                    return true;
                }
                current = nodes[id.0].parent;
            }
            false
        };
        self.observers.dispatch(&event, within);
    }

    /// Clear `child`'s parent link, announcing it
    pub(crate) fn detach(&mut self, child: NodeId) {
        let old = self.nodes[child.0].parent.take();
        tracing::trace!(%child, ?old, "detached node");
        self.notify(AstEvent::ParentChanged {
            node: child,
            old,
            new: None,
        });
    }

    /// Set `child`'s parent link, announcing it
    pub(crate) fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        tracing::trace!(%child, %parent, "attached node");
        self.notify(AstEvent::ParentChanged {
            node: child,
            old: None,
            new: Some(parent),
        });
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn list_mut(&mut self, id: NodeId, index: usize) -> Result<&mut Vec<NodeId>> {
        match &mut self.nodes[id.0].fields[index] {
            Field::List(items) => Ok(items),
            _ => Err(JmlxError::internal_error(format!("field {index} of {id} is not a list"))),
        }
    }

    /// Set a single child slot
    ///
    /// Setting the current child again does nothing. Otherwise the old
    /// child is detached, observers are told about the change, then the
    /// new child is attached.
    pub fn set_child(&mut self, id: NodeId, property: Property, child: Option<NodeId>) -> Result<()> {
        let (index, shape) = self.lookup(id, property, "child")?;
        let old = match &self.node(id).fields[index] {
            Field::Child(current) => *current,
            _ => return Err(JmlxError::internal_error(format!("field {index} of {id} is not a slot"))),
        };
        if old == child {
            return Ok(());
        }
        match (shape, child) {
            (FieldShape::Required(_), None) => {
                return Err(JmlxError::RequiredProperty {
                    kind: self.kind(id),
                    property,
                });
            }
            (FieldShape::Required(accepts) | FieldShape::Optional(accepts), Some(new)) => {
                self.check_attachable(id, property, accepts, new)?;
            }
            _ => {}
        }

        if let Some(old) = old {
            self.detach(old);
        }
        self.notify(AstEvent::PropertyChanged {
            node: id,
            property,
            old: PropertyValue::Node(old),
            new: PropertyValue::Node(child),
        });
        self.nodes[id.0].fields[index] = Field::Child(child);
        if let Some(new) = child {
            self.attach(new, id);
        }
        Ok(())
    }

    /// Set a value property; the value type must match the schema
    pub fn set_value(&mut self, id: NodeId, property: Property, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let (index, shape) = self.lookup(id, property, "value")?;
        if shape != FieldShape::Value(value.value_type()) {
            return Err(JmlxError::UnknownProperty {
                kind: self.kind(id),
                property,
                shape: "value of this type",
            });
        }
        let field = &mut self.nodes[id.0].fields[index];
        let old = match field {
            Field::Value(old) if *old == value => return Ok(()),
            Field::Value(old) => std::mem::replace(old, value.clone()),
            _ => return Err(JmlxError::internal_error(format!("field {index} of {id} is not a value"))),
        };
        tracing::trace!(node = %id, ?property, "value changed");
        self.notify(AstEvent::PropertyChanged {
            node: id,
            property,
            old: PropertyValue::Value(old),
            new: PropertyValue::Value(value),
        });
        Ok(())
    }

    /// Insert `child` at `index` of a child list
    pub fn list_insert(&mut self, id: NodeId, property: Property, index: usize, child: NodeId) -> Result<()> {
        let (field, shape) = self.lookup(id, property, "list")?;
        let len = self.list(id, property).len();
        if index > len {
            return Err(JmlxError::ListIndex { property, index, len });
        }
        if let Some(accepts) = shape.accepts() {
            self.check_attachable(id, property, accepts, child)?;
        }
        self.notify(AstEvent::ListChanged {
            node: id,
            property,
            change: ListChange::Added { index, child },
        });
        self.list_mut(id, field)?.insert(index, child);
        self.attach(child, id);
        Ok(())
    }

    pub fn list_push(&mut self, id: NodeId, property: Property, child: NodeId) -> Result<()> {
        let len = self.list(id, property).len();
        self.list_insert(id, property, len, child)
    }

    /// Remove and return the child at `index`
    pub fn list_remove(&mut self, id: NodeId, property: Property, index: usize) -> Result<NodeId> {
        let (field, _) = self.lookup(id, property, "list")?;
        let len = self.list(id, property).len();
        if index >= len {
            return Err(JmlxError::ListIndex { property, index, len });
        }
        let child = self.list(id, property)[index];
        self.detach(child);
        self.notify(AstEvent::ListChanged {
            node: id,
            property,
            change: ListChange::Removed { index, child },
        });
        self.list_mut(id, field)?.remove(index);
        Ok(child)
    }

    /// Replace the child at `index`, returning the old one
    pub fn list_set(&mut self, id: NodeId, property: Property, index: usize, child: NodeId) -> Result<NodeId> {
        let (field, shape) = self.lookup(id, property, "list")?;
        let len = self.list(id, property).len();
        if index >= len {
            return Err(JmlxError::ListIndex { property, index, len });
        }
        let old = self.list(id, property)[index];
        if old == child {
            return Ok(old);
        }
        if let Some(accepts) = shape.accepts() {
            self.check_attachable(id, property, accepts, child)?;
        }
        self.detach(old);
        self.notify(AstEvent::ListChanged {
            node: id,
            property,
            change: ListChange::Replaced { index, old, new: child },
        });
        self.list_mut(id, field)?[index] = child;
        self.attach(child, id);
        Ok(old)
    }

    /// Remove `target` from `parent`
    ///
    /// Looks through child lists, then optional slots, then the attached
    /// comment, then orphan comments. Required slots are never emptied.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, parent: NodeId, target: NodeId) -> bool {
        let schema = self.kind(parent).schema();
        for spec in schema {
            if let FieldShape::List(_) = spec.shape {
                if let Some(index) = self.list(parent, spec.property).iter().position(|&c| c == target) {
                    return self.list_remove(parent, spec.property, index).is_ok();
                }
            }
        }
        for spec in schema {
            if let FieldShape::Optional(_) = spec.shape {
                if self.child(parent, spec.property) == Some(target) {
                    return self.set_child(parent, spec.property, None).is_ok();
                }
            }
        }
        if self.node(parent).comment == Some(target) {
            return self.set_comment(parent, None).is_ok();
        }
        self.remove_orphan_comment(parent, target)
    }

    /// Put `replacement` where `target` is inside `parent`
    ///
    /// `Ok(false)` when `target` is not a child of `parent`; errors only
    /// for an unacceptable `replacement`.
    pub fn replace(&mut self, parent: NodeId, target: NodeId, replacement: NodeId) -> Result<bool> {
        let schema = self.kind(parent).schema();
        for spec in schema {
            if let FieldShape::List(_) = spec.shape {
                if let Some(index) = self.list(parent, spec.property).iter().position(|&c| c == target) {
                    self.list_set(parent, spec.property, index, replacement)?;
                    return Ok(true);
                }
            }
        }
        for spec in schema {
            if let FieldShape::Required(_) | FieldShape::Optional(_) = spec.shape {
                if self.child(parent, spec.property) == Some(target) {
                    self.set_child(parent, spec.property, Some(replacement))?;
                    return Ok(true);
                }
            }
        }
        if self.node(parent).comment == Some(target) {
            self.set_comment(parent, Some(replacement))?;
            return Ok(true);
        }
        self.replace_orphan_comment(parent, target, replacement)
    }

    /// Ask `target`'s parent to remove it; `false` for roots
    pub fn remove_node(&mut self, target: NodeId) -> bool {
        match self.parent(target) {
            Some(parent) => self.remove(parent, target),
            None => false,
        }
    }

    /// Ask `target`'s parent to replace it
    pub fn replace_node(&mut self, target: NodeId, replacement: NodeId) -> Result<bool> {
        match self.parent(target) {
            Some(parent) => self.replace(parent, target, replacement),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn name(ast: &mut Ast, text: &str) -> NodeId {
        ast.simple_name(text)
    }

    fn block_with_returns(ast: &mut Ast, count: usize) -> (NodeId, Vec<NodeId>) {
        let block = ast.alloc(NodeKind::BlockStmt);
        let mut stmts = Vec::new();
        for _ in 0..count {
            let stmt = ast.alloc(NodeKind::ReturnStmt);
            ast.list_push(block, Property::Statements, stmt).unwrap();
            stmts.push(stmt);
        }
        (block, stmts)
    }

    #[test]
    fn set_child_reparents() {
        let mut ast = Ast::new();
        let expr = ast.alloc(NodeKind::NameExpr);
        let a = name(&mut ast, "a");
        let b = name(&mut ast, "b");
        ast.set_child(expr, Property::Name, Some(a)).unwrap();
        assert_eq!(ast.parent(a), Some(expr));

        ast.set_child(expr, Property::Name, Some(b)).unwrap();
        assert_eq!(ast.parent(a), None);
        assert_eq!(ast.parent(b), Some(expr));
        assert_eq!(ast.name_of(expr), Some("b"));
        ast.validate(expr).unwrap();
    }

    #[test]
    fn setter_preconditions() {
        let mut ast = Ast::new();
        let expr = ast.alloc(NodeKind::NameExpr);
        let a = name(&mut ast, "a");
        ast.set_child(expr, Property::Name, Some(a)).unwrap();

        let err = ast.set_child(expr, Property::Name, None).unwrap_err();
        assert!(matches!(err, JmlxError::RequiredProperty { .. }));

        let other = ast.alloc(NodeKind::NameExpr);
        let err = ast.set_child(other, Property::Name, Some(a)).unwrap_err();
        assert!(matches!(err, JmlxError::AlreadyAttached { node } if node == a));
        assert_eq!(err.to_string(), format!("Node {a} already has a parent; detach or clone it first"));

        let stmt = ast.alloc(NodeKind::EmptyStmt);
        let err = ast.set_child(other, Property::Name, Some(stmt)).unwrap_err();
        assert!(matches!(err, JmlxError::InadmissibleChild { .. }));

        let err = ast.set_child(other, Property::Members, None).unwrap_err();
        assert!(matches!(err, JmlxError::UnknownProperty { .. }));

        // setting the same child is a no-op, even for attached nodes
        ast.set_child(expr, Property::Name, Some(a)).unwrap();
    }

    #[test]
    fn cycles_are_rejected() {
        let mut ast = Ast::new();
        let (outer, _) = block_with_returns(&mut ast, 0);
        let inner = ast.alloc(NodeKind::BlockStmt);
        ast.list_push(outer, Property::Statements, inner).unwrap();
        ast.remove_node(inner);
        ast.list_push(inner, Property::Statements, outer).unwrap();
        let err = ast.list_push(outer, Property::Statements, inner).unwrap_err();
        assert!(matches!(err, JmlxError::Cycle { .. } | JmlxError::AlreadyAttached { .. }));
        let err = ast.list_push(inner, Property::Statements, inner).unwrap_err();
        assert!(matches!(err, JmlxError::Cycle { node, parent } if node == inner && parent == inner));
    }

    #[test]
    fn remove_prefers_lists_and_keeps_required_slots() {
        let mut ast = Ast::new();
        let (block, stmts) = block_with_returns(&mut ast, 3);
        assert!(ast.remove(block, stmts[1]));
        assert_eq!(ast.list(block, Property::Statements), &[stmts[0], stmts[2]]);
        assert_eq!(ast.parent(stmts[1]), None);
        assert!(!ast.remove(block, stmts[1]));

        let expr = ast.alloc(NodeKind::NameExpr);
        let a = name(&mut ast, "a");
        ast.set_child(expr, Property::Name, Some(a)).unwrap();
        assert!(!ast.remove(expr, a));
        assert_eq!(ast.parent(a), Some(expr));

        let ret = stmts[0];
        let value = ast.alloc(NodeKind::ThisExpr);
        ast.set_child(ret, Property::Expression, Some(value)).unwrap();
        assert!(ast.remove_node(value));
        assert_eq!(ast.child(ret, Property::Expression), None);
        assert!(!ast.remove_node(value));
    }

    #[test]
    fn replace_covers_lists_and_slots() {
        let mut ast = Ast::new();
        let (block, stmts) = block_with_returns(&mut ast, 2);
        let empty = ast.alloc(NodeKind::EmptyStmt);
        assert!(ast.replace(block, stmts[0], empty).unwrap());
        assert_eq!(ast.list(block, Property::Statements), &[empty, stmts[1]]);
        assert_eq!(ast.parent(stmts[0]), None);
        assert!(!ast.replace(block, stmts[0], stmts[0]).unwrap());

        let expr = ast.alloc(NodeKind::NameExpr);
        let a = name(&mut ast, "a");
        let b = name(&mut ast, "b");
        ast.set_child(expr, Property::Name, Some(a)).unwrap();
        assert!(ast.replace_node(a, b).unwrap());
        assert_eq!(ast.child(expr, Property::Name), Some(b));

        let this = ast.alloc(NodeKind::ThisExpr);
        let err = ast.replace_node(b, this).unwrap_err();
        assert!(matches!(err, JmlxError::InadmissibleChild { .. }));
        assert_eq!(ast.child(expr, Property::Name), Some(b));
    }

    #[test]
    fn list_bounds() {
        let mut ast = Ast::new();
        let (block, _) = block_with_returns(&mut ast, 1);
        let extra = ast.alloc(NodeKind::EmptyStmt);
        assert!(matches!(
            ast.list_insert(block, Property::Statements, 5, extra),
            Err(JmlxError::ListIndex { index: 5, len: 1, .. })
        ));
        assert!(ast.list_remove(block, Property::Statements, 1).is_err());
        ast.list_insert(block, Property::Statements, 0, extra).unwrap();
        assert_eq!(ast.list(block, Property::Statements)[0], extra);
    }

    #[test]
    fn values_are_typed() {
        let mut ast = Ast::new();
        let n = name(&mut ast, "x");
        ast.set_value(n, Property::Identifier, "y").unwrap();
        assert_eq!(ast.text(n, Property::Identifier), Some("y"));
        assert!(ast.set_value(n, Property::Identifier, true).is_err());
        assert!(ast.set_value(n, Property::Literal, "z").is_err());
    }

    #[test]
    fn events_follow_detach_notify_attach() {
        let mut ast = Ast::new();
        let expr = ast.alloc(NodeKind::NameExpr);
        let a = name(&mut ast, "a");
        let b = name(&mut ast, "b");
        ast.set_child(expr, Property::Name, Some(a)).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        ast.observe(ObserverScope::All, move |e: &AstEvent| sink.borrow_mut().push(e.clone()));
        ast.set_child(expr, Property::Name, Some(b)).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                AstEvent::ParentChanged { node: a, old: Some(expr), new: None },
                AstEvent::PropertyChanged {
                    node: expr,
                    property: Property::Name,
                    old: PropertyValue::Node(Some(a)),
                    new: PropertyValue::Node(Some(b)),
                },
                AstEvent::ParentChanged { node: b, old: None, new: Some(expr) },
            ]
        );
    }

    #[test]
    fn subtree_observers_see_descendants_only() {
        let mut ast = Ast::new();
        let (block, stmts) = block_with_returns(&mut ast, 2);
        let (other, _) = block_with_returns(&mut ast, 0);
        let (tx, rx) = crossbeam_channel::unbounded();
        ast.observe(ObserverScope::Subtree(block), tx);

        let this = ast.alloc(NodeKind::ThisExpr);
        ast.set_child(stmts[1], Property::Expression, Some(this)).unwrap();
        let empty = ast.alloc(NodeKind::EmptyStmt);
        ast.list_push(other, Property::Statements, empty).unwrap();

        let nodes: Vec<NodeId> = rx.try_iter().map(|e| e.node()).collect();
        assert_eq!(nodes, vec![stmts[1], this]);
    }
}
