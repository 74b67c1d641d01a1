//! Node construction

use super::{Ast, Field, FieldShape, ModifierKeyword, NodeId, NodeKind, PrimitiveKind, Property, Value};
use crate::error::JmlxError;
use crate::position::Range;
use crate::result::Result;
use crate::token::TokenRange;

/// Collects the properties of a new node and creates it in one step
///
/// ```ignore
/// let stmt = ast
///     .build(NodeKind::ReturnStmt)
///     .child(Property::Expression, value)
///     .finish()?;
/// ```
pub struct NodeBuilder<'a> {
    ast: &'a mut Ast,
    kind: NodeKind,
    slots: Vec<(Property, NodeId)>,
    lists: Vec<(Property, Vec<NodeId>)>,
    values: Vec<(Property, Value)>,
    token_range: Option<TokenRange>,
    range: Option<Range>,
}

impl<'a> NodeBuilder<'a> {
    pub(super) fn new(ast: &'a mut Ast, kind: NodeKind) -> Self {
        Self {
            ast,
            kind,
            slots: Vec::new(),
            lists: Vec::new(),
            values: Vec::new(),
            token_range: None,
            range: None,
        }
    }

    pub fn child(mut self, property: Property, child: NodeId) -> Self {
        self.slots.push((property, child));
        self
    }

    pub fn opt_child(self, property: Property, child: Option<NodeId>) -> Self {
        match child {
            Some(child) => self.child(property, child),
            None => self,
        }
    }

    pub fn list(mut self, property: Property, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.lists.push((property, children.into_iter().collect()));
        self
    }

    pub fn value(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.values.push((property, value.into()));
        self
    }

    pub fn token_range(mut self, token_range: Option<TokenRange>) -> Self {
        self.token_range = token_range;
        self
    }

    pub fn range(mut self, range: Option<Range>) -> Self {
        self.range = range;
        self
    }

    fn shape_of(&self, property: Property, expected: &'static str) -> Result<FieldShape> {
        self.kind
            .field(property)
            .map(|spec| spec.shape)
            .filter(|shape| shape.describe() == expected)
            .ok_or(JmlxError::UnknownProperty {
                kind: self.kind,
                property,
                shape: expected,
            })
    }

    fn check_child(&self, property: Property, shape: FieldShape, child: NodeId, seen: &mut Vec<NodeId>) -> Result<()> {
        let child_kind = self.ast.kind(child);
        if let Some(accepts) = shape.accepts() {
            if !accepts.admits(child_kind) {
                return Err(JmlxError::InadmissibleChild {
                    kind: self.kind,
                    property,
                    child: child_kind,
                });
            }
        }
        if self.ast.parent(child).is_some() || seen.contains(&child) {
            return Err(JmlxError::AlreadyAttached { node: child });
        }
        seen.push(child);
        Ok(())
    }

    /// Validate everything, then allocate and attach
    pub fn finish(self) -> Result<NodeId> {
        let mut seen = Vec::new();
        for &(property, child) in &self.slots {
            let shape = self.shape_of(property, "child")?;
            self.check_child(property, shape, child, &mut seen)?;
        }
        for (property, children) in &self.lists {
            let shape = self.shape_of(*property, "list")?;
            for &child in children {
                self.check_child(*property, shape, child, &mut seen)?;
            }
        }
        for (property, value) in &self.values {
            let shape = self.shape_of(*property, "value")?;
            if shape != FieldShape::Value(value.value_type()) {
                return Err(JmlxError::UnknownProperty {
                    kind: self.kind,
                    property: *property,
                    shape: "value of this type",
                });
            }
        }
        for spec in self.kind.schema() {
            if matches!(spec.shape, FieldShape::Required(_))
                && !self.slots.iter().any(|(p, _)| *p == spec.property)
            {
                return Err(JmlxError::RequiredProperty {
                    kind: self.kind,
                    property: spec.property,
                });
            }
        }

        let NodeBuilder {
            ast,
            kind,
            slots,
            lists,
            values,
            token_range,
            range,
        } = self;
        let id = ast.alloc(kind);
        for (property, value) in values {
            ast.put(id, property, Field::Value(value));
        }
        for (property, child) in slots {
            ast.put(id, property, Field::Child(Some(child)));
            ast.attach(child, id);
        }
        for (property, children) in lists {
            ast.put(id, property, Field::List(children.clone()));
            for child in children {
                ast.attach(child, id);
            }
        }
        if token_range.is_some() {
            ast.set_token_range(id, token_range);
        }
        if range.is_some() {
            ast.set_range(id, range);
        }
        tracing::trace!(node = %id, %kind, "built node");
        Ok(id)
    }
}

/// Shorthands for leaf nodes that cannot fail to build
impl Ast {
    /// Write a field of a node that was just allocated
    fn put(&mut self, id: NodeId, property: Property, field: Field) {
        if let Some(index) = self.kind(id).field_index(property) {
            self.node_mut(id).fields[index] = field;
        }
    }

    fn leaf(&mut self, kind: NodeKind, property: Property, value: Value) -> NodeId {
        let id = self.alloc(kind);
        self.put(id, property, Field::Value(value));
        id
    }

    pub fn simple_name(&mut self, identifier: &str) -> NodeId {
        self.leaf(NodeKind::SimpleName, Property::Identifier, identifier.into())
    }

    /// A possibly qualified `Name` such as `java.util.List`
    pub fn qualified_name(&mut self, name: &str) -> NodeId {
        let mut current: Option<NodeId> = None;
        for part in name.split('.') {
            let id = self.leaf(NodeKind::Name, Property::Identifier, part.into());
            if let Some(qualifier) = current {
                self.put(id, Property::Qualifier, Field::Child(Some(qualifier)));
                self.node_mut(qualifier).parent = Some(id);
            }
            current = Some(id);
        }
        current.unwrap_or_else(|| self.leaf(NodeKind::Name, Property::Identifier, name.into()))
    }

    pub fn name_expr(&mut self, identifier: &str) -> NodeId {
        let name = self.simple_name(identifier);
        let id = self.alloc(NodeKind::NameExpr);
        self.put(id, Property::Name, Field::Child(Some(name)));
        self.node_mut(name).parent = Some(id);
        id
    }

    pub fn modifier(&mut self, keyword: ModifierKeyword) -> NodeId {
        self.leaf(NodeKind::Modifier, Property::Keyword, Value::Modifier(keyword))
    }

    pub fn primitive_type(&mut self, primitive: PrimitiveKind) -> NodeId {
        self.leaf(NodeKind::PrimitiveType, Property::Primitive, Value::Primitive(primitive))
    }

    pub fn line_comment(&mut self, content: &str) -> NodeId {
        self.leaf(NodeKind::LineComment, Property::Content, content.into())
    }

    pub fn block_comment(&mut self, content: &str) -> NodeId {
        self.leaf(NodeKind::BlockComment, Property::Content, content.into())
    }

    pub fn javadoc_comment(&mut self, content: &str) -> NodeId {
        self.leaf(NodeKind::JavadocComment, Property::Content, content.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_children() {
        let mut ast = Ast::new();
        let a = ast.name_expr("a");
        let b = ast.name_expr("b");
        let sum = ast
            .build(NodeKind::BinaryExpr)
            .child(Property::Left, a)
            .value(Property::Operator, Value::Binary(crate::ast::BinaryOperator::Plus))
            .child(Property::Right, b)
            .finish()
            .unwrap();
        assert_eq!(ast.parent(a), Some(sum));
        assert_eq!(ast.children(sum), vec![a, b]);
        ast.validate(sum).unwrap();
    }

    #[test]
    fn builder_checks_before_allocating() {
        let mut ast = Ast::new();
        let a = ast.name_expr("a");
        let before = ast.len();
        let err = ast
            .build(NodeKind::BinaryExpr)
            .child(Property::Left, a)
            .finish()
            .unwrap_err();
        assert!(matches!(err, JmlxError::RequiredProperty { property: Property::Right, .. }));

        let err = ast
            .build(NodeKind::BinaryExpr)
            .child(Property::Left, a)
            .child(Property::Right, a)
            .finish()
            .unwrap_err();
        assert!(matches!(err, JmlxError::AlreadyAttached { .. }));
        assert_eq!(ast.len(), before);
    }

    #[test]
    fn qualified_names_nest_left() {
        let mut ast = Ast::new();
        let name = ast.qualified_name("java.util.List");
        assert_eq!(ast.text(name, Property::Identifier), Some("List"));
        let util = ast.child(name, Property::Qualifier).unwrap();
        assert_eq!(ast.text(util, Property::Identifier), Some("util"));
        assert_eq!(ast.parent(util), Some(name));
        ast.validate(name).unwrap();
    }
}
