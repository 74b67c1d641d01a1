//! Deep copies, structural comparison and invariant checks

use super::{Ast, Field, FieldShape, NodeId};
use crate::error::JmlxError;
use crate::result::Result;
use std::collections::HashSet;

impl Ast {
    /// Deep-copy the subtree rooted at `id`, comments included
    ///
    /// The copy has no parent and no token range; positional ranges are
    /// carried over so the copy can still be interleaved by position.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id).clone();
        let copy = self.alloc(source.kind);
        for (index, field) in source.fields.iter().enumerate() {
            let field = match field {
                Field::Value(value) => Field::Value(value.clone()),
                Field::Child(child) => Field::Child(child.map(|c| self.clone_subtree(c))),
                Field::List(items) => Field::List(items.iter().map(|&c| self.clone_subtree(c)).collect()),
            };
            match &field {
                Field::Child(Some(child)) => self.node_mut(*child).parent = Some(copy),
                Field::List(items) => {
                    for &child in items {
                        self.node_mut(child).parent = Some(copy);
                    }
                }
                _ => {}
            }
            self.node_mut(copy).fields[index] = field;
        }
        if let Some(comment) = source.comment {
            let comment = self.clone_subtree(comment);
            self.node_mut(comment).parent = Some(copy);
            self.node_mut(copy).comment = Some(comment);
        }
        for orphan in source.orphan_comments {
            let orphan = self.clone_subtree(orphan);
            self.node_mut(orphan).parent = Some(copy);
            self.node_mut(copy).orphan_comments.push(orphan);
        }
        self.node_mut(copy).range = source.range;
        tracing::trace!(original = %id, %copy, "cloned subtree");
        copy
    }

    /// Compare two subtrees, possibly in different trees, ignoring ranges
    ///
    /// Comment text is compared modulo layout: line breaks, indentation and
    /// leading `*` decorations do not matter.
    pub fn structurally_equal(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let (left, right) = (self.node(a), other.node(b));
        if left.kind != right.kind || left.fields.len() != right.fields.len() {
            return false;
        }
        if left.kind.is_comment() {
            return comment_fingerprint(self, a) == comment_fingerprint(other, b);
        }
        let fields_equal = left.fields.iter().zip(right.fields.iter()).all(|pair| match pair {
            (Field::Value(x), Field::Value(y)) => x == y,
            (Field::Child(x), Field::Child(y)) => match (x, y) {
                (None, None) => true,
                (Some(x), Some(y)) => self.structurally_equal(*x, other, *y),
                _ => false,
            },
            (Field::List(xs), Field::List(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(x, y)| self.structurally_equal(*x, other, *y))
            }
            _ => false,
        });
        let comments_equal = match (left.comment, right.comment) {
            (None, None) => true,
            (Some(x), Some(y)) => self.structurally_equal(x, other, y),
            _ => false,
        };
        fields_equal
            && comments_equal
            && left.orphan_comments.len() == right.orphan_comments.len()
            && left
                .orphan_comments
                .iter()
                .zip(&right.orphan_comments)
                .all(|(x, y)| self.structurally_equal(*x, other, *y))
    }

    /// Check the ownership invariants of the subtree rooted at `root`
    ///
    /// Every child's parent is the node holding it, no node is held twice,
    /// required slots are filled and comments are owned in one way only.
    pub fn validate(&self, root: NodeId) -> Result<()> {
        let mut seen = HashSet::new();
        for id in self.descendants(root) {
            if !seen.insert(id) {
                return Err(JmlxError::internal_error(format!("{id} is reachable twice")));
            }
            let node = self.node(id);
            for (spec, field) in node.kind.schema().iter().zip(node.fields.iter()) {
                if let (FieldShape::Required(_), Field::Child(None)) = (spec.shape, field) {
                    return Err(JmlxError::RequiredProperty {
                        kind: node.kind,
                        property: spec.property,
                    });
                }
            }
            for child in self.children(id) {
                if self.parent(child) != Some(id) {
                    return Err(JmlxError::internal_error(format!(
                        "{child} is held by {id} but its parent is {:?}",
                        self.parent(child)
                    )));
                }
            }
            for &orphan in &node.orphan_comments {
                if !self.kind(orphan).is_comment() {
                    return Err(JmlxError::NotAComment {
                        node: orphan,
                        kind: self.kind(orphan),
                    });
                }
            }
            if let Some(comment) = node.comment {
                if !self.kind(comment).is_comment() {
                    return Err(JmlxError::NotAComment {
                        node: comment,
                        kind: self.kind(comment),
                    });
                }
                if self.parent(comment) != Some(id) || node.orphan_comments.contains(&comment) {
                    return Err(JmlxError::internal_error(format!(
                        "comment {comment} of {id} is not exclusively attached"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn comment_fingerprint(ast: &Ast, comment: NodeId) -> Vec<String> {
    ast.text(comment, super::Property::Content)
        .unwrap_or_default()
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::{NodeKind, Property};
    use super::*;

    fn method_with_body(ast: &mut Ast) -> NodeId {
        let ty = ast.build(NodeKind::VoidType).finish().unwrap();
        let name = ast.simple_name("run");
        let ret = ast.build(NodeKind::ReturnStmt).finish().unwrap();
        let body = ast
            .build(NodeKind::BlockStmt)
            .list(Property::Statements, [ret])
            .finish()
            .unwrap();
        ast.build(NodeKind::MethodDeclaration)
            .child(Property::Type, ty)
            .child(Property::Name, name)
            .child(Property::Body, body)
            .finish()
            .unwrap()
    }

    #[test]
    fn clones_are_independent() {
        let mut ast = Ast::new();
        let method = method_with_body(&mut ast);
        let doc = ast.javadoc_comment(" Runs ");
        ast.set_comment(method, Some(doc)).unwrap();

        let copy = ast.clone_subtree(method);
        assert_eq!(ast.parent(copy), None);
        assert!(ast.structurally_equal(method, &ast, copy));
        ast.validate(copy).unwrap();

        let copied_doc = ast.comment(copy).unwrap();
        assert_ne!(copied_doc, doc);
        ast.set_value(copied_doc, Property::Content, " Changed ").unwrap();
        assert_eq!(ast.text(doc, Property::Content), Some(" Runs "));
        assert!(!ast.structurally_equal(method, &ast, copy));

        let name = ast.child(copy, Property::Name).unwrap();
        ast.set_value(name, Property::Identifier, "other").unwrap();
        assert_eq!(ast.name_of(method), Some("run"));
    }

    #[test]
    fn clone_keeps_position_but_not_tokens() {
        let mut ast = Ast::new();
        let name = ast.simple_name("x");
        let range = crate::position::Range::from_coords(3, 1, 3, 1);
        ast.set_range(name, Some(range));
        let copy = ast.clone_subtree(name);
        assert_eq!(ast.range(copy), Some(range));
        assert_eq!(ast.token_range(copy), None);
    }

    #[test]
    fn comment_layout_does_not_matter() {
        let mut ast = Ast::new();
        let a = ast.javadoc_comment("\n * Comment A\n ");
        let b = ast.javadoc_comment(" Comment A ");
        let c = ast.javadoc_comment(" Comment B ");
        assert!(ast.structurally_equal(a, &ast, b));
        assert!(!ast.structurally_equal(a, &ast, c));
    }

    #[test]
    fn validation_reports_broken_links() {
        let mut ast = Ast::new();
        let method = method_with_body(&mut ast);
        ast.validate(method).unwrap();

        let body = ast.child(method, Property::Body).unwrap();
        ast.node_mut(body).parent = None;
        assert!(ast.validate(method).is_err());
    }
}
