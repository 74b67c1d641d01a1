//! Comment ownership
//!
//! A comment node is owned in exactly one of two ways: as the attached
//! comment of a non-comment node, or as one of the orphan comments of some
//! node. Either way its parent is the owner, so [`Ast::remove_comment`]
//! works the same for both.

mod inserter;

pub use inserter::CommentsInserter;

use crate::ast::{Accepts, Ast, AstEvent, Category, ListChange, NodeId, Property, PropertyValue};
use crate::error::JmlxError;
use crate::position::Position;
use crate::result::Result;

/// Sort by begin position; nodes without a range go last, in their
/// current relative order
pub fn sort_by_begin(ast: &Ast, nodes: &mut [NodeId]) {
    nodes.sort_by_key(|&id| match ast.range(id) {
        Some(range) => (0, range.begin),
        None => (1, Position::HOME),
    });
}

impl Ast {
    fn expect_comment(&self, comment: NodeId) -> Result<()> {
        let kind = self.kind(comment);
        if kind.is_comment() {
            Ok(())
        } else {
            Err(JmlxError::NotAComment {
                node: comment,
                kind,
            })
        }
    }

    pub fn comment(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).comment()
    }

    /// Attach `comment` to `id`, or clear the attached comment
    ///
    /// Same contract as any other setter: detach old, notify, attach new.
    pub fn set_comment(&mut self, id: NodeId, comment: Option<NodeId>) -> Result<()> {
        let old = self.comment(id);
        if old == comment {
            return Ok(());
        }
        if self.kind(id).is_comment() {
            if let Some(new) = comment {
                return Err(JmlxError::InadmissibleChild {
                    kind: self.kind(id),
                    property: Property::Comment,
                    child: self.kind(new),
                });
            }
        }
        if let Some(new) = comment {
            self.expect_comment(new)?;
            self.check_attachable(id, Property::Comment, Accepts::Category(Category::Comment), new)?;
        }
        if let Some(old) = old {
            self.detach(old);
        }
        self.notify(AstEvent::PropertyChanged {
            node: id,
            property: Property::Comment,
            old: PropertyValue::Node(old),
            new: PropertyValue::Node(comment),
        });
        self.node_mut(id).comment = comment;
        if let Some(new) = comment {
            self.attach(new, id);
        }
        Ok(())
    }

    pub fn orphan_comments(&self, id: NodeId) -> &[NodeId] {
        self.node(id).orphan_comments()
    }

    /// Register `comment` as an orphan of `id`
    pub fn add_orphan_comment(&mut self, id: NodeId, comment: NodeId) -> Result<()> {
        self.expect_comment(comment)?;
        self.check_attachable(id, Property::OrphanComments, Accepts::Category(Category::Comment), comment)?;
        let index = self.node(id).orphan_comments.len();
        self.notify(AstEvent::ListChanged {
            node: id,
            property: Property::OrphanComments,
            change: ListChange::Added { index, child: comment },
        });
        self.node_mut(id).orphan_comments.push(comment);
        self.attach(comment, id);
        Ok(())
    }

    /// Drop `comment` from the orphans of `id`; `false` if it is not there
    pub fn remove_orphan_comment(&mut self, id: NodeId, comment: NodeId) -> bool {
        let Some(index) = self.node(id).orphan_comments.iter().position(|&c| c == comment) else {
            return false;
        };
        self.detach(comment);
        self.notify(AstEvent::ListChanged {
            node: id,
            property: Property::OrphanComments,
            change: ListChange::Removed { index, child: comment },
        });
        self.node_mut(id).orphan_comments.remove(index);
        true
    }

    pub(crate) fn replace_orphan_comment(&mut self, id: NodeId, target: NodeId, replacement: NodeId) -> Result<bool> {
        let Some(index) = self.node(id).orphan_comments.iter().position(|&c| c == target) else {
            return Ok(false);
        };
        if target == replacement {
            return Ok(true);
        }
        self.expect_comment(replacement)?;
        self.check_attachable(id, Property::OrphanComments, Accepts::Category(Category::Comment), replacement)?;
        self.detach(target);
        self.notify(AstEvent::ListChanged {
            node: id,
            property: Property::OrphanComments,
            change: ListChange::Replaced {
                index,
                old: target,
                new: replacement,
            },
        });
        self.node_mut(id).orphan_comments[index] = replacement;
        self.attach(replacement, id);
        Ok(true)
    }

    /// Ask the comment's owner to drop it
    ///
    /// Works for attached and orphan comments alike; `false` when the
    /// comment has no owner.
    pub fn remove_comment(&mut self, comment: NodeId) -> bool {
        self.remove_node(comment)
    }

    /// The node `comment` is attached to, if it is not an orphan
    pub fn commented_node(&self, comment: NodeId) -> Option<NodeId> {
        self.parent(comment)
            .filter(|&owner| self.comment(owner) == Some(comment))
    }

    pub fn is_orphan_comment(&self, comment: NodeId) -> bool {
        self.parent(comment)
            .is_some_and(|owner| self.orphan_comments(owner).contains(&comment))
    }

    /// Every comment below `id`, attached or orphan, excluding its own
    pub fn all_contained_comments(&self, id: NodeId) -> Vec<NodeId> {
        let own = self.comment(id);
        self.descendants(id)
            .into_iter()
            .filter(|&n| n != id && Some(n) != own && self.kind(n).is_comment())
            .collect()
    }

    pub fn comment_content(&self, comment: NodeId) -> Option<&str> {
        self.text(comment, Property::Content)
    }

    pub fn set_comment_content(&mut self, comment: NodeId, content: &str) -> Result<()> {
        self.expect_comment(comment)?;
        self.set_value(comment, Property::Content, content)
    }
}
