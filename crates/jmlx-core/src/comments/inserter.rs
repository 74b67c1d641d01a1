//! Attribution of parsed comments to tree nodes

use super::sort_by_begin;
use crate::ast::{Ast, NodeId, NodeKind, Property};
use crate::config::ParserConfiguration;
use crate::result::Result;

/// Distributes the comments of a parsed file over its tree
///
/// A comment goes to the deepest node whose range contains it. Inside that
/// node, a line comment ending a child's line is attached to the child, a
/// comment directly preceding a child is attached to it, and everything
/// else becomes an orphan.
#[derive(Debug, Clone)]
pub struct CommentsInserter {
    do_not_assign_comments_preceding_empty_lines: bool,
}

impl Default for CommentsInserter {
    fn default() -> Self {
        Self {
            do_not_assign_comments_preceding_empty_lines: true,
        }
    }
}

impl CommentsInserter {
    pub fn new(config: &ParserConfiguration) -> Self {
        Self {
            do_not_assign_comments_preceding_empty_lines: config
                .do_not_assign_comments_preceding_empty_lines,
        }
    }

    /// Attribute `comments` (unowned, positioned comment nodes) below `root`
    pub fn insert(&self, ast: &mut Ast, root: NodeId, mut comments: Vec<NodeId>) -> Result<()> {
        sort_by_begin(ast, &mut comments);
        tracing::debug!(count = comments.len(), "attributing comments");
        self.insert_into(ast, root, comments)
    }

    fn insert_into(&self, ast: &mut Ast, node: NodeId, mut comments: Vec<NodeId>) -> Result<()> {
        if comments.is_empty() {
            return Ok(());
        }
        if ast.kind(node) == NodeKind::CompilationUnit {
            self.claim_file_comment(ast, node, &mut comments)?;
        }

        let children: Vec<NodeId> = ast
            .children(node)
            .into_iter()
            .filter(|&c| ast.kind(c) != NodeKind::Modifier)
            .collect();

        for &child in &children {
            let Some(child_range) = ast.range(child) else {
                continue;
            };
            let (inside, outside): (Vec<NodeId>, Vec<NodeId>) = comments
                .into_iter()
                .partition(|&c| ast.range(c).is_some_and(|r| child_range.contains(&r)));
            comments = outside;
            self.insert_into(ast, child, inside)?;
        }

        self.attribute_line_comments_on_same_line(ast, &mut comments, &children)?;

        if let Some(&first) = comments.first() {
            if ast.comment(node).is_none() && comment_is_on_previous_line(ast, node, first) {
                ast.set_comment(node, Some(first))?;
                comments.remove(0);
            }
        }

        let mut things = children.clone();
        things.extend(comments.iter().copied());
        sort_by_begin(ast, &mut things);
        let mut previous: Option<NodeId> = None;
        for thing in things {
            if ast.kind(thing).is_comment() {
                previous = Some(thing).filter(|&c| ast.parent(c).is_none());
            } else if let Some(comment) = previous {
                if ast.comment(thing).is_none()
                    && (!self.do_not_assign_comments_preceding_empty_lines
                        || !lines_between(ast, comment, thing))
                {
                    ast.set_comment(thing, Some(comment))?;
                    previous = None;
                }
            }
        }

        for comment in comments {
            if ast.parent(comment).is_none() {
                ast.add_orphan_comment(node, comment)?;
            }
        }
        Ok(())
    }

    /// A comment before the package declaration belongs to the whole file
    fn claim_file_comment(&self, ast: &mut Ast, unit: NodeId, comments: &mut Vec<NodeId>) -> Result<()> {
        let Some(package) = ast.child(unit, Property::PackageDeclaration) else {
            return Ok(());
        };
        let first = comments[0];
        let in_order = match (ast.range(first), ast.range(package)) {
            (Some(c), Some(p)) => c.begin <= p.begin,
            _ => false,
        };
        if in_order && ast.comment(unit).is_none() {
            ast.set_comment(unit, Some(first))?;
            comments.remove(0);
        }
        Ok(())
    }

    fn attribute_line_comments_on_same_line(
        &self,
        ast: &mut Ast,
        comments: &mut Vec<NodeId>,
        children: &[NodeId],
    ) -> Result<()> {
        let mut attributed = Vec::new();
        for &comment in comments.iter() {
            if ast.kind(comment) != NodeKind::LineComment {
                continue;
            }
            let Some(comment_range) = ast.range(comment) else {
                continue;
            };
            for &child in children {
                let ends_on_line = ast
                    .range(child)
                    .is_some_and(|r| r.end.line == comment_range.begin.line);
                if ends_on_line && attribute_to_node_or_child(ast, child, comment)? {
                    attributed.push(comment);
                    break;
                }
            }
        }
        comments.retain(|c| !attributed.contains(c));
        Ok(())
    }
}

/// Give a trailing line comment to `node` or its nearest descendant that
/// starts on the comment's line
fn attribute_to_node_or_child(ast: &mut Ast, node: NodeId, comment: NodeId) -> Result<bool> {
    let (Some(node_range), Some(comment_range)) = (ast.range(node), ast.range(comment)) else {
        return Ok(false);
    };
    if ast.kind(node).is_comment() {
        return Ok(false);
    }
    if node_range.begin.line == comment_range.begin.line && ast.comment(node).is_none() {
        ast.set_comment(node, Some(comment))?;
        return Ok(true);
    }
    let mut children = ast.children(node);
    sort_by_begin(ast, &mut children);
    for child in children.into_iter().rev() {
        if attribute_to_node_or_child(ast, child, comment)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn lines_between(ast: &Ast, a: NodeId, b: NodeId) -> bool {
    let (Some(a), Some(b)) = (ast.range(a), ast.range(b)) else {
        return true;
    };
    let (first, second) = if a.begin <= b.begin { (a, b) } else { (b, a) };
    second.begin.line > first.end.line + 1
}

fn comment_is_on_previous_line(ast: &Ast, node: NodeId, comment: NodeId) -> bool {
    match (ast.range(comment), ast.range(node)) {
        (Some(c), Some(n)) => c.end.line + 1 == n.begin.line,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Range;

    fn positioned(ast: &mut Ast, id: NodeId, range: Range) -> NodeId {
        ast.set_range(id, Some(range));
        id
    }

    /// A block spanning lines 1..=10 with one empty statement on `line`
    fn block_with_statement(ast: &mut Ast, line: usize) -> (NodeId, NodeId) {
        let stmt = ast.build(NodeKind::EmptyStmt).finish().unwrap();
        positioned(ast, stmt, Range::from_coords(line, 5, line, 5));
        let block = ast
            .build(NodeKind::BlockStmt)
            .list(Property::Statements, [stmt])
            .range(Some(Range::from_coords(1, 1, 10, 1)))
            .finish()
            .unwrap();
        (block, stmt)
    }

    fn line_comment_at(ast: &mut Ast, line: usize, column: usize) -> NodeId {
        let c = ast.line_comment(" c");
        positioned(ast, c, Range::from_coords(line, column, line, column + 3))
    }

    #[test]
    fn preceding_comment_attaches() {
        let mut ast = Ast::new();
        let (block, stmt) = block_with_statement(&mut ast, 5);
        let c = line_comment_at(&mut ast, 4, 5);
        CommentsInserter::default().insert(&mut ast, block, vec![c]).unwrap();
        assert_eq!(ast.comment(stmt), Some(c));
    }

    #[test]
    fn empty_line_makes_an_orphan() {
        let mut ast = Ast::new();
        let (block, stmt) = block_with_statement(&mut ast, 5);
        let c = line_comment_at(&mut ast, 3, 5);
        CommentsInserter::default().insert(&mut ast, block, vec![c]).unwrap();
        assert_eq!(ast.comment(stmt), None);
        assert_eq!(ast.orphan_comments(block), &[c]);

        let mut ast = Ast::new();
        let (block, stmt) = block_with_statement(&mut ast, 5);
        let c = line_comment_at(&mut ast, 3, 5);
        let config = ParserConfiguration {
            do_not_assign_comments_preceding_empty_lines: false,
            ..ParserConfiguration::default()
        };
        CommentsInserter::new(&config).insert(&mut ast, block, vec![c]).unwrap();
        assert_eq!(ast.comment(stmt), Some(c));
    }

    #[test]
    fn trailing_line_comment_attaches_to_same_line() {
        let mut ast = Ast::new();
        let (block, stmt) = block_with_statement(&mut ast, 5);
        let c = line_comment_at(&mut ast, 5, 8);
        CommentsInserter::default().insert(&mut ast, block, vec![c]).unwrap();
        assert_eq!(ast.comment(stmt), Some(c));
    }

    #[test]
    fn comment_after_last_child_is_orphan() {
        let mut ast = Ast::new();
        let (block, _) = block_with_statement(&mut ast, 2);
        let c = line_comment_at(&mut ast, 6, 5);
        CommentsInserter::default().insert(&mut ast, block, vec![c]).unwrap();
        assert_eq!(ast.orphan_comments(block), &[c]);
        ast.validate(block).unwrap();
    }
}
