//! Re-interleaving of orphan comments among their siblings
//!
//! Orphan comments are children of some node without a fixed relation to
//! any structural sibling. Sorting a node's children by begin position
//! recovers the original order: the comments between two structural
//! children print before the second one, and the comments after the last
//! structural child print before the node closes.

use crate::ast::{Ast, NodeId};
use crate::comments::sort_by_begin;
use crate::error::JmlxError;
use crate::result::Result;

/// Comments of `child`'s parent that belong right before `child`
///
/// These are the comments between the closest preceding structural
/// sibling (in position order) and `child` itself.
pub fn comments_before(ast: &Ast, child: NodeId) -> Result<Vec<NodeId>> {
    if ast.kind(child).is_comment() {
        return Ok(Vec::new());
    }
    let Some(parent) = ast.parent(child) else {
        return Ok(Vec::new());
    };
    let mut everything = ast.children(parent);
    sort_by_begin(ast, &mut everything);

    let position = everything.iter().position(|&n| n == child).ok_or_else(|| {
        JmlxError::interleaving_error(format!("{child} is not among the children of {parent}"))
    })?;
    let previous = everything[..position]
        .iter()
        .rposition(|&n| !ast.kind(n).is_comment());
    Ok(everything[previous.map_or(0, |p| p + 1)..position].to_vec())
}

/// The run of comments at the end of `node`'s position-sorted children
pub fn comments_ending(ast: &Ast, node: NodeId) -> Vec<NodeId> {
    let mut everything = ast.children(node);
    sort_by_begin(ast, &mut everything);
    let trailing = everything
        .iter()
        .rev()
        .take_while(|&&n| ast.kind(n).is_comment())
        .count();
    everything.split_off(everything.len() - trailing)
}
