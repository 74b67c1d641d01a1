//! Index-linked token sequences
//!
//! Tokens live in one growable arena and are chained through `prev`/`next`
//! indices. An arena may hold several independent chains (the parser keeps
//! the activated modeling-comment text in its own chain). Every splice is
//! O(1) and only touches the target and its direct neighbours.

use super::{AngleSplit, JavaToken, RawToken};
use crate::result::Result;
use la_arena::{Arena, Idx, RawIdx};
use std::fmt;

/// Stable handle of a token inside a [`TokenList`]
///
/// Ids order by allocation, so within one chain built by `push` an earlier
/// token has a smaller id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(Idx<TokenCell>);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", u32::from(self.0.into_raw()))
    }
}

#[derive(Debug, Clone)]
struct TokenCell {
    token: JavaToken,
    prev: Option<TokenId>,
    next: Option<TokenId>,
}

/// Arena of doubly-linked tokens
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    cells: Arena<TokenCell>,
    /// Last token of the chain `push` appends to
    tail: Option<TokenId>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens ever allocated, linked or not
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Id the next allocation will receive
    pub fn next_id(&self) -> TokenId {
        TokenId(Idx::from_raw(RawIdx::from(self.cells.len() as u32)))
    }

    /// Allocate an unlinked token
    pub fn alloc(&mut self, token: JavaToken) -> TokenId {
        TokenId(self.cells.alloc(TokenCell {
            token,
            prev: None,
            next: None,
        }))
    }

    /// Allocate a token and link it after the current construction tail
    pub fn push(&mut self, token: JavaToken) -> TokenId {
        let id = self.alloc(token);
        if let Some(tail) = self.tail {
            self.cells[tail.0].next = Some(id);
            self.cells[id.0].prev = Some(tail);
        }
        self.tail = Some(id);
        id
    }

    /// Build a token from a lexer match and append it
    pub fn push_raw(&mut self, raw: &RawToken, split: AngleSplit) -> Result<TokenId> {
        let token = JavaToken::from_raw(raw, split)?;
        Ok(self.push(token))
    }

    /// Start a fresh chain: the next `push` has no predecessor
    ///
    /// Returns the tail of the chain being left, for [`resume_chain`](Self::resume_chain).
    pub fn begin_chain(&mut self) -> Option<TokenId> {
        self.tail.take()
    }

    /// Continue appending after `tail`
    pub fn resume_chain(&mut self, tail: Option<TokenId>) {
        self.tail = tail;
    }

    pub fn get(&self, id: TokenId) -> &JavaToken {
        &self.cells[id.0].token
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.cells[id.0].prev
    }

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.cells[id.0].next
    }

    /// Whether the token currently has at least one neighbour
    pub fn is_linked(&self, id: TokenId) -> bool {
        let cell = &self.cells[id.0];
        cell.prev.is_some() || cell.next.is_some()
    }

    /// Link `new` directly before `target`
    ///
    /// `new` must not be linked anywhere; this is not checked in release builds.
    pub fn insert(&mut self, target: TokenId, new: TokenId) {
        debug_assert!(!self.is_linked(new), "token {new} is already linked");
        let prev = self.cells[target.0].prev;
        if let Some(p) = prev {
            self.cells[p.0].next = Some(new);
        }
        self.cells[new.0].prev = prev;
        self.cells[new.0].next = Some(target);
        self.cells[target.0].prev = Some(new);
        tracing::trace!(%target, %new, "inserted token before");
    }

    /// Link `new` directly after `target`
    pub fn insert_after(&mut self, target: TokenId, new: TokenId) {
        debug_assert!(!self.is_linked(new), "token {new} is already linked");
        let next = self.cells[target.0].next;
        if let Some(n) = next {
            self.cells[n.0].prev = Some(new);
        }
        self.cells[new.0].next = next;
        self.cells[new.0].prev = Some(target);
        self.cells[target.0].next = Some(new);
        if self.tail == Some(target) {
            self.tail = Some(new);
        }
        tracing::trace!(%target, %new, "inserted token after");
    }

    /// Unlink `target`, joining its neighbours
    pub fn delete_token(&mut self, target: TokenId) {
        let (prev, next) = {
            let cell = &self.cells[target.0];
            (cell.prev, cell.next)
        };
        if let Some(p) = prev {
            self.cells[p.0].next = next;
        }
        if let Some(n) = next {
            self.cells[n.0].prev = prev;
        }
        self.cells[target.0].prev = None;
        self.cells[target.0].next = None;
        if self.tail == Some(target) {
            self.tail = prev;
        }
        tracing::trace!(%target, "deleted token");
    }

    /// Put `new` where `target` is, unlinking `target`
    pub fn replace_token(&mut self, target: TokenId, new: TokenId) {
        debug_assert!(!self.is_linked(new), "token {new} is already linked");
        let (prev, next) = {
            let cell = &self.cells[target.0];
            (cell.prev, cell.next)
        };
        if let Some(p) = prev {
            self.cells[p.0].next = Some(new);
        }
        if let Some(n) = next {
            self.cells[n.0].prev = Some(new);
        }
        self.cells[new.0].prev = prev;
        self.cells[new.0].next = next;
        self.cells[target.0].prev = None;
        self.cells[target.0].next = None;
        if self.tail == Some(target) {
            self.tail = Some(new);
        }
        tracing::trace!(%target, %new, "replaced token");
    }

    /// First token of the chain containing `id`
    pub fn find_first_token(&self, id: TokenId) -> TokenId {
        let mut current = id;
        while let Some(prev) = self.prev(current) {
            current = prev;
        }
        current
    }

    /// Last token of the chain containing `id`
    pub fn find_last_token(&self, id: TokenId) -> TokenId {
        let mut current = id;
        while let Some(next) = self.next(current) {
            current = next;
        }
        current
    }

    /// Walk forward starting at (and including) `id`
    pub fn iter_from(&self, id: TokenId) -> impl Iterator<Item = TokenId> + '_ {
        std::iter::successors(Some(id), move |&current| self.next(current))
    }

    /// Walk backward starting at (and including) `id`
    pub fn iter_back_from(&self, id: TokenId) -> impl Iterator<Item = TokenId> + '_ {
        std::iter::successors(Some(id), move |&current| self.prev(current))
    }

    /// Concatenated text of the whole chain containing `id`
    pub fn chain_text(&self, id: TokenId) -> String {
        self.iter_from(self.find_first_token(id))
            .map(|t| self.get(t).text())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn word(text: &str) -> JavaToken {
        JavaToken::synthetic(TokenKind::Identifier, text)
    }

    fn forward(list: &TokenList, from: TokenId) -> Vec<String> {
        let first = list.find_first_token(from);
        list.iter_from(first).map(|t| list.get(t).text().to_string()).collect()
    }

    fn backward(list: &TokenList, from: TokenId) -> Vec<String> {
        let last = list.find_last_token(from);
        list.iter_back_from(last).map(|t| list.get(t).text().to_string()).collect()
    }

    fn assert_consistent(list: &TokenList, any: TokenId) {
        let mut fwd = forward(list, any);
        fwd.reverse();
        assert_eq!(fwd, backward(list, any));
    }

    #[test]
    fn push_links_in_order() {
        let mut list = TokenList::new();
        let a = list.push(word("a"));
        let b = list.push(word("b"));
        let c = list.push(word("c"));
        assert_eq!(list.next(a), Some(b));
        assert_eq!(list.prev(c), Some(b));
        assert_eq!(list.find_first_token(c), a);
        assert_eq!(list.find_last_token(a), c);
        assert_eq!(list.chain_text(b), "abc");
    }

    #[test]
    fn splices_keep_links_symmetric() {
        let mut list = TokenList::new();
        let a = list.push(word("a"));
        let b = list.push(word("b"));
        let c = list.push(word("c"));

        let x = list.alloc(word("x"));
        list.insert(b, x);
        assert_eq!(forward(&list, a), ["a", "x", "b", "c"]);
        assert_consistent(&list, c);

        let y = list.alloc(word("y"));
        list.insert_after(c, y);
        assert_eq!(forward(&list, a), ["a", "x", "b", "c", "y"]);
        assert_consistent(&list, a);

        list.delete_token(b);
        assert!(!list.is_linked(b));
        assert_eq!(forward(&list, a), ["a", "x", "c", "y"]);
        assert_consistent(&list, y);

        let z = list.alloc(word("z"));
        list.replace_token(a, z);
        assert_eq!(forward(&list, c), ["z", "x", "c", "y"]);
        assert_consistent(&list, z);

        let w = list.alloc(word("w"));
        list.insert(z, w);
        assert_eq!(list.find_first_token(y), w);
        assert_consistent(&list, x);
    }

    #[test]
    fn deleting_tail_moves_construction_point() {
        let mut list = TokenList::new();
        let a = list.push(word("a"));
        let b = list.push(word("b"));
        list.delete_token(b);
        let c = list.push(word("c"));
        assert_eq!(list.next(a), Some(c));
        assert_eq!(list.chain_text(a), "ac");
    }

    #[test]
    fn separate_chains_do_not_touch() {
        let mut list = TokenList::new();
        let a = list.push(word("a"));
        let b = list.push(word("b"));
        let tail = list.begin_chain();
        assert_eq!(tail, Some(b));
        let c = list.push(word("c"));
        list.resume_chain(tail);
        let d = list.push(word("d"));
        assert_eq!(list.prev(c), None);
        assert_eq!(list.prev(d), Some(b));
        assert_eq!(list.chain_text(a), "abd");
        assert_eq!(list.chain_text(c), "c");
    }

    #[test]
    fn ids_follow_allocation_order() {
        let mut list = TokenList::new();
        assert!(list.is_empty());
        let expected = list.next_id();
        let a = list.push(word("a"));
        assert_eq!(a, expected);
        let loose = list.alloc(word("x"));
        let b = list.push(word("b"));
        assert!(a < loose && loose < b);
        assert_eq!(list.len(), 3);
        assert_eq!(list.next(a), Some(b));
        assert!(!list.is_linked(loose));
        assert_eq!(a.to_string(), "#0");
        assert_eq!(b.to_string(), "#2");
    }
}
