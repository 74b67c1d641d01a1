//! First/last token pairs delimiting a node

use super::{TokenId, TokenList};
use crate::position::Range;

/// The (first, last) tokens of a node inside some token chain
///
/// Ranges are assigned once by the parser and are not kept up to date by
/// structural edits; an edited node may carry a stale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenRange {
    begin: TokenId,
    end: TokenId,
}

impl TokenRange {
    pub fn new(begin: TokenId, end: TokenId) -> Self {
        Self { begin, end }
    }

    pub fn single(token: TokenId) -> Self {
        Self::new(token, token)
    }

    pub fn begin(&self) -> TokenId {
        self.begin
    }

    pub fn end(&self) -> TokenId {
        self.end
    }

    pub fn with_begin(self, begin: TokenId) -> Self {
        Self { begin, ..self }
    }

    pub fn with_end(self, end: TokenId) -> Self {
        Self { end, ..self }
    }

    /// Tokens from `begin` to `end`, stopping early at the end of the chain
    pub fn iter<'a>(&self, list: &'a TokenList) -> impl Iterator<Item = TokenId> + 'a {
        let end = self.end;
        let mut done = false;
        list.iter_from(self.begin).take_while(move |&id| {
            if done {
                return false;
            }
            done = id == end;
            true
        })
    }

    /// Verbatim source text covered by the range
    pub fn text(&self, list: &TokenList) -> String {
        self.iter(list).map(|id| list.get(id).text()).collect()
    }

    /// Positional range from the first token's begin to the last token's end
    pub fn to_range(&self, list: &TokenList) -> Option<Range> {
        let begin = list.get(self.begin).range()?;
        let end = list.get(self.end).range()?;
        Some(Range::new(begin.begin, end.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::token::{JavaToken, TokenKind};

    fn token(kind: TokenKind, text: &str, line: usize, column: usize) -> JavaToken {
        let begin = Position::new(line, column);
        let end = begin.right(text.chars().count().saturating_sub(1));
        JavaToken::new(kind, text, Some(Range::new(begin, end)))
    }

    #[test]
    fn text_and_range_of_span() {
        let mut list = TokenList::new();
        list.push(token(TokenKind::IntKw, "int", 1, 1));
        let space = list.push(token(TokenKind::Whitespace, " ", 1, 4));
        let x = list.push(token(TokenKind::Identifier, "x", 1, 5));
        let semi = list.push(token(TokenKind::Semicolon, ";", 1, 6));

        let range = TokenRange::new(space, semi);
        assert_eq!(range.text(&list), " x;");
        assert_eq!(range.to_range(&list), Some(Range::from_coords(1, 4, 1, 6)));
        assert_eq!(TokenRange::single(x).text(&list), "x");
    }

    #[test]
    fn iteration_stops_at_chain_end_when_last_was_deleted() {
        let mut list = TokenList::new();
        let a = list.push(token(TokenKind::Identifier, "a", 1, 1));
        let b = list.push(token(TokenKind::Identifier, "b", 1, 2));
        let c = list.push(token(TokenKind::Identifier, "c", 1, 3));
        list.delete_token(b);
        let range = TokenRange::new(a, b);
        assert_eq!(range.iter(&list).collect::<Vec<_>>(), vec![a, c]);
    }
}
