//! Lexer matches and their conversion into list tokens
//!
//! The lexer always takes the longest match, so `List<List<String>>` yields a
//! single `>>` match where the grammar needs two closing brackets. The parser
//! tells the token list how much of such a match it consumes through an
//! [`AngleSplit`]; the token built from it is shortened, and the parser asks
//! for the rest again with [`RawToken::remainder`].

use super::TokenKind;
use crate::error::JmlxError;
use crate::position::{Position, Range};
use crate::result::Result;
use serde::{Deserialize, Serialize};

/// A single maximal match produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    pub kind: TokenKind,
    pub text: String,
    /// First character
    pub begin: Position,
    /// Last character (inclusive)
    pub end: Position,
}

impl RawToken {
    pub fn new(kind: TokenKind, text: impl Into<String>, begin: Position, end: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            begin,
            end,
        }
    }

    pub fn range(&self) -> Range {
        Range::new(self.begin, self.end)
    }

    /// Characters of this match left over after the parser consumed `split`
    ///
    /// Returns `None` when nothing is left, e.g. a single `>` out of `>`.
    pub fn remainder(&self, split: AngleSplit) -> Option<RawToken> {
        let taken = split.width()?;
        let width = self.kind.right_angle_width();
        if width < taken {
            return None;
        }
        let assign = self.text.ends_with('=');
        let rest_width = width - taken;
        let kind = match (rest_width, assign) {
            (0, false) => return None,
            (0, true) => TokenKind::Assign,
            (w, a) => TokenKind::right_angle(w, a)?,
        };
        let mut text = ">".repeat(rest_width);
        if assign {
            text.push('=');
        }
        let begin = self.begin.right(taken);
        let end = begin.right(text.chars().count() - 1);
        Some(RawToken::new(kind, text, begin, end))
    }
}

/// How much of a right-angle match the grammar consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleSplit {
    /// Take the match as lexed
    #[default]
    Whole,
    /// Only the first `>`
    Single,
    /// Only the first `>>`
    Double,
}

impl AngleSplit {
    fn width(self) -> Option<usize> {
        match self {
            AngleSplit::Whole => None,
            AngleSplit::Single => Some(1),
            AngleSplit::Double => Some(2),
        }
    }
}

/// A token as stored in a [`TokenList`](super::TokenList)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaToken {
    kind: TokenKind,
    text: String,
    range: Option<Range>,
}

impl JavaToken {
    pub fn new(kind: TokenKind, text: impl Into<String>, range: Option<Range>) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// A token without a source position
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, None)
    }

    /// Build a token from a lexer match, shortening ambiguous `>` runs
    ///
    /// Reslicing only ever shortens; the discarded characters are not
    /// represented by this token.
    pub fn from_raw(raw: &RawToken, split: AngleSplit) -> Result<Self> {
        let Some(taken) = split.width() else {
            return Ok(Self::new(raw.kind, raw.text.clone(), Some(raw.range())));
        };
        let width = raw.kind.right_angle_width();
        if width < taken {
            return Err(JmlxError::token_error(format!(
                "cannot take {taken} '>' from {:?} match {:?}",
                raw.kind, raw.text
            )));
        }
        let (kind, text) = match split {
            AngleSplit::Double => (TokenKind::Shr, ">>"),
            _ => (TokenKind::Gt, ">"),
        };
        let end = raw.begin.right(taken - 1);
        tracing::trace!(?raw.kind, text, %raw.begin, "resliced right-angle match");
        Ok(Self::new(kind, text, Some(Range::new(raw.begin, end))))
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    pub fn begin(&self) -> Option<Position> {
        self.range.map(|r| r.begin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: TokenKind, text: &str, line: usize, column: usize) -> RawToken {
        let begin = Position::new(line, column);
        RawToken::new(kind, text, begin, begin.right(text.len() - 1))
    }

    #[test]
    fn unsigned_shift_as_single_angle() {
        let m = raw(TokenKind::UShr, ">>>", 3, 20);
        let token = JavaToken::from_raw(&m, AngleSplit::Single).unwrap();
        assert_eq!(token.kind(), TokenKind::Gt);
        assert_eq!(token.text(), ">");
        assert_eq!(token.range(), Some(Range::from_coords(3, 20, 3, 20)));
    }

    #[test]
    fn unsigned_shift_as_double_angle() {
        let m = raw(TokenKind::UShr, ">>>", 3, 20);
        let token = JavaToken::from_raw(&m, AngleSplit::Double).unwrap();
        assert_eq!(token.kind(), TokenKind::Shr);
        assert_eq!(token.text(), ">>");
        assert_eq!(token.range(), Some(Range::from_coords(3, 20, 3, 21)));
    }

    #[test]
    fn whole_keeps_match() {
        let m = raw(TokenKind::ShrAssign, ">>=", 1, 4);
        let token = JavaToken::from_raw(&m, AngleSplit::Whole).unwrap();
        assert_eq!(token.kind(), TokenKind::ShrAssign);
        assert_eq!(token.text(), ">>=");
        assert_eq!(token.range(), Some(Range::from_coords(1, 4, 1, 6)));
    }

    #[test]
    fn reslicing_cannot_lengthen() {
        let m = raw(TokenKind::Gt, ">", 1, 1);
        assert!(JavaToken::from_raw(&m, AngleSplit::Double).is_err());
        let m = raw(TokenKind::Identifier, "x", 1, 1);
        assert!(JavaToken::from_raw(&m, AngleSplit::Single).is_err());
    }

    #[test]
    fn remainders_restart_after_consumed_columns() {
        let m = raw(TokenKind::UShr, ">>>", 2, 10);
        let rest = m.remainder(AngleSplit::Single).unwrap();
        assert_eq!((rest.kind, rest.text.as_str()), (TokenKind::Shr, ">>"));
        assert_eq!(rest.range(), Range::from_coords(2, 11, 2, 12));

        let rest = m.remainder(AngleSplit::Double).unwrap();
        assert_eq!((rest.kind, rest.text.as_str()), (TokenKind::Gt, ">"));
        assert_eq!(rest.begin, Position::new(2, 12));

        let m = raw(TokenKind::ShrAssign, ">>=", 1, 1);
        let rest = m.remainder(AngleSplit::Double).unwrap();
        assert_eq!((rest.kind, rest.text.as_str()), (TokenKind::Assign, "="));

        let m = raw(TokenKind::Gt, ">", 1, 1);
        assert_eq!(m.remainder(AngleSplit::Single), None);
        assert_eq!(m.remainder(AngleSplit::Whole), None);
    }
}
