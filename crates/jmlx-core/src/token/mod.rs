//! Tokens, token lists and token ranges

mod kind;
mod list;
mod range;
mod raw;

pub use kind::{TokenCategory, TokenKind};
pub use list::{TokenId, TokenList};
pub use range::TokenRange;
pub use raw::{AngleSplit, JavaToken, RawToken};
