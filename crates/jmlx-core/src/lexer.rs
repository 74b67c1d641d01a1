//! Trivia-preserving lexer for Java with embedded JML
//!
//! Every character of the input ends up in exactly one token, so the text
//! of the token sequence is the source text. Whitespace, line breaks and
//! comments are tokens of their own. Modeling comments (`//@`, `/*@`,
//! `//+key@`, `/*-key@ ... */`) get dedicated kinds so the parser can hand
//! them to the sanitizer.
//!
//! Right-angle runs are matched greedily (`>>>=` is one match); splitting
//! them for nested type arguments is the parser's business.

use crate::position::Position;
use crate::sanitizer::modeling_marker;
use crate::token::{RawToken, TokenKind};

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub position: Position,
}

impl LexerError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Result returned by the lexer
pub type LexResult = (Vec<RawToken>, Vec<LexerError>);

/// Operators and separators, longest first
const PUNCTUATION: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::UShrAssign),
    ("<==>", TokenKind::Equivalence),
    (">>>", TokenKind::UShr),
    ("<<=", TokenKind::ShlAssign),
    (">>=", TokenKind::ShrAssign),
    ("...", TokenKind::Ellipsis),
    ("==>", TokenKind::Implies),
    ("==", TokenKind::EqEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("!=", TokenKind::Ne),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusAssign),
    ("-=", TokenKind::MinusAssign),
    ("*=", TokenKind::StarAssign),
    ("/=", TokenKind::SlashAssign),
    ("&=", TokenKind::AmpAssign),
    ("|=", TokenKind::PipeAssign),
    ("^=", TokenKind::CaretAssign),
    ("%=", TokenKind::PercentAssign),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("->", TokenKind::Arrow),
    ("::", TokenKind::DoubleColon),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("@", TokenKind::At),
    ("=", TokenKind::Assign),
    (">", TokenKind::Gt),
    ("<", TokenKind::Lt),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("%", TokenKind::Percent),
];

/// Lex `input` starting at line 1, column 1
///
/// The returned tokens always end with an empty `Eof` token.
pub fn lex(input: &str) -> LexResult {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    position: Position,
    /// Position of the most recently consumed character
    last: Position,
    tokens: Vec<RawToken>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            position: Position::HOME,
            last: Position::HOME,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume one character, tracking line and column
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        self.last = self.position;
        match c {
            '\r' if self.peek() == Some('\n') => self.position.column += 1,
            '\r' | '\n' => self.position = Position::new(self.position.line + 1, 1),
            _ => self.position.column += 1,
        }
        Some(c)
    }

    fn bump_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize, begin: Position) {
        let text = &self.input[start..self.offset];
        self.tokens.push(RawToken::new(kind, text, begin, self.last));
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.offset;
            let begin = self.position;
            let kind = match c {
                '\r' => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    TokenKind::Newline
                }
                '\n' => {
                    self.bump();
                    TokenKind::Newline
                }
                c if c.is_whitespace() => {
                    self.bump_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                    TokenKind::Whitespace
                }
                '/' if self.peek_nth(1) == Some('/') => self.line_comment(),
                '/' if self.peek_nth(1) == Some('*') => self.block_comment(begin),
                '"' => self.string_literal(begin),
                '\'' => self.char_literal(begin),
                '\\' => self.jml_keyword(begin),
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => self.number(),
                c if is_identifier_start(c) => {
                    self.bump_while(is_identifier_part);
                    TokenKind::from_word(&self.input[start..self.offset]).unwrap_or(TokenKind::Identifier)
                }
                _ => self.punctuation(begin),
            };
            self.emit(kind, start, begin);
        }
        let end = self.position;
        self.tokens.push(RawToken::new(TokenKind::Eof, "", end, end));
    }

    fn line_comment(&mut self) -> TokenKind {
        let modeling = modeling_marker(&self.rest()[2..]).is_some();
        self.bump_while(|c| c != '\n' && c != '\r');
        if modeling {
            TokenKind::JmlLineComment
        } else {
            TokenKind::LineComment
        }
    }

    fn block_comment(&mut self, begin: Position) -> TokenKind {
        let after_opener = &self.rest()[2..];
        let kind = if modeling_marker(after_opener).is_some() {
            TokenKind::JmlBlockComment
        } else if after_opener.starts_with('*') && !after_opener.starts_with("*/") {
            TokenKind::JavadocComment
        } else {
            TokenKind::BlockComment
        };
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
                None => {
                    self.errors
                        .push(LexerError::new("unterminated comment", begin));
                    break;
                }
            }
        }
        kind
    }

    fn string_literal(&mut self, begin: Position) -> TokenKind {
        self.bump();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some_and(|c| c != '\n' && c != '\r') {
                        self.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    self.errors
                        .push(LexerError::new("unterminated string literal", begin));
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        TokenKind::StringLiteral
    }

    fn char_literal(&mut self, begin: Position) -> TokenKind {
        self.bump();
        loop {
            match self.peek() {
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some_and(|c| c != '\n' && c != '\r') {
                        self.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    self.errors
                        .push(LexerError::new("unterminated character literal", begin));
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        TokenKind::CharLiteral
    }

    fn jml_keyword(&mut self, begin: Position) -> TokenKind {
        self.bump();
        if self.peek().is_some_and(is_identifier_start) {
            self.bump_while(is_identifier_part);
            TokenKind::JmlKeyword
        } else {
            self.errors.push(LexerError::new("stray '\\'", begin));
            TokenKind::Unknown
        }
    }

    fn number(&mut self) -> TokenKind {
        let mut floating = false;
        if self.peek() == Some('0') && matches!(self.peek_nth(1), Some('x') | Some('X')) {
            self.bump();
            self.bump();
            self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                floating = true;
                self.bump();
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
            } else if self.peek() == Some('.') && !self.peek_nth(1).is_some_and(is_identifier_start) {
                // `1.` is a literal, `1.foo` is not
                floating = true;
                self.bump();
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let sign = matches!(self.peek_nth(1), Some('+') | Some('-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    floating = true;
                    for _ in 0..digit_at {
                        self.bump();
                    }
                    self.bump_while(|c| c.is_ascii_digit());
                }
            }
        }
        match self.peek() {
            Some('l') | Some('L') => {
                self.bump();
                TokenKind::LongLiteral
            }
            Some('f') | Some('F') | Some('d') | Some('D') => {
                self.bump();
                TokenKind::FloatingLiteral
            }
            _ if floating => TokenKind::FloatingLiteral,
            _ => TokenKind::IntegerLiteral,
        }
    }

    fn punctuation(&mut self, begin: Position) -> TokenKind {
        let rest = self.rest();
        for (text, kind) in PUNCTUATION {
            if rest.starts_with(text) {
                for _ in 0..text.len() {
                    self.bump();
                }
                return *kind;
            }
        }
        let c = self.bump().unwrap_or_default();
        self.errors
            .push(LexerError::new(format!("unexpected character {c:?}"), begin));
        TokenKind::Unknown
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Range;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let (tokens, errors) = lex(input);
        assert!(errors.is_empty(), "{errors:?}");
        tokens
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia() && *k != TokenKind::Eof)
            .collect()
    }

    #[test]
    fn lexing_is_lossless() {
        let source = "class A {\r\n  // hi\n  int x = 0x1F; /* b */ }\n";
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty());
        let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, source);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn positions_are_inclusive_and_one_based() {
        let (tokens, _) = lex("int\n  foo;");
        let foo = tokens.iter().find(|t| t.text == "foo").unwrap();
        assert_eq!(foo.range(), Range::from_coords(2, 3, 2, 5));
        let newline = tokens.iter().find(|t| t.kind == TokenKind::Newline).unwrap();
        assert_eq!(newline.range(), Range::from_coords(1, 4, 1, 4));
    }

    #[test]
    fn right_angles_are_maximal() {
        assert_eq!(
            kinds("List<List<String>> a >>>= b >= c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Lt,
                TokenKind::Identifier,
                TokenKind::Lt,
                TokenKind::Identifier,
                TokenKind::Shr,
                TokenKind::Identifier,
                TokenKind::UShrAssign,
                TokenKind::Identifier,
                TokenKind::Ge,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn comment_flavours() {
        let (tokens, _) = lex("// a\n/* b */ /** c */ /**/ //@ d\n/*+key@ e */ //TODO@x");
        let comments: Vec<TokenKind> = tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| k.is_comment())
            .collect();
        assert_eq!(
            comments,
            vec![
                TokenKind::LineComment,
                TokenKind::BlockComment,
                TokenKind::JavadocComment,
                TokenKind::BlockComment,
                TokenKind::JmlLineComment,
                TokenKind::JmlBlockComment,
                TokenKind::LineComment,
            ]
        );
    }

    #[test]
    fn literals_and_jml_words() {
        assert_eq!(
            kinds(r#"1 2L 3.5 .5 1e10 2f 'c' "s\"t" \result ==> <==>"#),
            vec![
                TokenKind::IntegerLiteral,
                TokenKind::LongLiteral,
                TokenKind::FloatingLiteral,
                TokenKind::FloatingLiteral,
                TokenKind::FloatingLiteral,
                TokenKind::FloatingLiteral,
                TokenKind::CharLiteral,
                TokenKind::StringLiteral,
                TokenKind::JmlKeyword,
                TokenKind::Implies,
                TokenKind::Equivalence,
            ]
        );
    }

    #[test]
    fn unterminated_input_is_reported() {
        let (tokens, errors) = lex("/* open");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, "/* open");

        let (_, errors) = lex("\"abc\nx");
        assert_eq!(errors[0].message, "unterminated string literal");
        let (_, errors) = lex("#");
        assert_eq!(errors[0].position, Position::new(1, 1));
    }
}
