//! Recursive-descent parser for Java with JML annotations
//!
//! Every lexer match, trivia included, is appended to the tree's
//! [`TokenList`](crate::token::TokenList) as it is consumed, so the main
//! token chain spells out the source text exactly and each node records the
//! first and last significant token it spans.
//!
//! Modeling comments are collected while skipping trivia. At member and
//! statement boundaries the active ones are run through the [`Sanitizer`],
//! the resulting buffer is lexed and parsed as JML on a token chain of its
//! own. Inactive modeling comments, and active ones found anywhere else,
//! become ordinary comments.
//!
//! Parsing fails fast: the first problem is returned as
//! [`JmlxError::Parse`].
//!
//! # Example
//!
//! ```rust,ignore
//! use jmlx_core::config::ParserConfiguration;
//! use jmlx_core::parser::parse;
//!
//! let parsed = parse("class A { int x; }", &ParserConfiguration::default())?;
//! assert_eq!(parsed.ast.source_text(parsed.root).as_deref(), Some("class A { int x; }"));
//! ```

mod declarations;
mod expressions;
mod jml;
mod statements;
mod types;

use crate::ast::{Ast, NodeId, NodeKind, Property};
use crate::comments::CommentsInserter;
use crate::config::ParserConfiguration;
use crate::error::JmlxError;
use crate::lexer::lex;
use crate::result::Result;
use crate::sanitizer::{Sanitizer, modeling_marker};
use crate::token::{AngleSplit, RawToken, TokenId, TokenKind, TokenRange};

/// A parsed compilation unit and the tree that owns it
#[derive(Debug)]
pub struct ParseResult {
    pub ast: Ast,
    pub root: NodeId,
}

/// Parse a compilation unit
pub fn parse(source: &str, config: &ParserConfiguration) -> Result<ParseResult> {
    let (raws, errors) = lex(source);
    if let Some(error) = errors.first() {
        return Err(JmlxError::parse_error(error.message.clone(), error.position));
    }

    let mut parser = Parser::new(raws, config);
    let root = parser.compilation_unit()?;
    let Parser { mut ast, comments, .. } = parser;

    if config.attribute_comments {
        CommentsInserter::new(config).insert(&mut ast, root, comments)?;
    } else {
        for comment in comments {
            ast.add_orphan_comment(root, comment)?;
        }
    }
    tracing::debug!(nodes = ast.len(), tokens = ast.tokens().len(), "parsed compilation unit");
    Ok(ParseResult { ast, root })
}

/// Token cursor and tree under construction
struct Parser<'a> {
    /// Lexer matches; a partly consumed `>` run is replaced by its remainder
    raws: Vec<RawToken>,
    pos: usize,
    ast: Ast,
    config: &'a ParserConfiguration,
    sanitizer: Sanitizer,
    /// Ordinary comment nodes, in source order
    comments: Vec<NodeId>,
    /// Modeling comment tokens seen since the last significant token
    modeling: Vec<TokenId>,
    /// Last significant token appended
    last: Option<TokenId>,
    /// Parsing a sanitized modeling buffer
    in_jml: bool,
}

impl<'a> Parser<'a> {
    fn new(raws: Vec<RawToken>, config: &'a ParserConfiguration) -> Self {
        Self {
            raws,
            pos: 0,
            ast: Ast::new(),
            config,
            sanitizer: Sanitizer::from_config(config),
            comments: Vec::new(),
            modeling: Vec::new(),
            last: None,
            in_jml: false,
        }
    }

    // Cursor

    /// The `n`-th significant match from the cursor; `Eof` once past the end
    fn nth(&self, n: usize) -> &RawToken {
        let mut remaining = n;
        for raw in &self.raws[self.pos.min(self.raws.len() - 1)..] {
            if raw.kind.is_trivia() {
                continue;
            }
            if remaining == 0 || raw.kind == TokenKind::Eof {
                return raw;
            }
            remaining -= 1;
        }
        // lex output always ends with Eof
        &self.raws[self.raws.len() - 1]
    }

    fn current(&self) -> &RawToken {
        self.nth(0)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn nth_kind(&self, n: usize) -> TokenKind {
        self.nth(n).kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Current token is an identifier spelled `word`
    fn at_word(&self, word: &str) -> bool {
        let current = self.current();
        current.kind == TokenKind::Identifier && current.text == word
    }

    fn at_end(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Append the trivia at the cursor, turning comments into nodes
    fn consume_trivia(&mut self) -> Result<()> {
        while let Some(raw) = self.raws.get(self.pos) {
            if !raw.kind.is_trivia() {
                break;
            }
            let kind = raw.kind;
            let id = self.ast.tokens_mut().push_raw(raw, AngleSplit::Whole)?;
            self.pos += 1;
            if kind.is_modeling_comment() && self.config.process_jml && !self.in_jml {
                self.modeling.push(id);
            } else if kind.is_comment() {
                let comment = self.comment_node(id)?;
                self.comments.push(comment);
            }
        }
        Ok(())
    }

    /// Consume the current significant token
    fn advance(&mut self) -> Result<TokenId> {
        self.advance_split(AngleSplit::Whole)
    }

    /// Consume the current token, or only its leading `>` characters
    fn advance_split(&mut self, split: AngleSplit) -> Result<TokenId> {
        self.consume_trivia()?;
        self.demote_modeling()?;
        let Some(raw) = self.raws.get(self.pos) else {
            return Err(self.error("unexpected end of input"));
        };
        let id = self.ast.tokens_mut().push_raw(raw, split)?;
        match raw.remainder(split) {
            Some(rest) => {
                tracing::trace!(rest = %rest.text, "re-requesting rest of right-angle match");
                self.raws[self.pos] = rest;
            }
            None => self.pos += 1,
        }
        self.last = Some(id);
        Ok(id)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<TokenId> {
        if self.at(kind) {
            self.advance()
        } else {
            let wanted = kind.fixed_text().map_or_else(|| format!("{kind:?}"), |t| format!("'{t}'"));
            Err(self.unexpected(&wanted))
        }
    }

    /// Consume the token if it has the given kind
    fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.at(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_identifier(&mut self) -> Result<(TokenId, String)> {
        if !self.at(TokenKind::Identifier) {
            return Err(self.unexpected("an identifier"));
        }
        let text = self.current().text.clone();
        Ok((self.advance()?, text))
    }

    /// Token id the next significant token will get
    fn start(&mut self) -> Result<TokenId> {
        self.consume_trivia()?;
        Ok(self.ast.tokens().next_id())
    }

    /// Tokens from `start` up to the last consumed one
    fn span(&self, start: TokenId) -> Option<TokenRange> {
        Some(TokenRange::new(start, self.last.unwrap_or(start)))
    }

    // Errors

    fn error(&self, message: impl Into<String>) -> JmlxError {
        JmlxError::parse_error(message, self.current().begin)
    }

    fn unexpected(&self, wanted: &str) -> JmlxError {
        let found = self.current();
        let found = match found.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", found.text),
        };
        self.error(format!("expected {wanted}, found {found}"))
    }

    // Comments

    fn comment_node(&mut self, id: TokenId) -> Result<NodeId> {
        let token = self.ast.tokens().get(id);
        let text = token.text();
        let (kind, content) = match token.kind() {
            TokenKind::JavadocComment => (NodeKind::JavadocComment, block_body(text, "/**")),
            TokenKind::BlockComment | TokenKind::JmlBlockComment => {
                (NodeKind::BlockComment, block_body(text, "/*"))
            }
            _ => (
                NodeKind::LineComment,
                text.strip_prefix("//").unwrap_or(text).to_string(),
            ),
        };
        self.ast
            .build(kind)
            .value(Property::Content, content)
            .token_range(Some(TokenRange::single(id)))
            .finish()
    }

    /// Turn pending modeling comments into ordinary comments
    fn demote_modeling(&mut self) -> Result<()> {
        for id in std::mem::take(&mut self.modeling) {
            tracing::warn!(
                text = %self.ast.tokens().get(id).text(),
                "modeling comment outside a member or statement position, kept as a comment"
            );
            let comment = self.comment_node(id)?;
            self.comments.push(comment);
        }
        Ok(())
    }

    /// Take the pending modeling group, keeping only active comments
    ///
    /// Inactive ones become ordinary comments. Returns an empty group when
    /// nothing is left to parse.
    fn take_modeling(&mut self) -> Result<Vec<TokenId>> {
        self.consume_trivia()?;
        let mut active = Vec::new();
        for id in std::mem::take(&mut self.modeling) {
            let text = self.ast.tokens().get(id).text();
            let is_active = text
                .get(2..)
                .and_then(modeling_marker)
                .is_some_and(|marker| self.sanitizer.is_active(&marker.tags));
            if is_active {
                active.push(id);
            } else {
                tracing::debug!(%text, "inactive modeling comment");
                let comment = self.comment_node(id)?;
                self.comments.push(comment);
            }
        }
        Ok(active)
    }
}

/// Text between a block comment's opener and its closing `*/`
fn block_body(text: &str, opener: &str) -> String {
    let body = text.strip_prefix(opener).unwrap_or(text);
    body.strip_suffix("*/").unwrap_or(body).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(source: &str) -> ParseResult {
        parse(source, &ParserConfiguration::default()).unwrap()
    }

    #[test]
    fn token_chain_spells_the_source() {
        let source = "package a.b;\n\n// note\nclass A<T> {\n  /** doc */\n  int x = 1 >>> 2;\n}\n";
        let parsed = parse_default(source);
        assert_eq!(parsed.ast.source_text(parsed.root).as_deref(), Some(source));
        assert!(parsed.ast.validate(parsed.root).is_ok());
    }

    #[test]
    fn lexer_errors_fail_the_parse() {
        let err = parse("class A { char c = 'x; }", &ParserConfiguration::default()).unwrap_err();
        assert!(matches!(err, JmlxError::Parse { line: 1, .. }));
    }

    #[test]
    fn syntax_errors_carry_positions() {
        let err = parse("class A {\n  int ;\n}", &ParserConfiguration::default()).unwrap_err();
        match err {
            JmlxError::Parse { line, column, message } => {
                assert_eq!((line, column), (2, 7));
                assert!(message.contains("identifier"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn comments_become_orphans_without_attribution() {
        let config = ParserConfiguration {
            attribute_comments: false,
            ..ParserConfiguration::default()
        };
        let parsed = parse("// a\nclass A {\n  // b\n  int x;\n}\n", &config).unwrap();
        let orphans = parsed.ast.orphan_comments(parsed.root);
        assert_eq!(orphans.len(), 2);
        assert_eq!(parsed.ast.comment_content(orphans[1]), Some(" b"));
    }

    #[test]
    fn block_comment_bodies() {
        assert_eq!(block_body("/** doc */", "/**"), " doc ");
        assert_eq!(block_body("/* x", "/*"), " x");
    }
}
