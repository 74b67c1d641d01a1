//! Modeling comment groups and the JML constructs inside them

use super::Parser;
use crate::ast::{JmlBehavior, JmlClauseKind, JmlStatementKind, NodeId, NodeKind, Property, Value};
use crate::error::JmlxError;
use crate::lexer::lex;
use crate::result::Result;
use crate::token::{JavaToken, TokenId, TokenKind, TokenRange};

impl Parser<'_> {
    /// Parse the sanitized text of `group` with `body`, on a token chain of
    /// its own
    ///
    /// A group that sanitizes to blank text becomes ordinary comments and
    /// yields `None`.
    fn in_modeling_buffer<T>(
        &mut self,
        group: &[TokenId],
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        let tokens: Vec<JavaToken> = group
            .iter()
            .map(|&id| self.ast.tokens().get(id).clone())
            .collect();
        let sanitized = self.sanitizer.sanitize_tokens(&tokens)?;
        if sanitized.is_blank() {
            for &id in group {
                let comment = self.comment_node(id)?;
                self.comments.push(comment);
            }
            return Ok(None);
        }

        let (mut raws, errors) = lex(sanitized.text());
        if let Some(error) = errors.first() {
            return Err(JmlxError::parse_error(error.message.clone(), error.position));
        }
        // The buffer is blank up to the first comment
        let leading = raws.iter().take_while(|raw| raw.kind.is_trivia()).count();
        raws.drain(..leading);
        tracing::debug!(comments = group.len(), tokens = raws.len(), "parsing modeling comments");

        let saved_raws = std::mem::replace(&mut self.raws, raws);
        let saved_pos = std::mem::replace(&mut self.pos, 0);
        let saved_last = self.last.take();
        let tail = self.ast.tokens_mut().begin_chain();
        self.in_jml = true;

        let result = body(self).and_then(|value| {
            if self.at_end() {
                Ok(value)
            } else {
                Err(self.unexpected("the end of the modeling comment"))
            }
        });

        self.in_jml = false;
        self.raws = saved_raws;
        self.pos = saved_pos;
        self.last = saved_last;
        self.ast.tokens_mut().resume_chain(tail);
        result.map(Some)
    }

    /// Class invariants and method specifications, in source order
    pub(super) fn class_modeling(&mut self, group: Vec<TokenId>) -> Result<Vec<NodeId>> {
        let items = self.in_modeling_buffer(&group, |parser| {
            let mut items = Vec::new();
            while !parser.at_end() {
                if parser.at_word("also") {
                    parser.advance()?;
                } else if parser.at_word("invariant") {
                    items.push(parser.class_invariant()?);
                } else {
                    items.push(parser.contract()?);
                }
            }
            Ok(items)
        })?;
        Ok(items.unwrap_or_default())
    }

    /// Modeling statements inside a block
    pub(super) fn block_modeling(&mut self, group: Vec<TokenId>) -> Result<Vec<NodeId>> {
        let statements = self.in_modeling_buffer(&group, |parser| {
            let mut statements = Vec::new();
            while !parser.at_end() {
                statements.push(parser.jml_statement()?);
            }
            Ok(statements)
        })?;
        Ok(statements.unwrap_or_default())
    }

    fn class_invariant(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        self.advance()?;
        let expression = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::JmlClassInvariant)
            .child(Property::Expression, expression)
            .token_range(span)
            .finish()
    }

    /// Grammar: [behavior] clause*, with at least one of the two
    fn contract(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let mut behavior = JmlBehavior::Lightweight;
        if self.at(TokenKind::Identifier) {
            if let Some(word) = JmlBehavior::from_word(&self.current().text) {
                behavior = word;
                self.advance()?;
            }
        }
        let mut clauses = Vec::new();
        while self.at(TokenKind::Identifier) {
            let Some(kind) = JmlClauseKind::from_word(&self.current().text) else {
                break;
            };
            clauses.push(self.clause(kind)?);
        }
        if clauses.is_empty() && behavior == JmlBehavior::Lightweight {
            return Err(self.unexpected("'invariant' or a specification clause"));
        }
        let span = self.span(start);
        self.ast
            .build(NodeKind::JmlContract)
            .value(Property::Behavior, Value::Behavior(behavior))
            .list(Property::Clauses, clauses)
            .token_range(span)
            .finish()
    }

    /// Grammar: keyword expression {, expression} ;
    fn clause(&mut self, kind: JmlClauseKind) -> Result<NodeId> {
        let start = self.start()?;
        self.advance()?;
        let mut expressions = vec![self.expression()?];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.expression()?);
        }
        self.expect(TokenKind::Semicolon)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::JmlClause)
            .value(Property::ClauseKind, Value::Clause(kind))
            .list(Property::Expressions, expressions)
            .token_range(span)
            .finish()
    }

    fn jml_statement(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let kind = match self.current_kind() {
            TokenKind::AssertKw => Some(JmlStatementKind::Assert),
            TokenKind::Identifier => JmlStatementKind::from_word(&self.current().text),
            _ => None,
        };
        let Some(kind) = kind else {
            return Err(self.unexpected("'assert', 'assume' or 'loop_invariant'"));
        };
        self.advance()?;
        let expression = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::JmlStatement)
            .value(Property::StatementKind, Value::JmlStatement(kind))
            .child(Property::Expression, expression)
            .token_range(span)
            .finish()
    }

    /// `\old(e)` or a backslash keyword such as `\result`
    pub(super) fn jml_primary(&mut self, start: TokenId) -> Result<NodeId> {
        let keyword = self.current().text.clone();
        let token = self.advance()?;
        if keyword != "\\old" {
            return self
                .ast
                .build(NodeKind::JmlKeywordExpr)
                .value(Property::Keyword, keyword)
                .token_range(Some(TokenRange::single(token)))
                .finish();
        }
        self.expect(TokenKind::LParen)?;
        let expression = self.expression()?;
        self.expect(TokenKind::RParen)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::JmlOldExpr)
            .child(Property::Expression, expression)
            .token_range(span)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{JmlBehavior, NodeKind, Property, Value};
    use crate::config::ParserConfiguration;
    use crate::error::JmlxError;
    use crate::parser::parse;

    const SPECIFIED: &str = "class Counter {
    //@ invariant count >= 0;
    int count;

    /** Adds one. */
    //@ requires count < 100;
    //@ ensures count == \\old(count) + 1;
    void increment() {
        count++;
        //@ assert count > 0;
    }
}
";

    #[test]
    fn contracts_invariants_and_statements() {
        let parsed = parse(SPECIFIED, &ParserConfiguration::default()).unwrap();
        let ast = &parsed.ast;
        let class = ast.list(parsed.root, Property::Types)[0];
        let members = ast.list(class, Property::Members);
        assert_eq!(ast.kind(members[0]), NodeKind::JmlClassInvariant);

        let method = members[2];
        let contracts = ast.list(method, Property::Contracts);
        assert_eq!(contracts.len(), 1);
        assert_eq!(ast.list(contracts[0], Property::Clauses).len(), 2);
        assert_eq!(ast.find_all(method, NodeKind::JmlOldExpr).len(), 1);
        assert_eq!(ast.find_all(method, NodeKind::JmlStatement).len(), 1);

        // the javadoc sits above the contract but still documents the method
        let doc = ast.comment(method).unwrap();
        assert_eq!(ast.comment_content(doc), Some(" Adds one. "));
        assert!(ast.validate(parsed.root).is_ok());
        assert_eq!(ast.source_text(parsed.root).as_deref(), Some(SPECIFIED));
    }

    #[test]
    fn modeling_text_keeps_source_positions() {
        let parsed = parse(SPECIFIED, &ParserConfiguration::default()).unwrap();
        let ast = &parsed.ast;
        let invariant = ast.find_all(parsed.root, NodeKind::JmlClassInvariant)[0];
        let range = ast.range(invariant).unwrap();
        assert_eq!((range.begin.line, range.begin.column), (2, 9));
        assert_eq!(ast.source_text(invariant).as_deref(), Some("invariant count >= 0;"));
    }

    #[test]
    fn behaviors_and_chained_comparisons() {
        let source = "class A {\n  //@ normal_behavior\n  //@ requires 0 <= i < n;\n  //@ assignable \\nothing;\n  int get(int i) { return i; }\n}";
        let parsed = parse(source, &ParserConfiguration::default()).unwrap();
        let ast = &parsed.ast;
        let contract = ast.find_all(parsed.root, NodeKind::JmlContract)[0];
        assert_eq!(
            ast.value(contract, Property::Behavior),
            Some(&Value::Behavior(JmlBehavior::NormalBehavior))
        );
        assert_eq!(ast.find_all(contract, NodeKind::JmlMultiCompareExpr).len(), 1);
        assert_eq!(ast.find_all(contract, NodeKind::JmlKeywordExpr).len(), 1);
    }

    #[test]
    fn inactive_modeling_comments_stay_comments() {
        let source = "class A {\n  //+ESC@ invariant x > 0;\n  int x;\n}";
        let parsed = parse(source, &ParserConfiguration::default()).unwrap();
        assert!(parsed.ast.find_all(parsed.root, NodeKind::JmlClassInvariant).is_empty());
        assert_eq!(parsed.ast.find_all(parsed.root, NodeKind::LineComment).len(), 1);

        let config = ParserConfiguration {
            jml_keys: vec!["esc".to_string()],
            ..ParserConfiguration::default()
        };
        let parsed = parse(source, &config).unwrap();
        assert_eq!(parsed.ast.find_all(parsed.root, NodeKind::JmlClassInvariant).len(), 1);
    }

    #[test]
    fn processing_can_be_switched_off() {
        let config = ParserConfiguration {
            process_jml: false,
            ..ParserConfiguration::default()
        };
        let parsed = parse(SPECIFIED, &config).unwrap();
        assert!(parsed.ast.find_all(parsed.root, NodeKind::JmlContract).is_empty());
        assert_eq!(parsed.ast.find_all(parsed.root, NodeKind::LineComment).len(), 4);
    }

    #[test]
    fn contract_without_method_is_an_error() {
        let err = parse("class A {\n  //@ requires true;\n  int x;\n}", &ParserConfiguration::default())
            .unwrap_err();
        assert!(matches!(err, JmlxError::Parse { line: 2, column: 7, .. }), "{err:?}");
    }
}
