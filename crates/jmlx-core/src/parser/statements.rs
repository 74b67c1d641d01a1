//! Blocks and statements

use super::Parser;
use crate::ast::{NodeId, NodeKind, Property};
use crate::result::Result;
use crate::token::{TokenKind, TokenRange};

impl Parser<'_> {
    /// Statements up to the closing brace, modeling statements included
    pub(super) fn block(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        loop {
            let group = self.take_modeling()?;
            if !group.is_empty() {
                statements.extend(self.block_modeling(group)?);
            }
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }
            statements.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::BlockStmt)
            .list(Property::Statements, statements)
            .token_range(span)
            .finish()
    }

    fn statement(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        match self.current_kind() {
            TokenKind::LBrace => self.block(),
            TokenKind::IfKw => {
                self.advance()?;
                let condition = self.parenthesized()?;
                let then_stmt = self.statement()?;
                let else_stmt = if self.eat(TokenKind::ElseKw)? {
                    Some(self.statement()?)
                } else {
                    None
                };
                let span = self.span(start);
                self.ast
                    .build(NodeKind::IfStmt)
                    .child(Property::Condition, condition)
                    .child(Property::ThenStmt, then_stmt)
                    .opt_child(Property::ElseStmt, else_stmt)
                    .token_range(span)
                    .finish()
            }
            TokenKind::WhileKw => {
                self.advance()?;
                let condition = self.parenthesized()?;
                let body = self.statement()?;
                let span = self.span(start);
                self.ast
                    .build(NodeKind::WhileStmt)
                    .child(Property::Condition, condition)
                    .child(Property::Body, body)
                    .token_range(span)
                    .finish()
            }
            TokenKind::ReturnKw => {
                self.advance()?;
                let expression = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect(TokenKind::Semicolon)?;
                let span = self.span(start);
                self.ast
                    .build(NodeKind::ReturnStmt)
                    .opt_child(Property::Expression, expression)
                    .token_range(span)
                    .finish()
            }
            TokenKind::ThrowKw => {
                self.advance()?;
                let expression = self.expression()?;
                self.expect(TokenKind::Semicolon)?;
                let span = self.span(start);
                self.ast
                    .build(NodeKind::ThrowStmt)
                    .child(Property::Expression, expression)
                    .token_range(span)
                    .finish()
            }
            TokenKind::Semicolon => {
                let token = self.advance()?;
                self.ast
                    .build(NodeKind::EmptyStmt)
                    .token_range(Some(TokenRange::single(token)))
                    .finish()
            }
            _ => {
                let expression = if self.at_local_declaration() {
                    self.local_declaration()?
                } else {
                    self.expression()?
                };
                self.expect(TokenKind::Semicolon)?;
                let span = self.span(start);
                self.ast
                    .build(NodeKind::ExpressionStmt)
                    .child(Property::Expression, expression)
                    .token_range(span)
                    .finish()
            }
        }
    }

    fn parenthesized(&mut self) -> Result<NodeId> {
        self.expect(TokenKind::LParen)?;
        let expression = self.expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(expression)
    }

    fn local_declaration(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let (annotations, modifiers) = self.modifiers()?;
        let ty = self.parse_type()?;
        let variables = self.variable_declarators()?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::VariableDeclarationExpr)
            .list(Property::Annotations, annotations)
            .list(Property::Modifiers, modifiers)
            .child(Property::ElementType, ty)
            .list(Property::Variables, variables)
            .token_range(span)
            .finish()
    }
}
