//! Expressions by precedence climbing

use super::Parser;
use crate::ast::{AssignOperator, BinaryOperator, NodeId, NodeKind, Property, UnaryOperator, Value};
use crate::result::Result;
use crate::token::{TokenId, TokenKind, TokenRange};

impl Parser<'_> {
    /// Grammar: conditional [assign-op expression]
    pub(super) fn expression(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let target = self.conditional(start)?;
        let Some(operator) = AssignOperator::from_token(self.current_kind()) else {
            return Ok(target);
        };
        self.advance()?;
        let value = self.expression()?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::AssignExpr)
            .child(Property::Target, target)
            .value(Property::Operator, Value::Assign(operator))
            .child(Property::Value, value)
            .token_range(span)
            .finish()
    }

    fn conditional(&mut self, start: TokenId) -> Result<NodeId> {
        let condition = self.binary(start, 1)?;
        if !self.eat(TokenKind::Question)? {
            return Ok(condition);
        }
        let then_expr = self.expression()?;
        self.expect(TokenKind::Colon)?;
        let else_start = self.start()?;
        let else_expr = self.conditional(else_start)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::ConditionalExpr)
            .child(Property::Condition, condition)
            .child(Property::ThenExpr, then_expr)
            .child(Property::ElseExpr, else_expr)
            .token_range(span)
            .finish()
    }

    fn binary_operator(&self) -> Option<BinaryOperator> {
        let operator = BinaryOperator::from_token(self.current_kind())?;
        match operator {
            BinaryOperator::Implication | BinaryOperator::Equivalence if !self.in_jml => None,
            operator => Some(operator),
        }
    }

    /// Operators binding at least as tight as `min_precedence`
    fn binary(&mut self, start: TokenId, min_precedence: u8) -> Result<NodeId> {
        let mut left = self.unary()?;
        while let Some(operator) = self.binary_operator() {
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            if self.in_jml && operator.is_relational() {
                left = self.comparison_chain(start, left)?;
                continue;
            }
            self.advance()?;
            // `==>` groups to the right
            let next = if operator == BinaryOperator::Implication {
                precedence
            } else {
                precedence + 1
            };
            let right_start = self.start()?;
            let right = self.binary(right_start, next)?;
            let span = self.span(start);
            left = self
                .ast
                .build(NodeKind::BinaryExpr)
                .child(Property::Left, left)
                .value(Property::Operator, Value::Binary(operator))
                .child(Property::Right, right)
                .token_range(span)
                .finish()?;
        }
        Ok(left)
    }

    /// `a < b <= c` in modeling code; a single comparison stays binary
    fn comparison_chain(&mut self, start: TokenId, first: NodeId) -> Result<NodeId> {
        let mut operands = vec![first];
        let mut operators = Vec::new();
        while let Some(operator) = self.binary_operator().filter(|o| o.is_relational()) {
            self.advance()?;
            let right_start = self.start()?;
            operands.push(self.binary(right_start, operator.precedence() + 1)?);
            operators.push(operator);
        }
        let span = self.span(start);
        if let ([left, right], [operator]) = (operands.as_slice(), operators.as_slice()) {
            return self
                .ast
                .build(NodeKind::BinaryExpr)
                .child(Property::Left, *left)
                .value(Property::Operator, Value::Binary(*operator))
                .child(Property::Right, *right)
                .token_range(span)
                .finish();
        }
        tracing::debug!(operators = operators.len(), "chained comparison");
        self.ast
            .build(NodeKind::JmlMultiCompareExpr)
            .list(Property::Expressions, operands)
            .value(Property::Operators, Value::Operators(operators))
            .token_range(span)
            .finish()
    }

    fn unary(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        if let Some(operator) = UnaryOperator::prefix_from_token(self.current_kind()) {
            self.advance()?;
            let operand = self.unary()?;
            return self.unary_node(start, operator, operand);
        }
        let mut expression = self.primary()?;
        loop {
            let operator = match self.current_kind() {
                TokenKind::PlusPlus => UnaryOperator::PostfixIncrement,
                TokenKind::MinusMinus => UnaryOperator::PostfixDecrement,
                _ => return Ok(expression),
            };
            self.advance()?;
            expression = self.unary_node(start, operator, expression)?;
        }
    }

    fn unary_node(&mut self, start: TokenId, operator: UnaryOperator, operand: NodeId) -> Result<NodeId> {
        let span = self.span(start);
        self.ast
            .build(NodeKind::UnaryExpr)
            .value(Property::Operator, Value::Unary(operator))
            .child(Property::Expression, operand)
            .token_range(span)
            .finish()
    }

    /// A primary followed by field accesses and method calls
    fn primary(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let mut expression = match self.current_kind() {
            TokenKind::IntegerLiteral => self.literal(NodeKind::IntegerLiteralExpr, false)?,
            TokenKind::LongLiteral => self.literal(NodeKind::LongLiteralExpr, false)?,
            TokenKind::FloatingLiteral => self.literal(NodeKind::DoubleLiteralExpr, false)?,
            TokenKind::CharLiteral => self.literal(NodeKind::CharLiteralExpr, true)?,
            TokenKind::StringLiteral => self.literal(NodeKind::StringLiteralExpr, true)?,
            TokenKind::TrueKw | TokenKind::FalseKw => {
                let value = self.at(TokenKind::TrueKw);
                let token = self.advance()?;
                self.ast
                    .build(NodeKind::BooleanLiteralExpr)
                    .value(Property::BooleanValue, value)
                    .token_range(Some(TokenRange::single(token)))
                    .finish()?
            }
            TokenKind::NullKw => self.keyword_node(NodeKind::NullLiteralExpr)?,
            TokenKind::ThisKw => self.keyword_node(NodeKind::ThisExpr)?,
            TokenKind::NewKw => {
                self.advance()?;
                let ty = self.class_type()?;
                let arguments = self.arguments()?;
                let span = self.span(start);
                self.ast
                    .build(NodeKind::ObjectCreationExpr)
                    .child(Property::Type, ty)
                    .list(Property::Arguments, arguments)
                    .token_range(span)
                    .finish()?
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.expression()?;
                self.expect(TokenKind::RParen)?;
                let span = self.span(start);
                self.ast
                    .build(NodeKind::EnclosedExpr)
                    .child(Property::Inner, inner)
                    .token_range(span)
                    .finish()?
            }
            TokenKind::Identifier => {
                let name = self.simple_name()?;
                self.name_or_call(start, None, name)?
            }
            TokenKind::JmlKeyword if self.in_jml => self.jml_primary(start)?,
            _ => return Err(self.unexpected("an expression")),
        };

        while self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Identifier {
            self.advance()?;
            let name = self.simple_name()?;
            expression = self.name_or_call(start, Some(expression), name)?;
        }
        Ok(expression)
    }

    /// `name`, `scope.name`, or either followed by call arguments
    fn name_or_call(&mut self, start: TokenId, scope: Option<NodeId>, name: NodeId) -> Result<NodeId> {
        if self.at(TokenKind::LParen) {
            let arguments = self.arguments()?;
            let span = self.span(start);
            return self
                .ast
                .build(NodeKind::MethodCallExpr)
                .opt_child(Property::Scope, scope)
                .child(Property::Name, name)
                .list(Property::Arguments, arguments)
                .token_range(span)
                .finish();
        }
        let span = self.span(start);
        match scope {
            Some(scope) => self
                .ast
                .build(NodeKind::FieldAccessExpr)
                .child(Property::Scope, scope)
                .child(Property::Name, name)
                .token_range(span)
                .finish(),
            None => self
                .ast
                .build(NodeKind::NameExpr)
                .child(Property::Name, name)
                .token_range(span)
                .finish(),
        }
    }

    pub(super) fn arguments(&mut self) -> Result<Vec<NodeId>> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                arguments.push(self.expression()?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(arguments)
    }

    /// Literal text; quoted literals store what is between the quotes
    fn literal(&mut self, kind: NodeKind, quoted: bool) -> Result<NodeId> {
        let text = self.current().text.clone();
        let text = if quoted {
            text.get(1..text.len().saturating_sub(1))
                .unwrap_or_default()
                .to_string()
        } else {
            text
        };
        let token = self.advance()?;
        self.ast
            .build(kind)
            .value(Property::Literal, text)
            .token_range(Some(TokenRange::single(token)))
            .finish()
    }

    fn keyword_node(&mut self, kind: NodeKind) -> Result<NodeId> {
        let token = self.advance()?;
        self.ast
            .build(kind)
            .token_range(Some(TokenRange::single(token)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, BinaryOperator, NodeId, NodeKind, Property, Value};
    use crate::config::ParserConfiguration;
    use crate::parser::parse;

    fn initializer(expression: &str) -> (Ast, NodeId) {
        let parsed = parse(
            &format!("class A {{ Object x = {expression}; }}"),
            &ParserConfiguration::default(),
        )
        .unwrap();
        let declarator = parsed.ast.find_all(parsed.root, NodeKind::VariableDeclarator)[0];
        let value = parsed.ast.child(declarator, Property::Initializer).unwrap();
        (parsed.ast, value)
    }

    fn operator(ast: &Ast, node: NodeId) -> Option<BinaryOperator> {
        match ast.value(node, Property::Operator) {
            Some(Value::Binary(op)) => Some(*op),
            _ => None,
        }
    }

    #[test]
    fn precedence_and_associativity() {
        let (ast, sum) = initializer("a + b * c - d");
        assert_eq!(operator(&ast, sum), Some(BinaryOperator::Minus));
        let left = ast.child(sum, Property::Left).unwrap();
        assert_eq!(operator(&ast, left), Some(BinaryOperator::Plus));
        let product = ast.child(left, Property::Right).unwrap();
        assert_eq!(ast.source_text(product).as_deref(), Some("b * c"));
    }

    #[test]
    fn conditional_assignment_and_unary() {
        let (ast, assign) = initializer("y = !done ? -1 : i++");
        assert_eq!(ast.kind(assign), NodeKind::AssignExpr);
        let conditional = ast.child(assign, Property::Value).unwrap();
        assert_eq!(ast.kind(conditional), NodeKind::ConditionalExpr);
        assert_eq!(ast.find_all(conditional, NodeKind::UnaryExpr).len(), 3);
    }

    #[test]
    fn selectors_and_literals() {
        let (ast, call) = initializer("new Foo(\"s\", 'c', 1L, 2.5).bar.baz(this, null, true)");
        assert_eq!(ast.kind(call), NodeKind::MethodCallExpr);
        let scope = ast.child(call, Property::Scope).unwrap();
        assert_eq!(ast.kind(scope), NodeKind::FieldAccessExpr);
        let string = ast.find_all(call, NodeKind::StringLiteralExpr)[0];
        assert_eq!(ast.text(string, Property::Literal), Some("s"));
        let char_literal = ast.find_all(call, NodeKind::CharLiteralExpr)[0];
        assert_eq!(ast.text(char_literal, Property::Literal), Some("c"));
        assert_eq!(ast.find_all(call, NodeKind::LongLiteralExpr).len(), 1);
        assert_eq!(ast.find_all(call, NodeKind::DoubleLiteralExpr).len(), 1);
    }

    #[test]
    fn java_has_no_implication() {
        assert!(parse("class A { boolean b = p ==> q; }", &ParserConfiguration::default()).is_err());
    }
}
