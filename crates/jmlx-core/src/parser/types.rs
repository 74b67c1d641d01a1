//! Types, type arguments and type parameters

use super::Parser;
use crate::ast::{NodeId, NodeKind, PrimitiveKind, Property, Value};
use crate::result::Result;
use crate::token::{AngleSplit, TokenKind, TokenRange};

impl Parser<'_> {
    /// A type or `void`
    pub(super) fn result_type(&mut self) -> Result<NodeId> {
        if self.at(TokenKind::VoidKw) {
            let token = self.advance()?;
            return self
                .ast
                .build(NodeKind::VoidType)
                .token_range(Some(TokenRange::single(token)))
                .finish();
        }
        self.parse_type()
    }

    /// Grammar: (primitive | class type) {[]}
    pub(super) fn parse_type(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let mut ty = if let Some(primitive) = PrimitiveKind::from_token(self.current_kind()) {
            let token = self.advance()?;
            self.ast
                .build(NodeKind::PrimitiveType)
                .value(Property::Primitive, Value::Primitive(primitive))
                .token_range(Some(TokenRange::single(token)))
                .finish()?
        } else if self.at(TokenKind::Identifier) {
            self.class_type()?
        } else {
            return Err(self.unexpected("a type"));
        };

        while self.at(TokenKind::LBracket) && self.nth_kind(1) == TokenKind::RBracket {
            self.advance()?;
            self.advance()?;
            let span = self.span(start);
            ty = self
                .ast
                .build(NodeKind::ArrayType)
                .child(Property::ComponentType, ty)
                .token_range(span)
                .finish()?;
        }
        Ok(ty)
    }

    /// Grammar: Name [<args>] {. Name [<args>]}
    pub(super) fn class_type(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let mut scope = None;
        loop {
            let name = self.simple_name()?;
            let (arguments, is_diamond) = self.type_arguments()?;
            let span = self.span(start);
            let ty = self
                .ast
                .build(NodeKind::ClassOrInterfaceType)
                .opt_child(Property::Scope, scope)
                .child(Property::Name, name)
                .list(Property::TypeArguments, arguments)
                .value(Property::IsDiamond, is_diamond)
                .token_range(span)
                .finish()?;
            if self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Identifier {
                self.advance()?;
                scope = Some(ty);
            } else {
                return Ok(ty);
            }
        }
    }

    pub(super) fn class_type_list(&mut self) -> Result<Vec<NodeId>> {
        let mut types = vec![self.class_type()?];
        while self.eat(TokenKind::Comma)? {
            types.push(self.class_type()?);
        }
        Ok(types)
    }

    /// `<A, B>` or the diamond `<>`, which yields no arguments and `true`
    fn type_arguments(&mut self) -> Result<(Vec<NodeId>, bool)> {
        if !self.at(TokenKind::Lt) {
            return Ok((Vec::new(), false));
        }
        self.advance()?;
        if self.eat(TokenKind::Gt)? {
            return Ok((Vec::new(), true));
        }
        let mut arguments = vec![self.type_argument()?];
        while self.eat(TokenKind::Comma)? {
            arguments.push(self.type_argument()?);
        }
        self.close_angle()?;
        Ok((arguments, false))
    }

    fn type_argument(&mut self) -> Result<NodeId> {
        if !self.at(TokenKind::Question) {
            return self.parse_type();
        }
        let start = self.start()?;
        self.advance()?;
        let mut extended = None;
        let mut super_type = None;
        if self.eat(TokenKind::ExtendsKw)? {
            extended = Some(self.parse_type()?);
        } else if self.eat(TokenKind::SuperKw)? {
            super_type = Some(self.parse_type()?);
        }
        let span = self.span(start);
        self.ast
            .build(NodeKind::WildcardType)
            .opt_child(Property::ExtendedType, extended)
            .opt_child(Property::SuperType, super_type)
            .token_range(span)
            .finish()
    }

    /// Grammar: <Name [extends Type {& Type}], ...>
    pub(super) fn type_parameters(&mut self) -> Result<Vec<NodeId>> {
        if !self.at(TokenKind::Lt) {
            return Ok(Vec::new());
        }
        self.advance()?;
        let mut parameters = Vec::new();
        loop {
            let start = self.start()?;
            let name = self.simple_name()?;
            let mut bounds = Vec::new();
            if self.eat(TokenKind::ExtendsKw)? {
                bounds.push(self.class_type()?);
                while self.eat(TokenKind::Amp)? {
                    bounds.push(self.class_type()?);
                }
            }
            let span = self.span(start);
            parameters.push(
                self.ast
                    .build(NodeKind::TypeParameter)
                    .child(Property::Name, name)
                    .list(Property::TypeBound, bounds)
                    .token_range(span)
                    .finish()?,
            );
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.close_angle()?;
        Ok(parameters)
    }

    /// Consume one `>`, splitting a longer right-angle match
    fn close_angle(&mut self) -> Result<()> {
        let kind = self.current_kind();
        if kind == TokenKind::Gt {
            self.advance()?;
        } else if kind.is_ambiguous_right_angle() {
            tracing::debug!(?kind, "closing type arguments inside a longer right-angle match");
            self.advance_split(AngleSplit::Single)?;
        } else {
            return Err(self.unexpected("'>'"));
        }
        Ok(())
    }

    /// Whether a local variable declaration starts here
    ///
    /// Looks ahead for `Type Identifier` without consuming anything.
    pub(super) fn at_local_declaration(&self) -> bool {
        let kind = self.current_kind();
        if matches!(kind, TokenKind::FinalKw | TokenKind::At) || PrimitiveKind::from_token(kind).is_some() {
            return true;
        }
        match self.scan_class_type(0) {
            Some(after) => self.nth_kind(after) == TokenKind::Identifier,
            None => false,
        }
    }

    /// Lookahead index just past a class type (with array brackets) at `n`
    fn scan_class_type(&self, mut n: usize) -> Option<usize> {
        loop {
            if self.nth_kind(n) != TokenKind::Identifier {
                return None;
            }
            n += 1;
            if self.nth_kind(n) == TokenKind::Lt {
                n = self.scan_angles(n)?;
            }
            if self.nth_kind(n) == TokenKind::Dot {
                n += 1;
            } else {
                break;
            }
        }
        while self.nth_kind(n) == TokenKind::LBracket && self.nth_kind(n + 1) == TokenKind::RBracket {
            n += 2;
        }
        Some(n)
    }

    /// Lookahead index just past balanced angle brackets opening at `n`
    fn scan_angles(&self, mut n: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            let kind = self.nth_kind(n);
            n += 1;
            match kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt | TokenKind::Shr | TokenKind::UShr => {
                    depth = depth.checked_sub(kind.right_angle_width())?;
                    if depth == 0 {
                        return Some(n);
                    }
                }
                TokenKind::Identifier
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::ExtendsKw
                | TokenKind::SuperKw
                | TokenKind::Amp
                | TokenKind::LBracket
                | TokenKind::RBracket => {}
                other if PrimitiveKind::from_token(other).is_some() => {}
                _ => return None,
            }
        }
    }
}
