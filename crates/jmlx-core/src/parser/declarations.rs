//! Compilation units, type declarations and their members

use super::Parser;
use crate::ast::{ModifierKeyword, NodeId, NodeKind, Property, Value};
use crate::error::JmlxError;
use crate::position::Range;
use crate::result::Result;
use crate::token::{TokenId, TokenKind, TokenRange};

/// What was read before knowing which kind of member follows
struct MemberHead {
    start: TokenId,
    contracts: Vec<NodeId>,
    annotations: Vec<NodeId>,
    modifiers: Vec<NodeId>,
    type_parameters: Vec<NodeId>,
}

impl Parser<'_> {
    /// Grammar: [package] import* type*
    pub(super) fn compilation_unit(&mut self) -> Result<NodeId> {
        let start = self.ast.tokens().next_id();
        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();

        // Annotations before `package` belong to it, otherwise to the first type
        let head = self.start()?;
        let (annotations, modifiers) = self.modifiers()?;
        if self.at(TokenKind::PackageKw) && modifiers.is_empty() {
            package = Some(self.package_declaration(head, annotations)?);
        } else if !annotations.is_empty() || !modifiers.is_empty() {
            types.push(self.type_declaration(head, annotations, modifiers)?);
        }

        if types.is_empty() {
            while self.at(TokenKind::ImportKw) {
                imports.push(self.import_declaration()?);
            }
        }

        loop {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            if self.at_end() {
                break;
            }
            let head = self.start()?;
            let (annotations, modifiers) = self.modifiers()?;
            types.push(self.type_declaration(head, annotations, modifiers)?);
        }
        let eof = self.advance()?;

        self.ast
            .build(NodeKind::CompilationUnit)
            .opt_child(Property::PackageDeclaration, package)
            .list(Property::Imports, imports)
            .list(Property::Types, types)
            .token_range(Some(TokenRange::new(start, eof)))
            .finish()
    }

    fn package_declaration(&mut self, start: TokenId, annotations: Vec<NodeId>) -> Result<NodeId> {
        self.expect(TokenKind::PackageKw)?;
        let name = self.name()?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::PackageDeclaration)
            .list(Property::Annotations, annotations)
            .child(Property::Name, name)
            .token_range(span)
            .finish()
    }

    fn import_declaration(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        self.expect(TokenKind::ImportKw)?;
        let is_static = self.eat(TokenKind::StaticKw)?;
        let name = self.name()?;
        let is_asterisk = self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Star;
        if is_asterisk {
            self.advance()?;
            self.advance()?;
        }
        self.expect(TokenKind::Semicolon)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::ImportDeclaration)
            .value(Property::IsStatic, is_static)
            .child(Property::Name, name)
            .value(Property::IsAsterisk, is_asterisk)
            .token_range(span)
            .finish()
    }

    /// Dotted name; stops before `.*` and before a `.` not followed by an identifier
    pub(super) fn name(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let mut qualifier = None;
        loop {
            let (_, identifier) = self.expect_identifier()?;
            let span = self.span(start);
            let name = self
                .ast
                .build(NodeKind::Name)
                .opt_child(Property::Qualifier, qualifier)
                .value(Property::Identifier, identifier)
                .token_range(span)
                .finish()?;
            if self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Identifier {
                self.advance()?;
                qualifier = Some(name);
            } else {
                return Ok(name);
            }
        }
    }

    pub(super) fn simple_name(&mut self) -> Result<NodeId> {
        let (token, identifier) = self.expect_identifier()?;
        self.ast
            .build(NodeKind::SimpleName)
            .value(Property::Identifier, identifier)
            .token_range(Some(TokenRange::single(token)))
            .finish()
    }

    /// Annotations and modifier keywords, in any order
    pub(super) fn modifiers(&mut self) -> Result<(Vec<NodeId>, Vec<NodeId>)> {
        let mut annotations = Vec::new();
        let mut modifiers = Vec::new();
        loop {
            if self.at(TokenKind::At) && self.nth_kind(1) != TokenKind::InterfaceKw {
                annotations.push(self.annotation()?);
            } else if let Some(keyword) = ModifierKeyword::from_token(self.current_kind()) {
                let token = self.advance()?;
                let modifier = self
                    .ast
                    .build(NodeKind::Modifier)
                    .value(Property::Keyword, Value::Modifier(keyword))
                    .token_range(Some(TokenRange::single(token)))
                    .finish()?;
                modifiers.push(modifier);
            } else {
                return Ok((annotations, modifiers));
            }
        }
    }

    /// `@Name` or `@Name(value)`; `@Name()` reads as a marker annotation
    fn annotation(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        self.expect(TokenKind::At)?;
        let name = self.name()?;
        let mut value = None;
        if self.eat(TokenKind::LParen)? {
            if !self.at(TokenKind::RParen) {
                value = Some(self.expression()?);
            }
            self.expect(TokenKind::RParen)?;
        }
        let span = self.span(start);
        match value {
            Some(value) => self
                .ast
                .build(NodeKind::SingleMemberAnnotationExpr)
                .child(Property::Name, name)
                .child(Property::MemberValue, value)
                .token_range(span)
                .finish(),
            None => self
                .ast
                .build(NodeKind::MarkerAnnotationExpr)
                .child(Property::Name, name)
                .token_range(span)
                .finish(),
        }
    }

    /// Grammar: (class | interface) Name [<params>] [extends ..] [implements ..] { member* }
    fn type_declaration(
        &mut self,
        start: TokenId,
        annotations: Vec<NodeId>,
        modifiers: Vec<NodeId>,
    ) -> Result<NodeId> {
        let is_interface = match self.current_kind() {
            TokenKind::ClassKw => false,
            TokenKind::InterfaceKw => true,
            _ => return Err(self.unexpected("'class' or 'interface'")),
        };
        self.advance()?;
        let name = self.simple_name()?;
        let type_parameters = self.type_parameters()?;
        let extended = if self.eat(TokenKind::ExtendsKw)? {
            self.class_type_list()?
        } else {
            Vec::new()
        };
        let implemented = if self.eat(TokenKind::ImplementsKw)? {
            self.class_type_list()?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::LBrace)?;
        let members = self.class_body()?;
        self.expect(TokenKind::RBrace)?;

        let span = self.span(start);
        self.ast
            .build(NodeKind::ClassOrInterfaceDeclaration)
            .list(Property::Annotations, annotations)
            .list(Property::Modifiers, modifiers)
            .value(Property::IsInterface, is_interface)
            .child(Property::Name, name)
            .list(Property::TypeParameters, type_parameters)
            .list(Property::ExtendedTypes, extended)
            .list(Property::ImplementedTypes, implemented)
            .list(Property::Members, members)
            .token_range(span)
            .finish()
    }

    /// Members up to the closing brace, with the modeling comments between them
    fn class_body(&mut self) -> Result<Vec<NodeId>> {
        let mut members = Vec::new();
        let mut contracts = Vec::new();
        loop {
            let group = self.take_modeling()?;
            if !group.is_empty() {
                for item in self.class_modeling(group)? {
                    if self.ast.kind(item) == NodeKind::JmlContract {
                        contracts.push(item);
                    } else {
                        members.push(item);
                    }
                }
            }
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            members.push(self.member(std::mem::take(&mut contracts))?);
        }
        match contracts.first() {
            Some(&contract) => Err(self.dangling_contract(contract)),
            None => Ok(members),
        }
    }

    fn dangling_contract(&self, contract: NodeId) -> JmlxError {
        let message = "method specification is not followed by a method or constructor";
        match self.ast.range(contract) {
            Some(range) => JmlxError::parse_error(message, range.begin),
            None => self.error(message),
        }
    }

    fn member(&mut self, contracts: Vec<NodeId>) -> Result<NodeId> {
        let start = self.start()?;
        let (annotations, modifiers) = self.modifiers()?;
        if matches!(self.current_kind(), TokenKind::ClassKw | TokenKind::InterfaceKw) {
            if let Some(&contract) = contracts.first() {
                return Err(self.dangling_contract(contract));
            }
            return self.type_declaration(start, annotations, modifiers);
        }

        let head = MemberHead {
            start,
            contracts,
            annotations,
            modifiers,
            type_parameters: self.type_parameters()?,
        };
        if self.at(TokenKind::Identifier) && self.nth_kind(1) == TokenKind::LParen {
            return self.constructor(head);
        }
        let ty = self.result_type()?;
        if self.at(TokenKind::Identifier) && self.nth_kind(1) == TokenKind::LParen {
            return self.method(head, ty);
        }
        if let Some(&contract) = head.contracts.first() {
            return Err(self.dangling_contract(contract));
        }
        if !head.type_parameters.is_empty() || self.ast.kind(ty) == NodeKind::VoidType {
            return Err(self.unexpected("a method name"));
        }

        let variables = self.variable_declarators()?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::FieldDeclaration)
            .list(Property::Annotations, head.annotations)
            .list(Property::Modifiers, head.modifiers)
            .child(Property::ElementType, ty)
            .list(Property::Variables, variables)
            .token_range(span)
            .finish()
    }

    fn method(&mut self, head: MemberHead, ty: NodeId) -> Result<NodeId> {
        let name = self.simple_name()?;
        let parameters = self.parameters()?;
        let thrown = self.throws()?;
        let body = if self.eat(TokenKind::Semicolon)? {
            None
        } else {
            Some(self.block()?)
        };

        let span = self.span(head.start);
        let range = self.callable_range(span, &head.contracts);
        self.ast
            .build(NodeKind::MethodDeclaration)
            .list(Property::Contracts, head.contracts)
            .list(Property::Annotations, head.annotations)
            .list(Property::Modifiers, head.modifiers)
            .list(Property::TypeParameters, head.type_parameters)
            .child(Property::Type, ty)
            .child(Property::Name, name)
            .list(Property::Parameters, parameters)
            .list(Property::ThrownExceptions, thrown)
            .opt_child(Property::Body, body)
            .token_range(span)
            .range(range)
            .finish()
    }

    fn constructor(&mut self, head: MemberHead) -> Result<NodeId> {
        let name = self.simple_name()?;
        let parameters = self.parameters()?;
        let thrown = self.throws()?;
        let body = self.block()?;

        let span = self.span(head.start);
        let range = self.callable_range(span, &head.contracts);
        self.ast
            .build(NodeKind::ConstructorDeclaration)
            .list(Property::Contracts, head.contracts)
            .list(Property::Annotations, head.annotations)
            .list(Property::Modifiers, head.modifiers)
            .list(Property::TypeParameters, head.type_parameters)
            .child(Property::Name, name)
            .list(Property::Parameters, parameters)
            .list(Property::ThrownExceptions, thrown)
            .child(Property::Body, body)
            .token_range(span)
            .range(range)
            .finish()
    }

    /// Own range widened over the contracts written above the declaration
    fn callable_range(&self, span: Option<TokenRange>, contracts: &[NodeId]) -> Option<Range> {
        let own = span.and_then(|span| span.to_range(self.ast.tokens()));
        contracts
            .iter()
            .filter_map(|&contract| self.ast.range(contract))
            .fold(own, |acc, range| {
                Some(match acc {
                    Some(acc) => acc.union(&range),
                    None => range,
                })
            })
    }

    fn parameters(&mut self) -> Result<Vec<NodeId>> {
        self.expect(TokenKind::LParen)?;
        let mut parameters = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                parameters.push(self.parameter()?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(parameters)
    }

    fn parameter(&mut self) -> Result<NodeId> {
        let start = self.start()?;
        let (annotations, modifiers) = self.modifiers()?;
        let ty = self.parse_type()?;
        let is_var_args = self.eat(TokenKind::Ellipsis)?;
        let name = self.simple_name()?;
        let span = self.span(start);
        self.ast
            .build(NodeKind::Parameter)
            .list(Property::Annotations, annotations)
            .list(Property::Modifiers, modifiers)
            .child(Property::Type, ty)
            .value(Property::IsVarArgs, is_var_args)
            .child(Property::Name, name)
            .token_range(span)
            .finish()
    }

    fn throws(&mut self) -> Result<Vec<NodeId>> {
        if self.eat(TokenKind::ThrowsKw)? {
            self.class_type_list()
        } else {
            Ok(Vec::new())
        }
    }

    /// Grammar: name [= expression] {, name [= expression]}
    pub(super) fn variable_declarators(&mut self) -> Result<Vec<NodeId>> {
        let mut variables = Vec::new();
        loop {
            let start = self.start()?;
            let name = self.simple_name()?;
            let initializer = if self.eat(TokenKind::Assign)? {
                Some(self.expression()?)
            } else {
                None
            };
            let span = self.span(start);
            variables.push(
                self.ast
                    .build(NodeKind::VariableDeclarator)
                    .child(Property::Name, name)
                    .opt_child(Property::Initializer, initializer)
                    .token_range(span)
                    .finish()?,
            );
            if !self.eat(TokenKind::Comma)? {
                return Ok(variables);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{NodeKind, Property};
    use crate::config::ParserConfiguration;
    use crate::parser::parse;

    #[test]
    fn package_imports_and_types() {
        let parsed = parse(
            "@Deprecated package a.b;\nimport static java.util.Collections.*;\nimport java.util.List;\nclass A {}\ninterface B {}\n",
            &ParserConfiguration::default(),
        )
        .unwrap();
        let ast = &parsed.ast;
        let package = ast.child(parsed.root, Property::PackageDeclaration).unwrap();
        assert_eq!(ast.list(package, Property::Annotations).len(), 1);
        assert_eq!(ast.source_text(package).as_deref(), Some("@Deprecated package a.b;"));

        let imports = ast.list(parsed.root, Property::Imports);
        assert_eq!(imports.len(), 2);
        assert!(ast.flag(imports[0], Property::IsStatic));
        assert!(ast.flag(imports[0], Property::IsAsterisk));
        let name = ast.child(imports[1], Property::Name).unwrap();
        assert_eq!(ast.source_text(name).as_deref(), Some("java.util.List"));

        let types = ast.list(parsed.root, Property::Types);
        assert_eq!(types.len(), 2);
        assert!(ast.flag(types[1], Property::IsInterface));
    }

    #[test]
    fn members_of_every_shape() {
        let source = "public class A<T extends Comparable<T>> extends B implements C, D {\n\
            private int x = 1, y;\n\
            A(int x) { this.x = x; }\n\
            public <U> U map(final U... values) throws E;\n\
            class Inner {}\n\
        }";
        let parsed = parse(source, &ParserConfiguration::default()).unwrap();
        let ast = &parsed.ast;
        let class = ast.list(parsed.root, Property::Types)[0];
        assert_eq!(ast.name_of(class), Some("A"));
        assert_eq!(ast.list(class, Property::ImplementedTypes).len(), 2);
        let kinds: Vec<NodeKind> = ast
            .list(class, Property::Members)
            .iter()
            .map(|&m| ast.kind(m))
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::FieldDeclaration,
                NodeKind::ConstructorDeclaration,
                NodeKind::MethodDeclaration,
                NodeKind::ClassOrInterfaceDeclaration,
            ]
        );
        let method = ast.list(class, Property::Members)[2];
        assert!(ast.child(method, Property::Body).is_none());
        let parameter = ast.list(method, Property::Parameters)[0];
        assert!(ast.flag(parameter, Property::IsVarArgs));
        assert_eq!(ast.list(parameter, Property::Modifiers).len(), 1);
    }

    #[test]
    fn void_fields_are_rejected() {
        assert!(parse("class A { void x; }", &ParserConfiguration::default()).is_err());
    }
}
