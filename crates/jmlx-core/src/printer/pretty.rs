//! Java and JML source printer

use super::interleave::{comments_before, comments_ending};
use super::source::SourcePrinter;
use crate::ast::visitor::{Visitor, accept};
use crate::ast::{Ast, JmlBehavior, NodeId, NodeKind, Property, Value};
use crate::config::PrinterConfiguration;
use crate::error::JmlxError;
use crate::result::Result;
use crate::token::TokenRange;
use std::collections::HashSet;

/// Prints a tree as Java source
///
/// Each node first prints the comments of its parent that precede it,
/// then its attached comment, then itself. In preserving mode, parsed
/// nodes whose subtree was not edited are copied from their tokens.
#[derive(Debug)]
pub struct PrettyPrinter {
    config: PrinterConfiguration,
    out: SourcePrinter,
    touched: Option<HashSet<NodeId>>,
    /// Touched nodes and their ancestors, computed when printing starts
    dirty: HashSet<NodeId>,
    /// Depth inside modeling constructs, which never print verbatim
    jml_depth: usize,
}

impl PrettyPrinter {
    pub fn new(config: &PrinterConfiguration) -> Self {
        Self {
            config: config.clone(),
            out: SourcePrinter::new(config),
            touched: None,
            dirty: HashSet::new(),
            jml_depth: 0,
        }
    }

    /// Reuse the original text of every subtree without a touched node
    ///
    /// `touched` is usually [`ChangeTracker::touched`](crate::ast::ChangeTracker::touched).
    pub fn preserving(config: &PrinterConfiguration, touched: &HashSet<NodeId>) -> Self {
        Self {
            touched: Some(touched.clone()),
            ..Self::new(config)
        }
    }

    pub fn print(mut self, ast: &Ast, root: NodeId) -> Result<String> {
        if let Some(touched) = &self.touched {
            self.dirty = touched
                .iter()
                .flat_map(|&id| std::iter::once(id).chain(ast.ancestors(id)))
                .collect();
        }
        self.node(ast, root)?;
        Ok(self.out.finish())
    }

    fn print_comments(&self) -> bool {
        self.config.print_comments
    }

    /// Print a node with the comments that go in front of it
    fn node(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        if self.print_comments() && self.config.position_interleaving {
            for comment in comments_before(ast, id)? {
                accept(self, ast, comment)?;
            }
        }

        if let Some(text) = self.verbatim(ast, id) {
            if let Some(comment) = ast.comment(id) {
                let inside = match (ast.token_range(comment), ast.token_range(id)) {
                    (Some(c), Some(n)) => covers(n, c),
                    _ => false,
                };
                if !inside {
                    self.attached_comment(ast, id)?;
                }
            }
            if matches!(ast.kind(id), NodeKind::MethodDeclaration | NodeKind::ConstructorDeclaration) {
                for &contract in ast.list(id, Property::Contracts) {
                    self.node(ast, contract)?;
                }
            }
            tracing::trace!(node = %id, "printing untouched node verbatim");
            self.out.print(&text);
            return Ok(());
        }

        self.attached_comment(ast, id)?;
        accept(self, ast, id)?;
        if !owns_ending_comments(ast.kind(id)) {
            self.ending_comments(ast, id)?;
        }
        Ok(())
    }

    fn attached_comment(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        match ast.comment(id) {
            Some(comment) if self.print_comments() => accept(self, ast, comment),
            _ => Ok(()),
        }
    }

    /// Comments printed before a node closes
    fn ending_comments(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        if !self.print_comments() {
            return Ok(());
        }
        let comments = if self.config.position_interleaving {
            comments_ending(ast, id)
        } else {
            ast.orphan_comments(id).to_vec()
        };
        for comment in comments {
            accept(self, ast, comment)?;
        }
        Ok(())
    }

    /// Original text of a parsed, untouched subtree
    fn verbatim(&self, ast: &Ast, id: NodeId) -> Option<String> {
        if self.touched.is_none() || self.jml_depth > 0 || ast.kind(id).is_comment() {
            return None;
        }
        if is_modeling_construct(ast.kind(id)) || ends_with_separator(ast.kind(id)) {
            return None;
        }
        // dirty holds every ancestor of a touched node
        if self.dirty.contains(&id) {
            return None;
        }
        ast.source_text(id)
    }

    fn opt(&mut self, ast: &Ast, id: Option<NodeId>) -> Result<()> {
        match id {
            Some(id) => self.node(ast, id),
            None => Ok(()),
        }
    }

    fn required(&mut self, ast: &Ast, id: NodeId, property: Property) -> Result<()> {
        let child = ast.child(id, property).ok_or_else(|| {
            JmlxError::print_error(format!("{} {id} has no {property:?}", ast.kind(id)))
        })?;
        self.node(ast, child)
    }

    fn join(&mut self, ast: &Ast, ids: &[NodeId], separator: &str) -> Result<()> {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                self.out.print(separator);
            }
            self.node(ast, id)?;
        }
        Ok(())
    }

    fn modifiers(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        for &modifier in ast.list(id, Property::Modifiers) {
            self.node(ast, modifier)?;
        }
        Ok(())
    }

    /// Annotations of declarations, one per line
    fn member_annotations(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        for &annotation in ast.list(id, Property::Annotations) {
            self.node(ast, annotation)?;
            self.out.newline();
        }
        Ok(())
    }

    fn inline_annotations(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        for &annotation in ast.list(id, Property::Annotations) {
            self.node(ast, annotation)?;
            self.out.print(" ");
        }
        Ok(())
    }

    fn type_parameters(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        let params = ast.list(id, Property::TypeParameters);
        if !params.is_empty() {
            self.out.print("<");
            self.join(ast, params, ", ")?;
            self.out.print(">");
        }
        Ok(())
    }

    fn arguments(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        self.out.print("(");
        self.join(ast, ast.list(id, Property::Arguments), ", ")?;
        self.out.print(")");
        Ok(())
    }

    fn members(&mut self, ast: &Ast, members: &[NodeId]) -> Result<()> {
        for &member in members {
            self.out.newline();
            self.node(ast, member)?;
            self.out.newline();
        }
        Ok(())
    }

    fn callable(&mut self, ast: &Ast, id: NodeId, with_type: bool) -> Result<()> {
        for &contract in ast.list(id, Property::Contracts) {
            self.node(ast, contract)?;
        }
        self.member_annotations(ast, id)?;
        self.modifiers(ast, id)?;
        self.type_parameters(ast, id)?;
        if !ast.list(id, Property::TypeParameters).is_empty() {
            self.out.print(" ");
        }
        if with_type {
            self.required(ast, id, Property::Type)?;
            self.out.print(" ");
        }
        self.required(ast, id, Property::Name)?;
        self.out.print("(");
        self.join(ast, ast.list(id, Property::Parameters), ", ")?;
        self.out.print(")");
        let thrown = ast.list(id, Property::ThrownExceptions);
        if !thrown.is_empty() {
            self.out.print(" throws ");
            self.join(ast, thrown, ", ")?;
        }
        match ast.child(id, Property::Body) {
            Some(body) => {
                self.out.print(" ");
                self.node(ast, body)
            }
            None => {
                self.out.print(";");
                Ok(())
            }
        }
    }

    /// One `//@` line around whatever `body` prints
    fn modeling_line(&mut self, ast: &Ast, id: NodeId, keyword: &str, property: Property) -> Result<()> {
        self.jml_depth += 1;
        self.out.print("//@ ").print(keyword).print(" ");
        let result = self.required(ast, id, property);
        self.out.print(";");
        self.jml_depth -= 1;
        result
    }

    fn value<'a>(&self, ast: &'a Ast, id: NodeId, property: Property) -> Result<&'a Value> {
        ast.value(id, property).ok_or_else(|| {
            JmlxError::print_error(format!("{} {id} has no {property:?}", ast.kind(id)))
        })
    }
}

/// Whether `outer` spans `inner`; parsed tokens are allocated in chain order
fn covers(outer: TokenRange, inner: TokenRange) -> bool {
    outer.begin() <= inner.begin() && inner.end() <= outer.end()
}

/// Kinds that print their own trailing comments inside their braces
fn owns_ending_comments(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::CompilationUnit | NodeKind::ClassOrInterfaceDeclaration | NodeKind::BlockStmt
    )
}

/// Kinds whose printed form includes the separator that follows them
fn ends_with_separator(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::PackageDeclaration | NodeKind::ImportDeclaration | NodeKind::Modifier
    )
}

fn is_modeling_construct(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::JmlContract | NodeKind::JmlClause | NodeKind::JmlClassInvariant | NodeKind::JmlStatement
    )
}

fn normalize_line_breaks(text: &str, end_of_line: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', end_of_line)
}

impl Visitor for PrettyPrinter {
    type Output = Result<()>;

    fn visit_default(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        Err(JmlxError::print_error(format!("cannot print {}", ast.kind(node))))
    }

    fn visit_compilation_unit(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.opt(ast, ast.child(node, Property::PackageDeclaration))?;
        let imports = ast.list(node, Property::Imports);
        for &import in imports {
            self.node(ast, import)?;
        }
        if !imports.is_empty() {
            self.out.newline();
        }
        let types = ast.list(node, Property::Types);
        for (i, &ty) in types.iter().enumerate() {
            self.node(ast, ty)?;
            self.out.newline();
            if i + 1 < types.len() {
                self.out.newline();
            }
        }
        self.ending_comments(ast, node)
    }

    fn visit_package_declaration(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.member_annotations(ast, node)?;
        self.out.print("package ");
        self.required(ast, node, Property::Name)?;
        self.out.println(";").newline();
        Ok(())
    }

    fn visit_import_declaration(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("import ");
        if ast.flag(node, Property::IsStatic) {
            self.out.print("static ");
        }
        self.required(ast, node, Property::Name)?;
        if ast.flag(node, Property::IsAsterisk) {
            self.out.print(".*");
        }
        self.out.println(";");
        Ok(())
    }

    fn visit_name(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if let Some(qualifier) = ast.child(node, Property::Qualifier) {
            self.node(ast, qualifier)?;
            self.out.print(".");
        }
        self.out.print(ast.text(node, Property::Identifier).unwrap_or_default());
        Ok(())
    }

    fn visit_simple_name(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print(ast.text(node, Property::Identifier).unwrap_or_default());
        Ok(())
    }

    fn visit_modifier(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if let Value::Modifier(keyword) = self.value(ast, node, Property::Keyword)? {
            self.out.print(keyword.as_str()).print(" ");
        }
        Ok(())
    }

    fn visit_class_or_interface_declaration(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.member_annotations(ast, node)?;
        self.modifiers(ast, node)?;
        self.out.print(if ast.flag(node, Property::IsInterface) {
            "interface "
        } else {
            "class "
        });
        self.required(ast, node, Property::Name)?;
        self.type_parameters(ast, node)?;
        let extended = ast.list(node, Property::ExtendedTypes);
        if !extended.is_empty() {
            self.out.print(" extends ");
            self.join(ast, extended, ", ")?;
        }
        let implemented = ast.list(node, Property::ImplementedTypes);
        if !implemented.is_empty() {
            self.out.print(" implements ");
            self.join(ast, implemented, ", ")?;
        }
        self.out.println(" {").indent();
        self.members(ast, ast.list(node, Property::Members))?;
        self.ending_comments(ast, node)?;
        self.out.unindent().print("}");
        Ok(())
    }

    fn visit_field_declaration(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.member_annotations(ast, node)?;
        self.modifiers(ast, node)?;
        self.required(ast, node, Property::ElementType)?;
        self.out.print(" ");
        self.join(ast, ast.list(node, Property::Variables), ", ")?;
        self.out.print(";");
        Ok(())
    }

    fn visit_method_declaration(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.callable(ast, node, true)
    }

    fn visit_constructor_declaration(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.callable(ast, node, false)
    }

    fn visit_jml_class_invariant(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.modeling_line(ast, node, "invariant", Property::Expression)
    }

    fn visit_parameter(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.inline_annotations(ast, node)?;
        self.modifiers(ast, node)?;
        self.required(ast, node, Property::Type)?;
        if ast.flag(node, Property::IsVarArgs) {
            self.out.print("...");
        }
        self.out.print(" ");
        self.required(ast, node, Property::Name)
    }

    fn visit_variable_declarator(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::Name)?;
        if let Some(initializer) = ast.child(node, Property::Initializer) {
            self.out.print(" = ");
            self.node(ast, initializer)?;
        }
        Ok(())
    }

    fn visit_type_parameter(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::Name)?;
        let bounds = ast.list(node, Property::TypeBound);
        if !bounds.is_empty() {
            self.out.print(" extends ");
            self.join(ast, bounds, " & ")?;
        }
        Ok(())
    }

    fn visit_marker_annotation_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("@");
        self.required(ast, node, Property::Name)
    }

    fn visit_single_member_annotation_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("@");
        self.required(ast, node, Property::Name)?;
        self.out.print("(");
        self.required(ast, node, Property::MemberValue)?;
        self.out.print(")");
        Ok(())
    }

    fn visit_primitive_type(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if let Value::Primitive(primitive) = self.value(ast, node, Property::Primitive)? {
            self.out.print(primitive.as_str());
        }
        Ok(())
    }

    fn visit_void_type(&mut self, _ast: &Ast, _node: NodeId) -> Result<()> {
        self.out.print("void");
        Ok(())
    }

    fn visit_class_or_interface_type(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if let Some(scope) = ast.child(node, Property::Scope) {
            self.node(ast, scope)?;
            self.out.print(".");
        }
        self.required(ast, node, Property::Name)?;
        if ast.flag(node, Property::IsDiamond) {
            self.out.print("<>");
        } else {
            let arguments = ast.list(node, Property::TypeArguments);
            if !arguments.is_empty() {
                self.out.print("<");
                self.join(ast, arguments, ", ")?;
                self.out.print(">");
            }
        }
        Ok(())
    }

    fn visit_array_type(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::ComponentType)?;
        self.out.print("[]");
        Ok(())
    }

    fn visit_wildcard_type(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("?");
        if let Some(bound) = ast.child(node, Property::ExtendedType) {
            self.out.print(" extends ");
            self.node(ast, bound)?;
        }
        if let Some(bound) = ast.child(node, Property::SuperType) {
            self.out.print(" super ");
            self.node(ast, bound)?;
        }
        Ok(())
    }

    fn visit_block_stmt(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.println("{").indent();
        for &statement in ast.list(node, Property::Statements) {
            self.node(ast, statement)?;
            self.out.newline();
        }
        self.ending_comments(ast, node)?;
        self.out.unindent().print("}");
        Ok(())
    }

    fn visit_expression_stmt(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::Expression)?;
        self.out.print(";");
        Ok(())
    }

    fn visit_if_stmt(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("if (");
        self.required(ast, node, Property::Condition)?;
        self.out.print(")");
        let then_block = ast
            .child(node, Property::ThenStmt)
            .is_some_and(|then| ast.kind(then) == NodeKind::BlockStmt);
        if then_block {
            self.out.print(" ");
            self.required(ast, node, Property::ThenStmt)?;
        } else {
            self.out.newline().indent();
            self.required(ast, node, Property::ThenStmt)?;
            self.out.unindent();
        }
        if let Some(else_stmt) = ast.child(node, Property::ElseStmt) {
            if then_block {
                self.out.print(" ");
            } else {
                self.out.newline();
            }
            self.out.print("else");
            if matches!(ast.kind(else_stmt), NodeKind::BlockStmt | NodeKind::IfStmt) {
                self.out.print(" ");
                self.node(ast, else_stmt)?;
            } else {
                self.out.newline().indent();
                self.node(ast, else_stmt)?;
                self.out.unindent();
            }
        }
        Ok(())
    }

    fn visit_while_stmt(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("while (");
        self.required(ast, node, Property::Condition)?;
        self.out.print(") ");
        self.required(ast, node, Property::Body)
    }

    fn visit_return_stmt(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("return");
        if let Some(expression) = ast.child(node, Property::Expression) {
            self.out.print(" ");
            self.node(ast, expression)?;
        }
        self.out.print(";");
        Ok(())
    }

    fn visit_throw_stmt(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("throw ");
        self.required(ast, node, Property::Expression)?;
        self.out.print(";");
        Ok(())
    }

    fn visit_empty_stmt(&mut self, _ast: &Ast, _node: NodeId) -> Result<()> {
        self.out.print(";");
        Ok(())
    }

    fn visit_jml_statement(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        let keyword = match self.value(ast, node, Property::StatementKind)? {
            Value::JmlStatement(kind) => kind.as_str(),
            _ => "assert",
        };
        self.modeling_line(ast, node, keyword, Property::Expression)
    }

    fn visit_variable_declaration_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.inline_annotations(ast, node)?;
        self.modifiers(ast, node)?;
        self.required(ast, node, Property::ElementType)?;
        self.out.print(" ");
        self.join(ast, ast.list(node, Property::Variables), ", ")
    }

    fn visit_name_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::Name)
    }

    fn visit_field_access_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::Scope)?;
        self.out.print(".");
        self.required(ast, node, Property::Name)
    }

    fn visit_method_call_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if let Some(scope) = ast.child(node, Property::Scope) {
            self.node(ast, scope)?;
            self.out.print(".");
        }
        self.required(ast, node, Property::Name)?;
        self.arguments(ast, node)
    }

    fn visit_object_creation_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("new ");
        self.required(ast, node, Property::Type)?;
        self.arguments(ast, node)
    }

    fn visit_this_expr(&mut self, _ast: &Ast, _node: NodeId) -> Result<()> {
        self.out.print("this");
        Ok(())
    }

    fn visit_unary_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        let Value::Unary(operator) = self.value(ast, node, Property::Operator)? else {
            return self.visit_default(ast, node);
        };
        let operator = *operator;
        if !operator.is_postfix() {
            self.out.print(operator.as_str());
        }
        self.required(ast, node, Property::Expression)?;
        if operator.is_postfix() {
            self.out.print(operator.as_str());
        }
        Ok(())
    }

    fn visit_binary_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        let Value::Binary(operator) = self.value(ast, node, Property::Operator)? else {
            return self.visit_default(ast, node);
        };
        let operator = *operator;
        self.required(ast, node, Property::Left)?;
        self.out.print(" ").print(operator.as_str()).print(" ");
        self.required(ast, node, Property::Right)
    }

    fn visit_assign_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        let Value::Assign(operator) = self.value(ast, node, Property::Operator)? else {
            return self.visit_default(ast, node);
        };
        let operator = *operator;
        self.required(ast, node, Property::Target)?;
        self.out.print(" ").print(operator.as_str()).print(" ");
        self.required(ast, node, Property::Value)
    }

    fn visit_conditional_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.required(ast, node, Property::Condition)?;
        self.out.print(" ? ");
        self.required(ast, node, Property::ThenExpr)?;
        self.out.print(" : ");
        self.required(ast, node, Property::ElseExpr)
    }

    fn visit_enclosed_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("(");
        self.required(ast, node, Property::Inner)?;
        self.out.print(")");
        Ok(())
    }

    fn visit_integer_literal_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print(ast.text(node, Property::Literal).unwrap_or_default());
        Ok(())
    }

    fn visit_long_literal_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print(ast.text(node, Property::Literal).unwrap_or_default());
        Ok(())
    }

    fn visit_double_literal_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print(ast.text(node, Property::Literal).unwrap_or_default());
        Ok(())
    }

    fn visit_char_literal_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out
            .print("'")
            .print(ast.text(node, Property::Literal).unwrap_or_default())
            .print("'");
        Ok(())
    }

    fn visit_string_literal_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out
            .print("\"")
            .print(ast.text(node, Property::Literal).unwrap_or_default())
            .print("\"");
        Ok(())
    }

    fn visit_boolean_literal_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print(if ast.flag(node, Property::BooleanValue) {
            "true"
        } else {
            "false"
        });
        Ok(())
    }

    fn visit_null_literal_expr(&mut self, _ast: &Ast, _node: NodeId) -> Result<()> {
        self.out.print("null");
        Ok(())
    }

    fn visit_jml_keyword_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print(ast.text(node, Property::Keyword).unwrap_or_default());
        Ok(())
    }

    fn visit_jml_old_expr(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        self.out.print("\\old(");
        self.required(ast, node, Property::Expression)?;
        self.out.print(")");
        Ok(())
    }

    fn visit_jml_multi_compare_expr(&mut self, _ast: &Ast, node: NodeId) -> Result<()> {
        Err(JmlxError::print_error(format!(
            "chained comparison {node} has no source form"
        )))
    }

    fn visit_jml_contract(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if let Value::Behavior(behavior) = self.value(ast, node, Property::Behavior)? {
            if *behavior != JmlBehavior::Lightweight {
                self.out.print("//@ ").println(behavior.as_str());
            }
        }
        for &clause in ast.list(node, Property::Clauses) {
            self.node(ast, clause)?;
            self.out.newline();
        }
        Ok(())
    }

    fn visit_jml_clause(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        let keyword = match self.value(ast, node, Property::ClauseKind)? {
            Value::Clause(kind) => kind.as_str(),
            _ => "requires",
        };
        self.jml_depth += 1;
        self.out.print("//@ ").print(keyword).print(" ");
        let result = self.join(ast, ast.list(node, Property::Expressions), ", ");
        self.out.print(";");
        self.jml_depth -= 1;
        result
    }

    fn visit_line_comment(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if self.print_comments() {
            self.out.print("// ").println(ast.text(node, Property::Content).unwrap_or_default().trim());
        }
        Ok(())
    }

    fn visit_block_comment(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if self.print_comments() {
            let content = normalize_line_breaks(ast.text(node, Property::Content).unwrap_or_default(), self.out.end_of_line());
            self.out.print("/*").print(&content).println("*/");
        }
        Ok(())
    }

    fn visit_javadoc_comment(&mut self, ast: &Ast, node: NodeId) -> Result<()> {
        if !self.print_comments() || !self.config.print_javadoc {
            return Ok(());
        }
        let content = normalize_line_breaks(ast.text(node, Property::Content).unwrap_or_default(), "\n");
        let lines: Vec<&str> = content
            .split('\n')
            .map(|line| {
                let trimmed = line.trim();
                let line = trimmed.strip_prefix('*').unwrap_or(line);
                line.trim_end()
            })
            .collect();
        let prepend_space = lines
            .iter()
            .any(|line| !line.is_empty() && !line.starts_with(' '));

        self.out.println("/**");
        let mut leading = true;
        let mut pending_blank = false;
        for line in lines {
            if line.is_empty() {
                pending_blank = !leading;
                continue;
            }
            leading = false;
            if pending_blank {
                self.out.println(" *");
                pending_blank = false;
            }
            self.out.print(" *");
            if prepend_space {
                self.out.print(" ");
            }
            self.out.println(line);
        }
        self.out.println(" */");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ChangeTracker, ModifierKeyword};

    fn print(ast: &Ast, root: NodeId) -> String {
        PrettyPrinter::new(&PrinterConfiguration::default())
            .print(ast, root)
            .unwrap()
    }

    fn method(ast: &mut Ast, name: &str) -> NodeId {
        let public = ast.modifier(ModifierKeyword::Public);
        let ty = ast.build(NodeKind::VoidType).finish().unwrap();
        let name = ast.simple_name(name);
        let body = ast.build(NodeKind::BlockStmt).finish().unwrap();
        ast.build(NodeKind::MethodDeclaration)
            .list(Property::Modifiers, [public])
            .child(Property::Type, ty)
            .child(Property::Name, name)
            .child(Property::Body, body)
            .finish()
            .unwrap()
    }

    #[test]
    fn orphan_in_empty_block() {
        let mut ast = Ast::new();
        let block = ast.build(NodeKind::BlockStmt).finish().unwrap();
        let todo = ast.line_comment("TODO");
        ast.add_orphan_comment(block, todo).unwrap();
        assert_eq!(print(&ast, block), "{\n    // TODO\n}");

        assert!(ast.remove_comment(todo));
        assert_eq!(print(&ast, block), "{\n}");
    }

    #[test]
    fn class_with_documented_methods() {
        let mut ast = Ast::new();
        let first = method(&mut ast, "oneMethod");
        let second = method(&mut ast, "anotherMethod");
        let doc = ast.javadoc_comment(" Comment A ");
        ast.set_comment(first, Some(doc)).unwrap();
        let public = ast.modifier(ModifierKeyword::Public);
        let name = ast.simple_name("MyClass");
        let class = ast
            .build(NodeKind::ClassOrInterfaceDeclaration)
            .list(Property::Modifiers, [public])
            .child(Property::Name, name)
            .list(Property::Members, [first, second])
            .finish()
            .unwrap();

        insta::assert_snapshot!(print(&ast, class), @r"
        public class MyClass {

            /**
             * Comment A
             */
            public void oneMethod() {
            }

            public void anotherMethod() {
            }
        }
        ");
    }

    #[test]
    fn javadoc_layout_is_normalised() {
        let mut ast = Ast::new();
        let doc = ast.javadoc_comment("\n   * First\n   *\n   * Second\n   ");
        let stmt = ast.build(NodeKind::EmptyStmt).finish().unwrap();
        ast.set_comment(stmt, Some(doc)).unwrap();
        assert_eq!(print(&ast, stmt), "/**\n * First\n *\n * Second\n */\n;");
    }

    #[test]
    fn quoted_literals_and_line_comments() {
        let mut ast = Ast::new();
        let text = ast
            .build(NodeKind::StringLiteralExpr)
            .value(Property::Literal, "a\\n")
            .finish()
            .unwrap();
        let letter = ast
            .build(NodeKind::CharLiteralExpr)
            .value(Property::Literal, "x")
            .finish()
            .unwrap();
        let note = ast.line_comment("   spaced out  ");
        ast.set_comment(letter, Some(note)).unwrap();

        assert_eq!(print(&ast, text), "\"a\\n\"");
        assert_eq!(print(&ast, letter), "// spaced out\n'x'");
    }

    #[test]
    fn comments_can_be_switched_off() {
        let mut ast = Ast::new();
        let stmt = ast.build(NodeKind::EmptyStmt).finish().unwrap();
        let note = ast.block_comment(" note ");
        ast.set_comment(stmt, Some(note)).unwrap();
        assert_eq!(print(&ast, stmt), "/* note */\n;");

        let config = PrinterConfiguration {
            print_comments: false,
            ..PrinterConfiguration::default()
        };
        let text = PrettyPrinter::new(&config).print(&ast, stmt).unwrap();
        assert_eq!(text, ";");
    }

    #[test]
    fn chained_comparisons_are_rejected() {
        let mut ast = Ast::new();
        let a = ast.name_expr("a");
        let b = ast.name_expr("b");
        let c = ast.name_expr("c");
        let chain = ast
            .build(NodeKind::JmlMultiCompareExpr)
            .list(Property::Expressions, [a, b, c])
            .finish()
            .unwrap();
        let err = PrettyPrinter::new(&PrinterConfiguration::default())
            .print(&ast, chain)
            .unwrap_err();
        assert!(matches!(err, JmlxError::Print { .. }));
    }

    #[test]
    fn untouched_nodes_without_tokens_are_printed() {
        let mut ast = Ast::new();
        let stmt = ast.build(NodeKind::EmptyStmt).finish().unwrap();
        let mut tracker = ChangeTracker::attach(&mut ast);
        let text = PrettyPrinter::preserving(&PrinterConfiguration::default(), tracker.touched())
            .print(&ast, stmt)
            .unwrap();
        assert_eq!(text, ";");
    }
}
