//! Node kinds and their property schemas
//!
//! The whole node table lives in [`with_node_kinds!`]; other modules hand it
//! a callback macro to derive what they need from it (the kind enum and
//! schema here, the visitor trait in `visitor.rs`).

use super::value::ValueType;
use std::fmt;

/// Invoke `$callback!` with the full node table
///
/// Each entry is `Kind: Category => visit_method { Property: Shape(..), .. }`
/// where a shape is `Value(ValueType)`, or `Required`, `Optional` or `List`
/// of `kind Kind`, `cat Category` or `any`.
macro_rules! with_node_kinds {
    ($callback:ident) => {
        $callback! {
            CompilationUnit: Other => visit_compilation_unit {
                PackageDeclaration: Optional(kind PackageDeclaration),
                Imports: List(kind ImportDeclaration),
                Types: List(cat TypeDeclaration),
            }
            PackageDeclaration: Other => visit_package_declaration {
                Annotations: List(cat Annotation),
                Name: Required(kind Name),
            }
            ImportDeclaration: Other => visit_import_declaration {
                IsStatic: Value(Flag),
                Name: Required(kind Name),
                IsAsterisk: Value(Flag),
            }
            Name: Other => visit_name {
                Qualifier: Optional(kind Name),
                Identifier: Value(Text),
            }
            SimpleName: Other => visit_simple_name {
                Identifier: Value(Text),
            }
            Modifier: Other => visit_modifier {
                Keyword: Value(Modifier),
            }
            ClassOrInterfaceDeclaration: TypeDeclaration => visit_class_or_interface_declaration {
                Annotations: List(cat Annotation),
                Modifiers: List(kind Modifier),
                IsInterface: Value(Flag),
                Name: Required(kind SimpleName),
                TypeParameters: List(kind TypeParameter),
                ExtendedTypes: List(kind ClassOrInterfaceType),
                ImplementedTypes: List(kind ClassOrInterfaceType),
                Members: List(cat BodyDeclaration),
            }
            FieldDeclaration: BodyDeclaration => visit_field_declaration {
                Annotations: List(cat Annotation),
                Modifiers: List(kind Modifier),
                ElementType: Required(cat Type),
                Variables: List(kind VariableDeclarator),
            }
            MethodDeclaration: BodyDeclaration => visit_method_declaration {
                Contracts: List(kind JmlContract),
                Annotations: List(cat Annotation),
                Modifiers: List(kind Modifier),
                TypeParameters: List(kind TypeParameter),
                Type: Required(cat Type),
                Name: Required(kind SimpleName),
                Parameters: List(kind Parameter),
                ThrownExceptions: List(kind ClassOrInterfaceType),
                Body: Optional(kind BlockStmt),
            }
            ConstructorDeclaration: BodyDeclaration => visit_constructor_declaration {
                Contracts: List(kind JmlContract),
                Annotations: List(cat Annotation),
                Modifiers: List(kind Modifier),
                TypeParameters: List(kind TypeParameter),
                Name: Required(kind SimpleName),
                Parameters: List(kind Parameter),
                ThrownExceptions: List(kind ClassOrInterfaceType),
                Body: Required(kind BlockStmt),
            }
            JmlClassInvariant: BodyDeclaration => visit_jml_class_invariant {
                Expression: Required(cat Expression),
            }
            Parameter: Other => visit_parameter {
                Annotations: List(cat Annotation),
                Modifiers: List(kind Modifier),
                Type: Required(cat Type),
                IsVarArgs: Value(Flag),
                Name: Required(kind SimpleName),
            }
            VariableDeclarator: Other => visit_variable_declarator {
                Name: Required(kind SimpleName),
                Initializer: Optional(cat Expression),
            }
            TypeParameter: Other => visit_type_parameter {
                Name: Required(kind SimpleName),
                TypeBound: List(kind ClassOrInterfaceType),
            }
            MarkerAnnotationExpr: Annotation => visit_marker_annotation_expr {
                Name: Required(kind Name),
            }
            SingleMemberAnnotationExpr: Annotation => visit_single_member_annotation_expr {
                Name: Required(kind Name),
                MemberValue: Required(cat Expression),
            }
            PrimitiveType: Type => visit_primitive_type {
                Primitive: Value(Primitive),
            }
            VoidType: Type => visit_void_type {}
            ClassOrInterfaceType: Type => visit_class_or_interface_type {
                Scope: Optional(kind ClassOrInterfaceType),
                Name: Required(kind SimpleName),
                TypeArguments: List(cat Type),
                IsDiamond: Value(Flag),
            }
            ArrayType: Type => visit_array_type {
                ComponentType: Required(cat Type),
            }
            WildcardType: Type => visit_wildcard_type {
                ExtendedType: Optional(cat Type),
                SuperType: Optional(cat Type),
            }
            BlockStmt: Statement => visit_block_stmt {
                Statements: List(cat Statement),
            }
            ExpressionStmt: Statement => visit_expression_stmt {
                Expression: Required(cat Expression),
            }
            IfStmt: Statement => visit_if_stmt {
                Condition: Required(cat Expression),
                ThenStmt: Required(cat Statement),
                ElseStmt: Optional(cat Statement),
            }
            WhileStmt: Statement => visit_while_stmt {
                Condition: Required(cat Expression),
                Body: Required(cat Statement),
            }
            ReturnStmt: Statement => visit_return_stmt {
                Expression: Optional(cat Expression),
            }
            ThrowStmt: Statement => visit_throw_stmt {
                Expression: Required(cat Expression),
            }
            EmptyStmt: Statement => visit_empty_stmt {}
            JmlStatement: Statement => visit_jml_statement {
                StatementKind: Value(JmlStatement),
                Expression: Required(cat Expression),
            }
            VariableDeclarationExpr: Expression => visit_variable_declaration_expr {
                Annotations: List(cat Annotation),
                Modifiers: List(kind Modifier),
                ElementType: Required(cat Type),
                Variables: List(kind VariableDeclarator),
            }
            NameExpr: Expression => visit_name_expr {
                Name: Required(kind SimpleName),
            }
            FieldAccessExpr: Expression => visit_field_access_expr {
                Scope: Required(cat Expression),
                Name: Required(kind SimpleName),
            }
            MethodCallExpr: Expression => visit_method_call_expr {
                Scope: Optional(cat Expression),
                Name: Required(kind SimpleName),
                Arguments: List(cat Expression),
            }
            ObjectCreationExpr: Expression => visit_object_creation_expr {
                Type: Required(kind ClassOrInterfaceType),
                Arguments: List(cat Expression),
            }
            ThisExpr: Expression => visit_this_expr {}
            UnaryExpr: Expression => visit_unary_expr {
                Operator: Value(Unary),
                Expression: Required(cat Expression),
            }
            BinaryExpr: Expression => visit_binary_expr {
                Left: Required(cat Expression),
                Operator: Value(Binary),
                Right: Required(cat Expression),
            }
            AssignExpr: Expression => visit_assign_expr {
                Target: Required(cat Expression),
                Operator: Value(Assign),
                Value: Required(cat Expression),
            }
            ConditionalExpr: Expression => visit_conditional_expr {
                Condition: Required(cat Expression),
                ThenExpr: Required(cat Expression),
                ElseExpr: Required(cat Expression),
            }
            EnclosedExpr: Expression => visit_enclosed_expr {
                Inner: Required(cat Expression),
            }
            IntegerLiteralExpr: Expression => visit_integer_literal_expr {
                Literal: Value(Text),
            }
            LongLiteralExpr: Expression => visit_long_literal_expr {
                Literal: Value(Text),
            }
            DoubleLiteralExpr: Expression => visit_double_literal_expr {
                Literal: Value(Text),
            }
            CharLiteralExpr: Expression => visit_char_literal_expr {
                Literal: Value(Text),
            }
            StringLiteralExpr: Expression => visit_string_literal_expr {
                Literal: Value(Text),
            }
            BooleanLiteralExpr: Expression => visit_boolean_literal_expr {
                BooleanValue: Value(Flag),
            }
            NullLiteralExpr: Expression => visit_null_literal_expr {}
            JmlKeywordExpr: Expression => visit_jml_keyword_expr {
                Keyword: Value(Text),
            }
            JmlOldExpr: Expression => visit_jml_old_expr {
                Expression: Required(cat Expression),
            }
            JmlMultiCompareExpr: Expression => visit_jml_multi_compare_expr {
                Expressions: List(cat Expression),
                Operators: Value(Operators),
            }
            JmlContract: Other => visit_jml_contract {
                Behavior: Value(Behavior),
                Clauses: List(kind JmlClause),
            }
            JmlClause: Other => visit_jml_clause {
                ClauseKind: Value(Clause),
                Expressions: List(any),
            }
            LineComment: Comment => visit_line_comment {
                Content: Value(Text),
            }
            BlockComment: Comment => visit_block_comment {
                Content: Value(Text),
            }
            JavadocComment: Comment => visit_javadoc_comment {
                Content: Value(Text),
            }
        }
    };
}

pub(crate) use with_node_kinds;

/// Broad grouping used for child admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Comment,
    Expression,
    Statement,
    Type,
    BodyDeclaration,
    TypeDeclaration,
    Annotation,
    Other,
}

/// Which nodes a child slot or list admits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepts {
    Any,
    Kind(NodeKind),
    Category(Category),
}

impl Accepts {
    pub fn admits(self, kind: NodeKind) -> bool {
        match self {
            Accepts::Any => !kind.is_comment(),
            Accepts::Kind(expected) => expected == kind,
            Accepts::Category(category) => kind.is_a(category),
        }
    }
}

/// How a property stores its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Value(ValueType),
    Required(Accepts),
    Optional(Accepts),
    List(Accepts),
}

impl FieldShape {
    pub fn describe(self) -> &'static str {
        match self {
            FieldShape::Value(_) => "value",
            FieldShape::Required(_) | FieldShape::Optional(_) => "child",
            FieldShape::List(_) => "list",
        }
    }

    pub fn accepts(self) -> Option<Accepts> {
        match self {
            FieldShape::Value(_) => None,
            FieldShape::Required(a) | FieldShape::Optional(a) | FieldShape::List(a) => Some(a),
        }
    }
}

/// One entry of a kind's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub property: Property,
    pub shape: FieldShape,
}

/// Observable property identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Annotations,
    Arguments,
    Behavior,
    Body,
    BooleanValue,
    ClauseKind,
    Clauses,
    /// The attached comment of any node
    Comment,
    ComponentType,
    Condition,
    Content,
    Contracts,
    ElementType,
    ElseExpr,
    ElseStmt,
    Expression,
    Expressions,
    ExtendedType,
    ExtendedTypes,
    Identifier,
    ImplementedTypes,
    Imports,
    Initializer,
    Inner,
    IsAsterisk,
    IsDiamond,
    IsInterface,
    IsStatic,
    IsVarArgs,
    Keyword,
    Left,
    Literal,
    MemberValue,
    Members,
    Modifiers,
    Name,
    Operator,
    Operators,
    /// The orphan comments of any node
    OrphanComments,
    PackageDeclaration,
    Parameters,
    Primitive,
    Qualifier,
    Right,
    Scope,
    StatementKind,
    Statements,
    SuperType,
    Target,
    ThenExpr,
    ThenStmt,
    ThrownExceptions,
    Type,
    TypeArguments,
    TypeBound,
    TypeParameters,
    Types,
    Value,
    Variables,
}

macro_rules! field_spec {
    ($prop:ident, Value($ty:ident)) => {
        FieldSpec {
            property: Property::$prop,
            shape: FieldShape::Value(ValueType::$ty),
        }
    };
    ($prop:ident, $shape:ident(kind $kind:ident)) => {
        FieldSpec {
            property: Property::$prop,
            shape: FieldShape::$shape(Accepts::Kind(NodeKind::$kind)),
        }
    };
    ($prop:ident, $shape:ident(cat $cat:ident)) => {
        FieldSpec {
            property: Property::$prop,
            shape: FieldShape::$shape(Accepts::Category(Category::$cat)),
        }
    };
    ($prop:ident, $shape:ident(any)) => {
        FieldSpec {
            property: Property::$prop,
            shape: FieldShape::$shape(Accepts::Any),
        }
    };
}

macro_rules! define_node_kinds {
    ($(
        $kind:ident : $cat:ident => $visit:ident {
            $($prop:ident : $shape:ident ( $($arg:tt)* )),* $(,)?
        }
    )*) => {
        /// Every concrete node kind
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            pub fn category(self) -> Category {
                match self {
                    $(NodeKind::$kind => Category::$cat,)*
                }
            }

            /// Properties in declaration (and printing) order
            pub fn schema(self) -> &'static [FieldSpec] {
                match self {
                    $(NodeKind::$kind => {
                        const FIELDS: &[FieldSpec] = &[$(field_spec!($prop, $shape($($arg)*)),)*];
                        FIELDS
                    })*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }
        }
    };
}

with_node_kinds!(define_node_kinds);

impl NodeKind {
    /// Membership in a category; type declarations are body declarations
    /// and annotations are expressions
    pub fn is_a(self, category: Category) -> bool {
        let own = self.category();
        own == category
            || (category == Category::BodyDeclaration && own == Category::TypeDeclaration)
            || (category == Category::Expression && own == Category::Annotation)
    }

    pub fn is_comment(self) -> bool {
        self.category() == Category::Comment
    }

    /// Position of `property` in the schema
    pub fn field_index(self, property: Property) -> Option<usize> {
        self.schema().iter().position(|f| f.property == property)
    }

    pub fn field(self, property: Property) -> Option<FieldSpec> {
        self.schema().iter().copied().find(|f| f.property == property)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
