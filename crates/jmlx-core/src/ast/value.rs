//! Non-node property values

use crate::token::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum! {
    /// Binary operators, including the JML logical connectives
    BinaryOperator {
        Or => "||",
        And => "&&",
        BinaryOr => "|",
        Xor => "^",
        BinaryAnd => "&",
        Equals => "==",
        NotEquals => "!=",
        Less => "<",
        Greater => ">",
        LessEquals => "<=",
        GreaterEquals => ">=",
        LeftShift => "<<",
        SignedRightShift => ">>",
        UnsignedRightShift => ">>>",
        Plus => "+",
        Minus => "-",
        Multiply => "*",
        Divide => "/",
        Remainder => "%",
        Implication => "==>",
        Equivalence => "<==>",
    }
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::OrOr => Self::Or,
            TokenKind::AndAnd => Self::And,
            TokenKind::Pipe => Self::BinaryOr,
            TokenKind::Caret => Self::Xor,
            TokenKind::Amp => Self::BinaryAnd,
            TokenKind::EqEq => Self::Equals,
            TokenKind::Ne => Self::NotEquals,
            TokenKind::Lt => Self::Less,
            TokenKind::Gt => Self::Greater,
            TokenKind::Le => Self::LessEquals,
            TokenKind::Ge => Self::GreaterEquals,
            TokenKind::Shl => Self::LeftShift,
            TokenKind::Shr => Self::SignedRightShift,
            TokenKind::UShr => Self::UnsignedRightShift,
            TokenKind::Plus => Self::Plus,
            TokenKind::Minus => Self::Minus,
            TokenKind::Star => Self::Multiply,
            TokenKind::Slash => Self::Divide,
            TokenKind::Percent => Self::Remainder,
            TokenKind::Implies => Self::Implication,
            TokenKind::Equivalence => Self::Equivalence,
            _ => return None,
        })
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            Self::Equivalence => 1,
            Self::Implication => 2,
            Self::Or => 3,
            Self::And => 4,
            Self::BinaryOr => 5,
            Self::Xor => 6,
            Self::BinaryAnd => 7,
            Self::Equals | Self::NotEquals => 8,
            Self::Less | Self::Greater | Self::LessEquals | Self::GreaterEquals => 9,
            Self::LeftShift | Self::SignedRightShift | Self::UnsignedRightShift => 10,
            Self::Plus | Self::Minus => 11,
            Self::Multiply | Self::Divide | Self::Remainder => 12,
        }
    }

    pub fn is_relational(self) -> bool {
        self.precedence() == 9
    }
}

keyword_enum! {
    UnaryOperator {
        Plus => "+",
        Minus => "-",
        PrefixIncrement => "++",
        PrefixDecrement => "--",
        LogicalComplement => "!",
        BitwiseComplement => "~",
        PostfixIncrement => "++",
        PostfixDecrement => "--",
    }
}

impl UnaryOperator {
    pub fn is_postfix(self) -> bool {
        matches!(self, Self::PostfixIncrement | Self::PostfixDecrement)
    }

    pub fn prefix_from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Plus,
            TokenKind::Minus => Self::Minus,
            TokenKind::PlusPlus => Self::PrefixIncrement,
            TokenKind::MinusMinus => Self::PrefixDecrement,
            TokenKind::Bang => Self::LogicalComplement,
            TokenKind::Tilde => Self::BitwiseComplement,
            _ => return None,
        })
    }
}

keyword_enum! {
    AssignOperator {
        Assign => "=",
        Plus => "+=",
        Minus => "-=",
        Multiply => "*=",
        Divide => "/=",
        BinaryAnd => "&=",
        BinaryOr => "|=",
        Xor => "^=",
        Remainder => "%=",
        LeftShift => "<<=",
        SignedRightShift => ">>=",
        UnsignedRightShift => ">>>=",
    }
}

impl AssignOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Assign => Self::Assign,
            TokenKind::PlusAssign => Self::Plus,
            TokenKind::MinusAssign => Self::Minus,
            TokenKind::StarAssign => Self::Multiply,
            TokenKind::SlashAssign => Self::Divide,
            TokenKind::AmpAssign => Self::BinaryAnd,
            TokenKind::PipeAssign => Self::BinaryOr,
            TokenKind::CaretAssign => Self::Xor,
            TokenKind::PercentAssign => Self::Remainder,
            TokenKind::ShlAssign => Self::LeftShift,
            TokenKind::ShrAssign => Self::SignedRightShift,
            TokenKind::UShrAssign => Self::UnsignedRightShift,
            _ => return None,
        })
    }
}

keyword_enum! {
    ModifierKeyword {
        Public => "public",
        Protected => "protected",
        Private => "private",
        Abstract => "abstract",
        Static => "static",
        Final => "final",
        Transient => "transient",
        Volatile => "volatile",
        Synchronized => "synchronized",
        Native => "native",
        Strictfp => "strictfp",
        Default => "default",
    }
}

impl ModifierKeyword {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::PublicKw => Self::Public,
            TokenKind::ProtectedKw => Self::Protected,
            TokenKind::PrivateKw => Self::Private,
            TokenKind::AbstractKw => Self::Abstract,
            TokenKind::StaticKw => Self::Static,
            TokenKind::FinalKw => Self::Final,
            TokenKind::TransientKw => Self::Transient,
            TokenKind::VolatileKw => Self::Volatile,
            TokenKind::SynchronizedKw => Self::Synchronized,
            TokenKind::NativeKw => Self::Native,
            TokenKind::StrictfpKw => Self::Strictfp,
            TokenKind::DefaultKw => Self::Default,
            _ => return None,
        })
    }
}

keyword_enum! {
    PrimitiveKind {
        Boolean => "boolean",
        Byte => "byte",
        Char => "char",
        Short => "short",
        Int => "int",
        Long => "long",
        Float => "float",
        Double => "double",
    }
}

impl PrimitiveKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::BooleanKw => Self::Boolean,
            TokenKind::ByteKw => Self::Byte,
            TokenKind::CharKw => Self::Char,
            TokenKind::ShortKw => Self::Short,
            TokenKind::IntKw => Self::Int,
            TokenKind::LongKw => Self::Long,
            TokenKind::FloatKw => Self::Float,
            TokenKind::DoubleKw => Self::Double,
            _ => return None,
        })
    }
}

keyword_enum! {
    /// Heavyweight behavior keyword of a contract; `Lightweight` prints nothing
    JmlBehavior {
        Lightweight => "",
        Behavior => "behavior",
        NormalBehavior => "normal_behavior",
        ExceptionalBehavior => "exceptional_behavior",
    }
}

impl JmlBehavior {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "behavior" | "behaviour" => Self::Behavior,
            "normal_behavior" | "normal_behaviour" => Self::NormalBehavior,
            "exceptional_behavior" | "exceptional_behaviour" => Self::ExceptionalBehavior,
            _ => return None,
        })
    }
}

keyword_enum! {
    JmlClauseKind {
        Requires => "requires",
        Ensures => "ensures",
        Assignable => "assignable",
    }
}

impl JmlClauseKind {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "requires" | "pre" => Self::Requires,
            "ensures" | "post" => Self::Ensures,
            "assignable" | "modifies" => Self::Assignable,
            _ => return None,
        })
    }
}

keyword_enum! {
    JmlStatementKind {
        Assert => "assert",
        Assume => "assume",
        LoopInvariant => "loop_invariant",
    }
}

impl JmlStatementKind {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "assert" => Self::Assert,
            "assume" => Self::Assume,
            "loop_invariant" | "maintaining" => Self::LoopInvariant,
            _ => return None,
        })
    }
}

/// Shape of a value property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Flag,
    Modifier,
    Primitive,
    Unary,
    Binary,
    Assign,
    Behavior,
    Clause,
    JmlStatement,
    Operators,
}

impl ValueType {
    /// Value a freshly built node starts with
    pub fn default_value(self) -> Value {
        match self {
            ValueType::Text => Value::Text(String::new()),
            ValueType::Flag => Value::Flag(false),
            ValueType::Modifier => Value::Modifier(ModifierKeyword::Public),
            ValueType::Primitive => Value::Primitive(PrimitiveKind::Int),
            ValueType::Unary => Value::Unary(UnaryOperator::Plus),
            ValueType::Binary => Value::Binary(BinaryOperator::Plus),
            ValueType::Assign => Value::Assign(AssignOperator::Assign),
            ValueType::Behavior => Value::Behavior(JmlBehavior::Lightweight),
            ValueType::Clause => Value::Clause(JmlClauseKind::Requires),
            ValueType::JmlStatement => Value::JmlStatement(JmlStatementKind::Assert),
            ValueType::Operators => Value::Operators(Vec::new()),
        }
    }
}

/// A property value that is not a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Flag(bool),
    Modifier(ModifierKeyword),
    Primitive(PrimitiveKind),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Assign(AssignOperator),
    Behavior(JmlBehavior),
    Clause(JmlClauseKind),
    JmlStatement(JmlStatementKind),
    Operators(Vec<BinaryOperator>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Text(_) => ValueType::Text,
            Value::Flag(_) => ValueType::Flag,
            Value::Modifier(_) => ValueType::Modifier,
            Value::Primitive(_) => ValueType::Primitive,
            Value::Unary(_) => ValueType::Unary,
            Value::Binary(_) => ValueType::Binary,
            Value::Assign(_) => ValueType::Assign,
            Value::Behavior(_) => ValueType::Behavior,
            Value::Clause(_) => ValueType::Clause,
            Value::JmlStatement(_) => ValueType::JmlStatement,
            Value::Operators(_) => ValueType::Operators,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Flag(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_tables() {
        assert_eq!(BinaryOperator::from_token(TokenKind::Implies), Some(BinaryOperator::Implication));
        assert_eq!(BinaryOperator::from_token(TokenKind::Assign), None);
        assert!(BinaryOperator::Multiply.precedence() > BinaryOperator::Plus.precedence());
        assert!(BinaryOperator::Equivalence.precedence() < BinaryOperator::Implication.precedence());
        assert!(BinaryOperator::LessEquals.is_relational());
        assert_eq!(AssignOperator::from_token(TokenKind::UShrAssign).map(|o| o.as_str()), Some(">>>="));
        assert_eq!(UnaryOperator::PostfixIncrement.to_string(), "++");
    }

    #[test]
    fn defaults_match_their_type() {
        for ty in [ValueType::Text, ValueType::Flag, ValueType::Operators, ValueType::Clause] {
            assert_eq!(ty.default_value().value_type(), ty);
        }
    }
}
