//! Lexical categories

use serde::{Deserialize, Serialize};

/// Broad grouping of token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    WhitespaceNoEol,
    Eol,
    Comment,
    Identifier,
    Keyword,
    Literal,
    Separator,
    Operator,
    Eof,
    Error,
}

macro_rules! token_kinds {
    (
        trivia { $($trivia:ident => $trivia_cat:ident,)* }
        words { $($kw:ident => $kw_text:literal,)* }
        fixed { $($fx:ident => $fx_text:literal : $fx_cat:ident,)* }
        other { $($other:ident => $other_cat:ident,)* }
    ) => {
        /// Every lexical unit the lexer can produce
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum TokenKind {
            $($trivia,)*
            $($kw,)*
            $($fx,)*
            $($other,)*
        }

        impl TokenKind {
            pub fn category(self) -> TokenCategory {
                match self {
                    $(TokenKind::$trivia => TokenCategory::$trivia_cat,)*
                    $(TokenKind::$kw => TokenCategory::Keyword,)*
                    $(TokenKind::$fx => TokenCategory::$fx_cat,)*
                    $(TokenKind::$other => TokenCategory::$other_cat,)*
                }
            }

            /// Source text of keywords, separators and operators
            pub fn fixed_text(self) -> Option<&'static str> {
                match self {
                    $(TokenKind::$kw => Some($kw_text),)*
                    $(TokenKind::$fx => Some($fx_text),)*
                    _ => None,
                }
            }

            /// Keyword (or `true`/`false`/`null` literal) for an identifier-shaped word
            pub fn from_word(word: &str) -> Option<TokenKind> {
                match word {
                    $($kw_text => Some(TokenKind::$kw),)*
                    _ => None,
                }
            }
        }
    };
}

token_kinds! {
    trivia {
        Whitespace => WhitespaceNoEol,
        Newline => Eol,
        LineComment => Comment,
        BlockComment => Comment,
        JavadocComment => Comment,
        JmlLineComment => Comment,
        JmlBlockComment => Comment,
    }
    words {
        AbstractKw => "abstract",
        AssertKw => "assert",
        BooleanKw => "boolean",
        BreakKw => "break",
        ByteKw => "byte",
        CaseKw => "case",
        CatchKw => "catch",
        CharKw => "char",
        ClassKw => "class",
        ConstKw => "const",
        ContinueKw => "continue",
        DefaultKw => "default",
        DoKw => "do",
        DoubleKw => "double",
        ElseKw => "else",
        EnumKw => "enum",
        ExtendsKw => "extends",
        FinalKw => "final",
        FinallyKw => "finally",
        FloatKw => "float",
        ForKw => "for",
        GotoKw => "goto",
        IfKw => "if",
        ImplementsKw => "implements",
        ImportKw => "import",
        InstanceofKw => "instanceof",
        IntKw => "int",
        InterfaceKw => "interface",
        LongKw => "long",
        NativeKw => "native",
        NewKw => "new",
        PackageKw => "package",
        PrivateKw => "private",
        ProtectedKw => "protected",
        PublicKw => "public",
        ReturnKw => "return",
        ShortKw => "short",
        StaticKw => "static",
        StrictfpKw => "strictfp",
        SuperKw => "super",
        SwitchKw => "switch",
        SynchronizedKw => "synchronized",
        ThisKw => "this",
        ThrowKw => "throw",
        ThrowsKw => "throws",
        TransientKw => "transient",
        TryKw => "try",
        VoidKw => "void",
        VolatileKw => "volatile",
        WhileKw => "while",
        TrueKw => "true",
        FalseKw => "false",
        NullKw => "null",
    }
    fixed {
        LParen => "(" : Separator,
        RParen => ")" : Separator,
        LBrace => "{" : Separator,
        RBrace => "}" : Separator,
        LBracket => "[" : Separator,
        RBracket => "]" : Separator,
        Semicolon => ";" : Separator,
        Comma => "," : Separator,
        Dot => "." : Separator,
        Ellipsis => "..." : Separator,
        At => "@" : Separator,
        DoubleColon => "::" : Separator,
        Assign => "=" : Operator,
        Gt => ">" : Operator,
        Lt => "<" : Operator,
        Bang => "!" : Operator,
        Tilde => "~" : Operator,
        Question => "?" : Operator,
        Colon => ":" : Operator,
        Arrow => "->" : Operator,
        EqEq => "==" : Operator,
        Le => "<=" : Operator,
        Ge => ">=" : Operator,
        Ne => "!=" : Operator,
        AndAnd => "&&" : Operator,
        OrOr => "||" : Operator,
        PlusPlus => "++" : Operator,
        MinusMinus => "--" : Operator,
        Plus => "+" : Operator,
        Minus => "-" : Operator,
        Star => "*" : Operator,
        Slash => "/" : Operator,
        Amp => "&" : Operator,
        Pipe => "|" : Operator,
        Caret => "^" : Operator,
        Percent => "%" : Operator,
        Shl => "<<" : Operator,
        Shr => ">>" : Operator,
        UShr => ">>>" : Operator,
        PlusAssign => "+=" : Operator,
        MinusAssign => "-=" : Operator,
        StarAssign => "*=" : Operator,
        SlashAssign => "/=" : Operator,
        AmpAssign => "&=" : Operator,
        PipeAssign => "|=" : Operator,
        CaretAssign => "^=" : Operator,
        PercentAssign => "%=" : Operator,
        ShlAssign => "<<=" : Operator,
        ShrAssign => ">>=" : Operator,
        UShrAssign => ">>>=" : Operator,
        Implies => "==>" : Operator,
        Equivalence => "<==>" : Operator,
    }
    other {
        Identifier => Identifier,
        JmlKeyword => Keyword,
        IntegerLiteral => Literal,
        LongLiteral => Literal,
        FloatingLiteral => Literal,
        CharLiteral => Literal,
        StringLiteral => Literal,
        Eof => Eof,
        Unknown => Error,
    }
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self.category(),
            TokenCategory::WhitespaceNoEol | TokenCategory::Eol | TokenCategory::Comment
        )
    }

    pub fn is_comment(self) -> bool {
        self.category() == TokenCategory::Comment
    }

    pub fn is_modeling_comment(self) -> bool {
        matches!(self, TokenKind::JmlLineComment | TokenKind::JmlBlockComment)
    }

    /// Number of leading `>` characters of a right-angle operator, 0 otherwise
    pub fn right_angle_width(self) -> usize {
        match self {
            TokenKind::Gt | TokenKind::Ge => 1,
            TokenKind::Shr | TokenKind::ShrAssign => 2,
            TokenKind::UShr | TokenKind::UShrAssign => 3,
            _ => 0,
        }
    }

    /// Whether a raw match of this kind may be resliced into a shorter `>` run
    pub fn is_ambiguous_right_angle(self) -> bool {
        self != TokenKind::Gt && self.right_angle_width() > 0
    }

    /// Right-angle operator made of `width` `>` characters and an optional `=`
    pub fn right_angle(width: usize, assign: bool) -> Option<TokenKind> {
        match (width, assign) {
            (1, false) => Some(TokenKind::Gt),
            (1, true) => Some(TokenKind::Ge),
            (2, false) => Some(TokenKind::Shr),
            (2, true) => Some(TokenKind::ShrAssign),
            (3, false) => Some(TokenKind::UShr),
            (3, true) => Some(TokenKind::UShrAssign),
            _ => None,
        }
    }
}
