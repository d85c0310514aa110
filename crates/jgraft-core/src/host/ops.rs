//! Operator, literal and primitive-type tags with the operator precedence table

/// Operator precedence levels used by the printer
pub mod prec {
    /// Statement context: declarations end with `;`
    pub const NOT_EXPRESSION: i32 = -1;
    pub const NONE: i32 = 0;
    pub const ASSIGN: i32 = 1;
    pub const ASSIGN_OP: i32 = 2;
    pub const COND: i32 = 3;
    pub const OR: i32 = 4;
    pub const AND: i32 = 5;
    pub const BIT_OR: i32 = 6;
    pub const BIT_XOR: i32 = 7;
    pub const BIT_AND: i32 = 8;
    pub const EQ: i32 = 9;
    pub const ORD: i32 = 10;
    pub const SHIFT: i32 = 11;
    pub const ADD: i32 = 12;
    pub const MUL: i32 = 13;
    pub const PREFIX: i32 = 14;
    pub const POSTFIX: i32 = 15;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
}

const BINARY_SYMBOLS: &[(BinaryOp, &str)] = &[
    (BinaryOp::Or, "||"),
    (BinaryOp::And, "&&"),
    (BinaryOp::BitOr, "|"),
    (BinaryOp::BitXor, "^"),
    (BinaryOp::BitAnd, "&"),
    (BinaryOp::Eq, "=="),
    (BinaryOp::Ne, "!="),
    (BinaryOp::Lt, "<"),
    (BinaryOp::Gt, ">"),
    (BinaryOp::Le, "<="),
    (BinaryOp::Ge, ">="),
    (BinaryOp::Shl, "<<"),
    (BinaryOp::Shr, ">>"),
    (BinaryOp::UShr, ">>>"),
    (BinaryOp::Plus, "+"),
    (BinaryOp::Minus, "-"),
    (BinaryOp::Mul, "*"),
    (BinaryOp::Div, "/"),
    (BinaryOp::Mod, "%"),
];

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        BINARY_SYMBOLS
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, symbol)| *symbol)
            .unwrap_or("?")
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        BINARY_SYMBOLS
            .iter()
            .find(|(_, s)| *s == symbol)
            .map(|(op, _)| *op)
    }

    /// Compound assignment operator such as `+=`
    pub fn from_assign_symbol(symbol: &str) -> Option<Self> {
        symbol.strip_suffix('=').and_then(Self::from_symbol)
    }

    pub fn precedence(self) -> i32 {
        match self {
            BinaryOp::Or => prec::OR,
            BinaryOp::And => prec::AND,
            BinaryOp::BitOr => prec::BIT_OR,
            BinaryOp::BitXor => prec::BIT_XOR,
            BinaryOp::BitAnd => prec::BIT_AND,
            BinaryOp::Eq | BinaryOp::Ne => prec::EQ,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => prec::ORD,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => prec::SHIFT,
            BinaryOp::Plus | BinaryOp::Minus => prec::ADD,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => prec::MUL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    Compl,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Compl => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn prefix_from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(UnaryOp::Pos),
            "-" => Some(UnaryOp::Neg),
            "!" => Some(UnaryOp::Not),
            "~" => Some(UnaryOp::Compl),
            "++" => Some(UnaryOp::PreInc),
            "--" => Some(UnaryOp::PreDec),
            _ => None,
        }
    }

    pub fn is_prefix(self) -> bool {
        !matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }

    pub fn precedence(self) -> i32 {
        if self.is_prefix() {
            prec::PREFIX
        } else {
            prec::POSTFIX
        }
    }
}

/// Literal tags; numeric literals keep their source spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Boolean,
    Void,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "byte" => PrimitiveKind::Byte,
            "short" => PrimitiveKind::Short,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "char" => PrimitiveKind::Char,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            "boolean" => PrimitiveKind::Boolean,
            "void" => PrimitiveKind::Void,
            _ => return None,
        })
    }
}

/// Wildcard bound kinds in type arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Unbound,
    Extends,
    Super,
}

impl BoundKind {
    /// Source prefix printed before the bound
    pub fn prefix(self) -> &'static str {
        match self {
            BoundKind::Unbound => "?",
            BoundKind::Extends => "? extends ",
            BoundKind::Super => "? super ",
        }
    }
}

/// How lambda parameters were written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LambdaParams {
    /// `x -> ...`
    Bare,
    /// `(x, y) -> ...`
    Inferred,
    /// `(int x, int y) -> ...`
    Explicit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_table() {
        assert_eq!(BinaryOp::from_symbol(">>>"), Some(BinaryOp::UShr));
        assert_eq!(BinaryOp::from_assign_symbol("<<="), Some(BinaryOp::Shl));
        assert_eq!(BinaryOp::Mul.symbol(), "*");
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Plus.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn test_unary_fixity() {
        assert!(UnaryOp::Neg.is_prefix());
        assert!(!UnaryOp::PostInc.is_prefix());
        assert_eq!(UnaryOp::PostDec.precedence(), prec::POSTFIX);
    }
}
