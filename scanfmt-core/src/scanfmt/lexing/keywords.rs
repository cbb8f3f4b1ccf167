//! Keyword and operator tables
//!
//! The keyword matcher branches on the span length, then on the first one or two
//! characters, and only then compares the whole candidate. There is no hash table and no
//! allocation, so the scanner can call it on every identifier it finishes.
//!
//! Two entry points exist, one over a character span (what the scanner has in its window)
//! and one over a string. They agree on every input: a span that contains a non-ASCII
//! character is never a keyword.

/// Java reserved words, including the literals `true`, `false` and `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Keyword {
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    False,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Null,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    True,
    Try,
    Void,
    Volatile,
    While,
}

impl Keyword {
    pub const ALL: [Keyword; 53] = [
        Keyword::Abstract,
        Keyword::Assert,
        Keyword::Boolean,
        Keyword::Break,
        Keyword::Byte,
        Keyword::Case,
        Keyword::Catch,
        Keyword::Char,
        Keyword::Class,
        Keyword::Const,
        Keyword::Continue,
        Keyword::Default,
        Keyword::Do,
        Keyword::Double,
        Keyword::Else,
        Keyword::Enum,
        Keyword::Extends,
        Keyword::False,
        Keyword::Final,
        Keyword::Finally,
        Keyword::Float,
        Keyword::For,
        Keyword::Goto,
        Keyword::If,
        Keyword::Implements,
        Keyword::Import,
        Keyword::Instanceof,
        Keyword::Int,
        Keyword::Interface,
        Keyword::Long,
        Keyword::Native,
        Keyword::New,
        Keyword::Null,
        Keyword::Package,
        Keyword::Private,
        Keyword::Protected,
        Keyword::Public,
        Keyword::Return,
        Keyword::Short,
        Keyword::Static,
        Keyword::Strictfp,
        Keyword::Super,
        Keyword::Switch,
        Keyword::Synchronized,
        Keyword::This,
        Keyword::Throw,
        Keyword::Throws,
        Keyword::Transient,
        Keyword::True,
        Keyword::Try,
        Keyword::Void,
        Keyword::Volatile,
        Keyword::While,
    ];

    /// Small stable code, used as the token helper.
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Keyword> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Abstract => "abstract",
            Keyword::Assert => "assert",
            Keyword::Boolean => "boolean",
            Keyword::Break => "break",
            Keyword::Byte => "byte",
            Keyword::Case => "case",
            Keyword::Catch => "catch",
            Keyword::Char => "char",
            Keyword::Class => "class",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Default => "default",
            Keyword::Do => "do",
            Keyword::Double => "double",
            Keyword::Else => "else",
            Keyword::Enum => "enum",
            Keyword::Extends => "extends",
            Keyword::False => "false",
            Keyword::Final => "final",
            Keyword::Finally => "finally",
            Keyword::Float => "float",
            Keyword::For => "for",
            Keyword::Goto => "goto",
            Keyword::If => "if",
            Keyword::Implements => "implements",
            Keyword::Import => "import",
            Keyword::Instanceof => "instanceof",
            Keyword::Int => "int",
            Keyword::Interface => "interface",
            Keyword::Long => "long",
            Keyword::Native => "native",
            Keyword::New => "new",
            Keyword::Null => "null",
            Keyword::Package => "package",
            Keyword::Private => "private",
            Keyword::Protected => "protected",
            Keyword::Public => "public",
            Keyword::Return => "return",
            Keyword::Short => "short",
            Keyword::Static => "static",
            Keyword::Strictfp => "strictfp",
            Keyword::Super => "super",
            Keyword::Switch => "switch",
            Keyword::Synchronized => "synchronized",
            Keyword::This => "this",
            Keyword::Throw => "throw",
            Keyword::Throws => "throws",
            Keyword::Transient => "transient",
            Keyword::True => "true",
            Keyword::Try => "try",
            Keyword::Void => "void",
            Keyword::Volatile => "volatile",
            Keyword::While => "while",
        }
    }
}

/// Keyword spelled by a character span, if any.
pub fn match_keyword(span: &[char]) -> Option<Keyword> {
    classify(span.len(), |i| ascii_byte(span[i]))
}

/// Same as [`match_keyword`] over a string.
pub fn match_keyword_str(text: &str) -> Option<Keyword> {
    if !text.is_ascii() {
        return None;
    }
    let bytes = text.as_bytes();
    classify(bytes.len(), |i| bytes[i])
}

fn ascii_byte(ch: char) -> u8 {
    if ch.is_ascii() {
        ch as u8
    } else {
        0
    }
}

fn classify(len: usize, at: impl Fn(usize) -> u8) -> Option<Keyword> {
    use Keyword::*;

    if len < 2 {
        return None;
    }
    let candidate = match len {
        2 => match at(0) {
            b'd' => Do,
            b'i' => If,
            _ => return None,
        },
        3 => match at(0) {
            b'f' => For,
            b'i' => Int,
            b'n' => New,
            b't' => Try,
            _ => return None,
        },
        4 => match (at(0), at(1)) {
            (b'b', _) => Byte,
            (b'c', b'a') => Case,
            (b'c', b'h') => Char,
            (b'e', b'l') => Else,
            (b'e', b'n') => Enum,
            (b'g', _) => Goto,
            (b'l', _) => Long,
            (b'n', _) => Null,
            (b't', b'h') => This,
            (b't', b'r') => True,
            (b'v', _) => Void,
            _ => return None,
        },
        5 => match (at(0), at(1)) {
            (b'b', _) => Break,
            (b'c', b'a') => Catch,
            (b'c', b'l') => Class,
            (b'c', b'o') => Const,
            (b'f', b'a') => False,
            (b'f', b'i') => Final,
            (b'f', b'l') => Float,
            (b's', b'h') => Short,
            (b's', b'u') => Super,
            (b't', _) => Throw,
            (b'w', _) => While,
            _ => return None,
        },
        6 => match (at(0), at(1)) {
            (b'a', _) => Assert,
            (b'd', _) => Double,
            (b'i', _) => Import,
            (b'n', _) => Native,
            (b'p', _) => Public,
            (b'r', _) => Return,
            (b's', b't') => Static,
            (b's', b'w') => Switch,
            (b't', _) => Throws,
            _ => return None,
        },
        7 => match (at(0), at(1)) {
            (b'b', _) => Boolean,
            (b'd', _) => Default,
            (b'e', _) => Extends,
            (b'f', _) => Finally,
            (b'p', b'a') => Package,
            (b'p', b'r') => Private,
            _ => return None,
        },
        8 => match at(0) {
            b'a' => Abstract,
            b'c' => Continue,
            b's' => Strictfp,
            b'v' => Volatile,
            _ => return None,
        },
        9 => match at(0) {
            b'i' => Interface,
            b'p' => Protected,
            b't' => Transient,
            _ => return None,
        },
        10 => match (at(0), at(1)) {
            (b'i', b'm') => Implements,
            (b'i', b'n') => Instanceof,
            _ => return None,
        },
        12 => Synchronized,
        _ => return None,
    };

    let spelled = candidate.as_str().as_bytes();
    if spelled.iter().enumerate().all(|(i, b)| at(i) == *b) {
        Some(candidate)
    } else {
        None
    }
}

/// Java operators and separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Not,
    Tilde,
    Question,
    Colon,
    EqEq,
    LtEq,
    GtEq,
    NotEq,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Slash,
    And,
    Or,
    Xor,
    Percent,
    LShift,
    RShift,
    RUShift,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    AndEq,
    OrEq,
    XorEq,
    PercentEq,
    LShiftEq,
    RShiftEq,
    RUShiftEq,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,
}

impl Operator {
    pub const ALL: [Operator; 46] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::Not,
        Operator::Tilde,
        Operator::Question,
        Operator::Colon,
        Operator::EqEq,
        Operator::LtEq,
        Operator::GtEq,
        Operator::NotEq,
        Operator::AndAnd,
        Operator::OrOr,
        Operator::PlusPlus,
        Operator::MinusMinus,
        Operator::Plus,
        Operator::Minus,
        Operator::Star,
        Operator::Slash,
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Percent,
        Operator::LShift,
        Operator::RShift,
        Operator::RUShift,
        Operator::PlusEq,
        Operator::MinusEq,
        Operator::StarEq,
        Operator::SlashEq,
        Operator::AndEq,
        Operator::OrEq,
        Operator::XorEq,
        Operator::PercentEq,
        Operator::LShiftEq,
        Operator::RShiftEq,
        Operator::RUShiftEq,
        Operator::LParen,
        Operator::RParen,
        Operator::LBracket,
        Operator::RBracket,
        Operator::LBrace,
        Operator::RBrace,
        Operator::Semicolon,
        Operator::Comma,
        Operator::Dot,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Operator> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Not => "!",
            Operator::Tilde => "~",
            Operator::Question => "?",
            Operator::Colon => ":",
            Operator::EqEq => "==",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::NotEq => "!=",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::PlusPlus => "++",
            Operator::MinusMinus => "--",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::And => "&",
            Operator::Or => "|",
            Operator::Xor => "^",
            Operator::Percent => "%",
            Operator::LShift => "<<",
            Operator::RShift => ">>",
            Operator::RUShift => ">>>",
            Operator::PlusEq => "+=",
            Operator::MinusEq => "-=",
            Operator::StarEq => "*=",
            Operator::SlashEq => "/=",
            Operator::AndEq => "&=",
            Operator::OrEq => "|=",
            Operator::XorEq => "^=",
            Operator::PercentEq => "%=",
            Operator::LShiftEq => "<<=",
            Operator::RShiftEq => ">>=",
            Operator::RUShiftEq => ">>>=",
            Operator::LParen => "(",
            Operator::RParen => ")",
            Operator::LBracket => "[",
            Operator::RBracket => "]",
            Operator::LBrace => "{",
            Operator::RBrace => "}",
            Operator::Semicolon => ";",
            Operator::Comma => ",",
            Operator::Dot => ".",
        }
    }

    /// Operator for a single separator or operator character.
    pub(crate) fn from_char(ch: char) -> Option<Operator> {
        let op = match ch {
            '=' => Operator::Eq,
            '>' => Operator::Gt,
            '<' => Operator::Lt,
            '!' => Operator::Not,
            '~' => Operator::Tilde,
            '?' => Operator::Question,
            ':' => Operator::Colon,
            '+' => Operator::Plus,
            '-' => Operator::Minus,
            '*' => Operator::Star,
            '/' => Operator::Slash,
            '&' => Operator::And,
            '|' => Operator::Or,
            '^' => Operator::Xor,
            '%' => Operator::Percent,
            '(' => Operator::LParen,
            ')' => Operator::RParen,
            '[' => Operator::LBracket,
            ']' => Operator::RBracket,
            '{' => Operator::LBrace,
            '}' => Operator::RBrace,
            ';' => Operator::Semicolon,
            ',' => Operator::Comma,
            '.' => Operator::Dot,
            _ => return None,
        };
        Some(op)
    }
}

/// Operator spelled exactly by `text`.
pub fn match_operator(text: &str) -> Option<Operator> {
    Operator::ALL.iter().copied().find(|op| op.as_str() == text)
}
