use crate::error::LexError;
use tiger_ast::ast::BinOp;
use tiger_ast::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    // keywords
    Array,
    If,
    Then,
    Else,
    While,
    For,
    To,
    Do,
    Let,
    In,
    End,
    Of,
    Break,
    Nil,
    Function,
    Var,
    Type,
    Import,
    Primitive,
    // object-oriented keywords
    Class,
    Extends,
    Method,
    New,
    // symbols
    Comma,
    Colon,
    Semi,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Assign,
    // structural
    Space,
    Eol,
    Str,
    Comment,
    Ident,
    Num,
    Invalid,
}

/// Keyword text to tag. Every entry's tag names itself back via [`Tag::name`].
pub const KEYWORDS: &[(&str, Tag)] = &[
    ("array", Tag::Array),
    ("if", Tag::If),
    ("then", Tag::Then),
    ("else", Tag::Else),
    ("while", Tag::While),
    ("for", Tag::For),
    ("to", Tag::To),
    ("do", Tag::Do),
    ("let", Tag::Let),
    ("in", Tag::In),
    ("end", Tag::End),
    ("of", Tag::Of),
    ("break", Tag::Break),
    ("nil", Tag::Nil),
    ("function", Tag::Function),
    ("var", Tag::Var),
    ("type", Tag::Type),
    ("import", Tag::Import),
    ("primitive", Tag::Primitive),
    ("class", Tag::Class),
    ("extends", Tag::Extends),
    ("method", Tag::Method),
    ("new", Tag::New),
];

impl Tag {
    pub fn keyword(text: &str) -> Option<Tag> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|&(_, tag)| tag)
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|&(_, tag)| tag == self)
    }

    /// Display name used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Array => "ARRAY",
            Tag::If => "IF",
            Tag::Then => "THEN",
            Tag::Else => "ELSE",
            Tag::While => "WHILE",
            Tag::For => "FOR",
            Tag::To => "TO",
            Tag::Do => "DO",
            Tag::Let => "LET",
            Tag::In => "IN",
            Tag::End => "END",
            Tag::Of => "OF",
            Tag::Break => "BREAK",
            Tag::Nil => "NIL",
            Tag::Function => "FUNCTION",
            Tag::Var => "VAR",
            Tag::Type => "TYPE",
            Tag::Import => "IMPORT",
            Tag::Primitive => "PRIMITIVE",
            Tag::Class => "CLASS",
            Tag::Extends => "EXTENDS",
            Tag::Method => "METHOD",
            Tag::New => "NEW",
            Tag::Comma => "COMMA",
            Tag::Colon => "COLON",
            Tag::Semi => "SEMI",
            Tag::LParen => "LPAREN",
            Tag::RParen => "RPAREN",
            Tag::LBracket => "LSQUB",
            Tag::RBracket => "RSQUB",
            Tag::LBrace => "LBRACE",
            Tag::RBrace => "RBRACE",
            Tag::Dot => "DOT",
            Tag::Plus => "PLUS",
            Tag::Minus => "MINUS",
            Tag::Star => "STAR",
            Tag::Slash => "DIV",
            Tag::Eq => "EQ",
            Tag::Ne => "NOT_EQUAL",
            Tag::Lt => "LESS",
            Tag::Gt => "GREATER",
            Tag::Le => "LEQ",
            Tag::Ge => "GEQ",
            Tag::And => "AND",
            Tag::Or => "OR",
            Tag::Assign => "ASSIGN",
            Tag::Space => "SPACE",
            Tag::Eol => "EOL",
            Tag::Str => "STR",
            Tag::Comment => "COMMENT",
            Tag::Ident => "ID",
            Tag::Num => "NUM",
            Tag::Invalid => "INVALID",
        }
    }

    /// Binary operator this tag denotes, if any.
    pub fn binop(self) -> Option<BinOp> {
        match self {
            Tag::Star => Some(BinOp::Mul),
            Tag::Slash => Some(BinOp::Div),
            Tag::Plus => Some(BinOp::Add),
            Tag::Minus => Some(BinOp::Sub),
            Tag::Eq => Some(BinOp::Eq),
            Tag::Ne => Some(BinOp::Ne),
            Tag::Lt => Some(BinOp::Lt),
            Tag::Le => Some(BinOp::Le),
            Tag::Gt => Some(BinOp::Gt),
            Tag::Ge => Some(BinOp::Ge),
            Tag::And => Some(BinOp::And),
            Tag::Or => Some(BinOp::Or),
            _ => None,
        }
    }

    /// Tags that open a declaration.
    pub fn starts_dec(self) -> bool {
        matches!(
            self,
            Tag::Type | Tag::Class | Tag::Function | Tag::Primitive | Tag::Import | Tag::Var
        )
    }

    /// Tags the parser drops before it starts.
    pub fn is_trivia(self) -> bool {
        matches!(self, Tag::Comment | Tag::Eol)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tok {
    pub tag: Tag,
    pub text: String,
    pub span: Span,
    /// Why an `Invalid` token is invalid. Always `None` for other tags.
    pub error: Option<LexError>,
}

impl Tok {
    pub fn new(tag: Tag, text: impl Into<String>, span: Span) -> Self {
        Self {
            tag,
            text: text.into(),
            span,
            error: None,
        }
    }

    pub fn invalid(text: impl Into<String>, span: Span, error: LexError) -> Self {
        Self {
            tag: Tag::Invalid,
            text: text.into(),
            span,
            error: Some(error),
        }
    }
}

impl std::fmt::Display for Tok {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({})", self.tag.name(), self.text)
    }
}
