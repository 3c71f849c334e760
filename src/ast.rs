use std::fmt;

use crate::diagnostic::Span;
use crate::lexer::tokenize;
use crate::token::Token;

/// An expression as written: its tokens, produced once at parse time and
/// re-evaluated every time the owning statement runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expr {
    pub tokens: Vec<Token>,
}

impl Expr {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn parse(text: &str) -> Self {
        Self::new(tokenize(text))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.tokens.iter().map(|t| t.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// The source line the statement was read from.
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `trick name = expr;` binds or overwrites.
    Declare { name: String, value: Expr },
    /// `name = expr;` overwrites an existing binding only.
    Assign { name: String, value: Expr },
    /// `shout(expr)`
    Print(Expr),
    /// `carve(expr) { ... }`
    If { condition: Expr, body: Vec<Stmt> },
    /// `spin(count times) { ... }`
    Loop { count: Expr, body: Vec<Stmt> },
    /// `bail(expr)`
    Throw(Expr),
}

impl StmtKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            StmtKind::Declare { .. } => "trick",
            StmtKind::Assign { .. } => "assignment",
            StmtKind::Print(_) => "shout",
            StmtKind::If { .. } => "carve",
            StmtKind::Loop { .. } => "spin",
            StmtKind::Throw(_) => "bail",
        }
    }
}
