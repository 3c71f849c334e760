use std::fmt;

/// Operators the evaluator knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    Eq,
    NotEq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Greater => ">",
            BinaryOp::Less => "<",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::LessEq => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Literals and Identifiers
    Integer(i64),
    /// Quote-delimited literal, quotes already stripped.
    String(String),
    Ident(String),

    Operator(BinaryOp),

    // Lexed but never interpreted
    Star,
    Slash,
    LParen,
    RParen,
    Assign,
    Bang,
}

impl Token {
    /// Classifies a word or quoted lexeme the way the evaluator reads single tokens:
    /// all-digit text is an integer, quote-delimited text is a string, anything else a name.
    pub fn from_lexeme(text: &str) -> Token {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = text.parse() {
                return Token::Integer(n);
            }
        }
        if text.starts_with('"') && text.ends_with('"') {
            let inner = if text.len() >= 2 { &text[1..text.len() - 1] } else { "" };
            return Token::String(inner.to_string());
        }
        Token::Ident(text.to_string())
    }

    pub fn as_operator(&self) -> Option<BinaryOp> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Ident(name) => f.write_str(name),
            Token::Operator(op) => f.write_str(op.symbol()),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Assign => f.write_str("="),
            Token::Bang => f.write_str("!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lexeme() {
        assert_eq!(Token::from_lexeme("42"), Token::Integer(42));
        assert_eq!(Token::from_lexeme("\"hi there\""), Token::String("hi there".into()));
        assert_eq!(Token::from_lexeme("\""), Token::String(String::new()));
        assert_eq!(Token::from_lexeme("x1"), Token::Ident("x1".into()));
        assert_eq!(
            Token::from_lexeme("99999999999999999999"),
            Token::Ident("99999999999999999999".into())
        );
    }

    #[test]
    fn test_display_round_trips_source_text() {
        let tokens = [
            Token::String("a b".into()),
            Token::Operator(BinaryOp::NotEq),
            Token::Star,
            Token::Integer(7),
        ];
        let text: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(text, vec!["\"a b\"", "!=", "*", "7"]);
    }

    #[test]
    fn test_only_binary_ops_are_operators() {
        assert_eq!(Token::Operator(BinaryOp::Add).as_operator(), Some(BinaryOp::Add));
        assert_eq!(Token::Slash.as_operator(), None);
    }
}
