use crate::diagnostic::{Diagnostic, Label, Span};

/// A fatal problem found while reading the program. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn unknown_statement(line: &str, span: Span) -> Self {
        Self::new(format!("Unknown statement: {}", line), span)
            .with_help("statements start with trick, shout, carve, spin or bail, or assign with `name = expr;`")
    }

    pub fn invalid_spin(line: &str, span: Span) -> Self {
        Self::new(format!("Invalid spin statement syntax: {}", line), span)
            .with_help("write the loop header as `spin(<count> times)`")
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.message.clone())
            .with_code("E0101")
            .with_label(Label::primary(self.span, ""));
        match &self.help {
            Some(help) => diag.with_help(help.clone()),
            None => diag,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Runtime faults raised while evaluating expressions or executing statements.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpreterError {
    UnknownToken { token: String, span: Span },
    InvalidExpression { expression: String, span: Span },
    UndeclaredVariable { name: String, span: Span },
    TypeError { message: String, span: Span },
    LoopCountNotInteger { found: String, span: Span },
    ArithmeticOverflow { message: String, span: Span },
    Output { message: String, span: Span },
}

impl InterpreterError {
    pub fn unknown_token(token: impl Into<String>) -> Self {
        Self::UnknownToken { token: token.into(), span: Span::dummy() }
    }

    pub fn invalid_expression(expression: impl Into<String>) -> Self {
        Self::InvalidExpression { expression: expression.into(), span: Span::dummy() }
    }

    pub fn undeclared_variable(name: impl Into<String>) -> Self {
        Self::UndeclaredVariable { name: name.into(), span: Span::dummy() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into(), span: Span::dummy() }
    }

    pub fn loop_count_not_integer(found: impl Into<String>) -> Self {
        Self::LoopCountNotInteger { found: found.into(), span: Span::dummy() }
    }

    pub fn arithmetic_overflow(message: impl Into<String>) -> Self {
        Self::ArithmeticOverflow { message: message.into(), span: Span::dummy() }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output { message: message.into(), span: Span::dummy() }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnknownToken { span, .. }
            | Self::InvalidExpression { span, .. }
            | Self::UndeclaredVariable { span, .. }
            | Self::TypeError { span, .. }
            | Self::LoopCountNotInteger { span, .. }
            | Self::ArithmeticOverflow { span, .. }
            | Self::Output { span, .. } => *span,
        }
    }

    /// Pins the error to `at` unless it already points somewhere.
    pub fn at(mut self, at: Span) -> Self {
        let span = match &mut self {
            Self::UnknownToken { span, .. }
            | Self::InvalidExpression { span, .. }
            | Self::UndeclaredVariable { span, .. }
            | Self::TypeError { span, .. }
            | Self::LoopCountNotInteger { span, .. }
            | Self::ArithmeticOverflow { span, .. }
            | Self::Output { span, .. } => span,
        };
        if span.is_dummy() {
            *span = at;
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self {
            Self::UnknownToken { .. } => ("E0201", "while evaluating this statement"),
            Self::InvalidExpression { .. } => ("E0202", "expression has no operator to apply"),
            Self::UndeclaredVariable { .. } => ("E0203", "declare it first with `trick`"),
            Self::TypeError { .. } => ("E0204", "operands do not fit the operator"),
            Self::LoopCountNotInteger { .. } => ("E0205", "loop count evaluated here"),
            Self::ArithmeticOverflow { .. } => ("E0206", "result does not fit in 64 bits"),
            Self::Output { .. } => ("E0207", "while printing"),
        };
        Diagnostic::error(self.to_string())
            .with_code(code)
            .with_label(Label::primary(self.span(), label))
    }
}

impl std::fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownToken { token, .. } => write!(f, "Unknown token: {}", token),
            Self::InvalidExpression { expression, .. } => {
                write!(f, "Invalid expression: {}", expression)
            }
            Self::UndeclaredVariable { name, .. } => {
                write!(f, "Variable '{}' is not declared", name)
            }
            Self::TypeError { message, .. } => write!(f, "Type error: {}", message),
            Self::LoopCountNotInteger { found, .. } => {
                write!(f, "Loop count must be an integer. Got: {}", found)
            }
            Self::ArithmeticOverflow { message, .. } => {
                write!(f, "Arithmetic overflow: {}", message)
            }
            Self::Output { message, .. } => write!(f, "Failed to write output: {}", message),
        }
    }
}

impl std::error::Error for InterpreterError {}

/// The message of a `bail` that escaped every enclosing block.
#[derive(Debug, Clone, PartialEq)]
pub struct Thrown {
    pub message: String,
    pub span: Span,
}

impl std::fmt::Display for Thrown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything that can end a run early. The driver reports `Thrown` as
/// ordinary output and treats the other two as abnormal termination.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Parse(ParseError),
    Eval(InterpreterError),
    Thrown(Thrown),
}

impl RunError {
    pub fn is_thrown(&self) -> bool {
        matches!(self, RunError::Thrown(_))
    }

    /// `None` for a thrown message, which is output rather than a fault.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            RunError::Parse(e) => Some(e.to_diagnostic()),
            RunError::Eval(e) => Some(e.to_diagnostic()),
            RunError::Thrown(_) => None,
        }
    }
}

impl From<ParseError> for RunError {
    fn from(e: ParseError) -> Self {
        RunError::Parse(e)
    }
}

impl From<InterpreterError> for RunError {
    fn from(e: InterpreterError) -> Self {
        RunError::Eval(e)
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Parse(e) => write!(f, "Parse error: {}", e),
            RunError::Eval(e) => write!(f, "Runtime error: {}", e),
            RunError::Thrown(t) => write!(f, "{}", t),
        }
    }
}

impl std::error::Error for RunError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_keeps_existing_span() {
        let pinned = InterpreterError::unknown_token("y").at(Span::new(4, 9));
        assert_eq!(pinned.span(), Span::new(4, 9));
        assert_eq!(pinned.at(Span::new(20, 30)).span(), Span::new(4, 9));
    }

    #[test]
    fn test_messages() {
        assert_eq!(InterpreterError::unknown_token("ghost").to_string(), "Unknown token: ghost");
        assert_eq!(
            InterpreterError::undeclared_variable("x").to_string(),
            "Variable 'x' is not declared"
        );
    }

    #[test]
    fn test_only_thrown_has_no_diagnostic() {
        let thrown = RunError::Thrown(Thrown { message: "stop".into(), span: Span::dummy() });
        assert!(thrown.is_thrown());
        assert!(thrown.to_diagnostic().is_none());
        assert_eq!(thrown.to_string(), "stop");

        let fault: RunError = InterpreterError::type_error("bad").into();
        assert!(!fault.is_thrown());
        assert_eq!(fault.to_diagnostic().map(|d| d.code), Some(Some("E0204".to_string())));
    }
}
