use crate::ast::{Expr, Stmt, StmtKind};
use crate::diagnostic::{Diagnostic, Label, Span};

use super::error::ParseError;

/// One physical line with surrounding whitespace removed and the span of
/// what is left.
#[derive(Debug, Clone, Copy)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    pub span: Span,
}

pub fn split_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in source.split_inclusive('\n') {
        let leading = raw.len() - raw.trim_start().len();
        let text = raw.trim();
        let start = offset + leading;
        lines.push(SourceLine {
            text,
            span: Span::new(start, start + text.len()),
        });
        offset += raw.len();
    }
    lines
}

pub struct ParseOutput {
    pub statements: Vec<Stmt>,
    /// Non-fatal findings, such as a block that runs to end of input.
    pub warnings: Vec<Diagnostic>,
}

/// Parses a whole program. Fails on the first malformed line.
pub fn parse_program(source: &str) -> Result<ParseOutput, ParseError> {
    let mut parser = LineParser::new(split_lines(source));
    let statements = parser.parse()?;
    tracing::debug!(
        statements = statements.len(),
        warnings = parser.warnings.len(),
        "parsed program"
    );
    Ok(ParseOutput {
        statements,
        warnings: parser.warnings,
    })
}

/// Single forward pass over lines; `carve` and `spin` headers pull their
/// body lines out and hand them to a nested parser.
pub struct LineParser<'a> {
    lines: Vec<SourceLine<'a>>,
    current: usize,
    warnings: Vec<Diagnostic>,
}

impl<'a> LineParser<'a> {
    pub fn new(lines: Vec<SourceLine<'a>>) -> Self {
        Self {
            lines,
            current: 0,
            warnings: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&SourceLine<'a>> {
        self.lines.get(self.current)
    }

    fn advance(&mut self) -> Option<SourceLine<'a>> {
        let line = self.lines.get(self.current).copied();
        if line.is_some() {
            self.current += 1;
        }
        line
    }

    pub fn parse(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while let Some(line) = self.advance() {
            if let Some(kind) = self.parse_line(line)? {
                statements.push(Stmt::new(kind, line.span));
            }
        }
        Ok(statements)
    }

    fn parse_line(&mut self, line: SourceLine<'a>) -> Result<Option<StmtKind>, ParseError> {
        let text = line.text;

        if let Some(rest) = strip_keyword(text, "trick") {
            return parse_declaration(rest, line).map(Some);
        }

        if text.contains('=') && text.ends_with(';') {
            if let Some((name, value)) = split_binding(text) {
                return Ok(Some(StmtKind::Assign {
                    name: name.to_string(),
                    value: Expr::parse(value),
                }));
            }
        }

        if strip_keyword(text, "shout").is_some() {
            let message = paren_contents(line, "shout")?;
            return Ok(Some(StmtKind::Print(Expr::parse(message))));
        }

        if strip_keyword(text, "carve").is_some() {
            let condition = Expr::parse(paren_contents(line, "carve")?);
            let body = self.parse_block(line)?;
            return Ok(Some(StmtKind::If { condition, body }));
        }

        if strip_keyword(text, "spin").is_some() {
            let header = paren_contents(line, "spin")?;
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() != 2 || parts[1] != "times" {
                return Err(ParseError::invalid_spin(text, line.span));
            }
            let count = Expr::parse(parts[0]);
            let body = self.parse_block(line)?;
            return Ok(Some(StmtKind::Loop { count, body }));
        }

        if strip_keyword(text, "bail").is_some() {
            let message = paren_contents(line, "bail")?.trim();
            return Ok(Some(StmtKind::Throw(Expr::parse(message))));
        }

        match text {
            "strap_in" | "unstrap" | "{" | "}" | "" => Ok(None),
            _ => Err(ParseError::unknown_statement(text, line.span)),
        }
    }

    /// Collects the lines of a block following `header` and parses them.
    ///
    /// Lines that are solely `{` right after the header are skipped. Depth
    /// only moves on lines whose whole trimmed text is one brace; the block
    /// ends when depth returns to zero, and the closing `}` is not part of it.
    fn parse_block(&mut self, header: SourceLine<'a>) -> Result<Vec<Stmt>, ParseError> {
        while self.peek().is_some_and(|line| line.text == "{") {
            self.current += 1;
        }

        let mut depth = 1usize;
        let mut body = Vec::new();
        let mut closed = false;
        while let Some(line) = self.advance() {
            match line.text {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                closed = true;
                break;
            }
            body.push(line);
        }

        if !closed {
            self.warnings.push(
                Diagnostic::warning("block is never closed")
                    .with_code("W0101")
                    .with_label(Label::primary(header.span, "block opened here"))
                    .with_note("the block runs to the end of the input"),
            );
        }

        let mut nested = LineParser::new(body);
        let statements = nested.parse()?;
        self.warnings.append(&mut nested.warnings);
        Ok(statements)
    }
}

fn is_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// `Some(rest)` when `text` starts with `keyword` as a whole word.
fn strip_keyword<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

/// Splits `name = value;` at the first `=`, dropping trailing semicolons.
/// `None` when the left-hand side is not a bare name.
fn split_binding(text: &str) -> Option<(&str, &str)> {
    let (name, value) = text.split_once('=')?;
    let name = name.trim();
    if !is_name(name) {
        return None;
    }
    Some((name, value.trim().trim_end_matches(';')))
}

fn parse_declaration(rest: &str, line: SourceLine<'_>) -> Result<StmtKind, ParseError> {
    match split_binding(rest) {
        // Declarations re-join the right-hand side word by word, so runs of
        // whitespace collapse to one space, inside string literals too.
        Some((name, value)) => Ok(StmtKind::Declare {
            name: name.to_string(),
            value: Expr::parse(&value.split_whitespace().collect::<Vec<_>>().join(" ")),
        }),
        None => Err(ParseError::new(
            format!("Invalid trick declaration: {}", line.text),
            line.span,
        )
        .with_help("declare a variable as `trick <name> = <expr>;`")),
    }
}

/// Text between the first `(` and the last `)` of the line.
fn paren_contents<'t>(line: SourceLine<'t>, keyword: &str) -> Result<&'t str, ParseError> {
    let text = line.text;
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if open < close => Ok(&text[open + 1..close]),
        _ => Err(ParseError::new(
            format!("Expected `(...)` after `{}`: {}", keyword, text),
            line.span,
        )
        .with_help(format!("write it as `{}(<expr>)`", keyword))),
    }
}
