use owo_colors::OwoColorize;
use std::fmt;

/// A source span representing a range of bytes in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A label pointing to a specific span in the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A complete diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message)
    }

    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes 1-based line and column from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_text(source: &str, line_num: usize) -> &str {
    source
        .split('\n')
        .nth(line_num.saturating_sub(1))
        .map(|line| line.trim_end_matches('\r'))
        .unwrap_or("")
}

/// Renders diagnostics in a rustc-like layout
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        self.render_header(&mut output, diagnostic);

        let located: Vec<(&Label, usize, usize)> = diagnostic
            .labels
            .iter()
            .filter(|label| !label.span.is_dummy())
            .map(|label| {
                let (line, col) = line_col(self.source, label.span.start);
                (label, line, col)
            })
            .collect();

        if let Some((_, line, col)) = located.first() {
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.blue("-->"),
                self.file_name,
                line,
                col
            ));

            let width = located
                .iter()
                .map(|(_, line, _)| line.to_string().len())
                .max()
                .unwrap_or(1);
            let gutter = format!("{} {}", " ".repeat(width + 1), self.blue("|"));

            output.push_str(&gutter);
            output.push('\n');
            for (label, line, col) in &located {
                self.render_label(&mut output, label, *line, *col, width, &gutter);
            }
            output.push_str(&gutter);
            output.push('\n');
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => self.red_bold("error"),
            Severity::Warning => self.yellow_bold("warning"),
        };
        match &diagnostic.code {
            Some(code) => output.push_str(&format!(
                "{}[{}]: {}\n",
                severity,
                code,
                self.bold(&diagnostic.message)
            )),
            None => output.push_str(&format!("{}: {}\n", severity, self.bold(&diagnostic.message))),
        }
    }

    fn render_label(
        &self,
        output: &mut String,
        label: &Label,
        line: usize,
        col: usize,
        width: usize,
        gutter: &str,
    ) {
        let content = line_text(self.source, line);
        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.blue(&line.to_string()),
            self.blue("|"),
            content,
            width = width + 1
        ));

        let span_chars = self
            .source
            .get(label.span.start..label.span.end)
            .map(|s| s.chars().count())
            .unwrap_or(1)
            .max(1);
        let underline = format!("{}{}", " ".repeat(col - 1), "^".repeat(span_chars));
        output.push_str(&format!("{} {}", gutter, self.red(&underline)));
        if !label.message.is_empty() {
            output.push(' ');
            output.push_str(&self.red(&label.message));
        }
        output.push('\n');
    }

    fn red(&self, s: &str) -> String {
        if self.use_color {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn red_bold(&self, s: &str) -> String {
        if self.use_color {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn yellow_bold(&self, s: &str) -> String {
        if self.use_color {
            s.yellow().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn blue(&self, s: &str) -> String {
        if self.use_color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.use_color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Render multiple diagnostics followed by an abort summary when any is an error
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if error_count > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "strap_in\ntrick x = 5;";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 9), (2, 1));
        assert_eq!(line_col(source, 15), (2, 7));
    }

    #[test]
    fn test_diagnostic_rendering() {
        let source = "strap_in\n  yell(1)\nunstrap\n";
        let diagnostic = Diagnostic::error("unknown statement `yell(1)`")
            .with_code("E0101")
            .with_label(Label::primary(Span::new(11, 18), "not a statement"))
            .with_help("statements start with trick, shout, carve, spin or bail");

        let output = DiagnosticRenderer::new(source, "main.shd", false).render(&diagnostic);

        assert!(output.contains("error[E0101]: unknown statement `yell(1)`"));
        assert!(output.contains("main.shd:2:3"));
        assert!(output.contains("  yell(1)"));
        assert!(output.contains("^^^^^^^ not a statement"));
        assert!(output.contains("= help: statements start with"));
    }

    #[test]
    fn test_dummy_span_has_no_locator() {
        let diagnostic = Diagnostic::error("output stream closed");
        let output = DiagnosticRenderer::new("", "main.shd", false).render(&diagnostic);
        assert_eq!(output, "error: output stream closed\n");
    }

    #[test]
    fn test_summary_counts_errors_only() {
        let diagnostics = vec![
            Diagnostic::warning("block never closed"),
            Diagnostic::error("bad"),
        ];
        let output = render_diagnostics("", "main.shd", &diagnostics, false);
        assert!(output.contains("warning: block never closed"));
        assert!(output.ends_with("error: aborting due to 1 error\n"));

        let only_warning = render_diagnostics("", "main.shd", &diagnostics[..1], false);
        assert!(!only_warning.contains("aborting"));
    }
}
