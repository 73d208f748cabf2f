use crate::position::Position;
use crate::scope::{Frames, ScopeId};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// One-character span starting at `start`.
    pub fn single(start: Position) -> Self {
        let mut end = start;
        end.advance(None);
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorKind {
    InvalidCharacter,
    InvalidSyntax,
    Runtime,
}

#[derive(Debug, Clone)]
pub struct PseudoError {
    pub kind: ErrorKind,
    pub span: Span,
    pub details: Option<String>,
    /// Frame the error originated in; runtime errors walk it for tracebacks.
    pub scope: Option<ScopeId>,
}

impl PseudoError {
    pub fn new(kind: ErrorKind, span: Span, details: Option<String>) -> Self {
        Self {
            kind,
            span,
            details,
            scope: None,
        }
    }

    pub fn invalid_character(span: Span, details: String) -> Self {
        Self::new(ErrorKind::InvalidCharacter, span, Some(details))
    }

    pub fn invalid_syntax(span: Span, details: String) -> Self {
        Self::new(ErrorKind::InvalidSyntax, span, Some(details))
    }

    pub fn runtime(span: Span, details: String, scope: Option<ScopeId>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            span,
            details: Some(details),
            scope,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidCharacter => "Invalid Character Error",
            ErrorKind::InvalidSyntax => "Invalid Syntax Error",
            ErrorKind::Runtime => "Runtime Error",
        }
    }

    fn location(&self) -> String {
        format!(
            "At line: {} column: {} and ends at line: {} column: {}",
            self.span.start.line, self.span.start.column, self.span.end.line, self.span.end.column
        )
    }

    /// One line per frame, outermost first. The displayed line number is the
    /// tracked line plus one.
    fn traceback(&self, frames: &Frames) -> String {
        let mut lines = String::new();
        let mut pos = self.span.start;
        let mut at = self.scope;
        while let Some(id) = at {
            let frame = frames.get(id);
            lines = format!("Line {}, in {}\n{}", pos.line + 1, frame.name, lines);
            if let Some(entry) = frame.entry_pos {
                pos = entry;
            }
            at = frame.parent;
        }
        lines
    }

    /// The plain-text rendering handed back through `evaluate`.
    pub fn message(&self, frames: &Frames) -> String {
        match self.kind {
            ErrorKind::Runtime => format!(
                "Traceback (most recent call last):\n{}Runtime Error: {}\n{}",
                self.traceback(frames),
                self.details.as_deref().unwrap_or_default(),
                self.location()
            ),
            _ => match &self.details {
                Some(details) => format!("{}: {}\n{}", self.label(), details, self.location()),
                None => format!("{}\n{}", self.label(), self.location()),
            },
        }
    }

    pub fn report(&self, source: &str, filename: Option<&str>, frames: &Frames) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::InvalidCharacter => Color::Red,
            ErrorKind::InvalidSyntax => Color::Yellow,
            ErrorKind::Runtime => Color::Magenta,
        };

        let details = self.details.as_deref().unwrap_or_default();

        let mut report_builder =
            Report::build(ReportKind::Error, filename, self.span.start.index)
                .with_message(format!("{}: {}", self.label().fg(color), details))
                .with_label(
                    Label::new((filename, self.span.start.index..self.span.end.index))
                        .with_message(details)
                        .with_color(color),
                );

        if self.kind == ErrorKind::Runtime && self.scope.is_some() {
            report_builder = report_builder.with_note(self.traceback(frames));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for PseudoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.label(), details),
            None => write!(f, "{}", self.label()),
        }
    }
}

impl std::error::Error for PseudoError {}
