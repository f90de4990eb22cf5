use vega_source::Span;

use crate::code::DiagnosticCode;
use crate::label::{Label, LabelKind};
use crate::message::{self, Message};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One reported problem: a coded headline plus any number of labeled
/// source locations and free-standing notes.
///
/// There is no dedicated span field; the location a diagnostic "is at"
/// is whichever label was attached as primary. Port elaboration attaches
/// the most specific range it has (a declarator name, a connection
/// expression) as the primary label and prior declarations or usages as
/// secondary ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: Message,
    pub labels: Vec<Label>,
    pub notes: Vec<Message>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: Message) -> Self {
        Self {
            severity,
            code,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// An error whose primary label repeats the headline at `span`.
    pub fn error(code: DiagnosticCode, message: Message, span: Span) -> Self {
        let label_msg = message.clone();
        Self::new(Severity::Error, code, message).with_label(Label::primary(span, label_msg))
    }

    /// A warning whose primary label repeats the headline at `span`.
    pub fn warning(code: DiagnosticCode, message: Message, span: Span) -> Self {
        let label_msg = message.clone();
        Self::new(Severity::Warning, code, message).with_label(Label::primary(span, label_msg))
    }

    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: Message) -> Self {
        self.notes.push(note);
        self
    }

    /// Secondary label pointing at a related declaration.
    #[must_use]
    pub fn with_related(self, span: Span, message: Message) -> Self {
        self.with_label(Label::secondary(span, message))
    }

    /// Span of the first primary label, if one was attached. The
    /// `error`/`warning` constructors always attach one; only a
    /// hand-assembled diagnostic can lack it.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find_map(|label| match label.kind {
            LabelKind::Primary => Some(label.span),
            LabelKind::Secondary => None,
        })
    }

    /// The headline rendered to text, for presentation and tests.
    pub fn render_message(&self) -> String {
        message::render_message(&self.message)
    }
}
