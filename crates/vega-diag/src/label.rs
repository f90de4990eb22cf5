use vega_source::Span;

use crate::message::Message;

/// Distinguishes the location a diagnostic is *at* from locations that
/// only supply context, like a first definition or a previous usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Primary,
    Secondary,
}

/// A source location attached to a diagnostic, carrying its own short
/// message (e.g. "declared here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: Message,
    pub kind: LabelKind,
}

impl Label {
    pub fn primary(span: Span, message: Message) -> Self {
        Self {
            span,
            message,
            kind: LabelKind::Primary,
        }
    }

    pub fn secondary(span: Span, message: Message) -> Self {
        Self {
            span,
            message,
            kind: LabelKind::Secondary,
        }
    }
}
