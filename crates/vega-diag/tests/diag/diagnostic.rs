use vega_diag::{Diagnostic, DiagnosticCode, Label, LabelKind, Message, MessageId, Severity};
use vega_source::{FileId, Span};

fn dummy_span() -> Span {
    Span::at(FileId(0), 0, 5)
}

#[test]
fn primary_span_returns_first_primary() {
    let d = Diagnostic::error(
        DiagnosticCode::REDEFINITION,
        Message::named(MessageId::Redefinition, "a"),
        dummy_span(),
    );
    let span = d.primary_span().expect("should have primary span");
    assert_eq!(span.file, FileId(0));
}

#[test]
fn primary_span_skips_secondary() {
    let secondary_span = Span::at(FileId(1), 10, 5);
    let primary_span = dummy_span();

    let d = Diagnostic::new(
        Severity::Error,
        DiagnosticCode::REDEFINITION,
        Message::named(MessageId::Redefinition, "a"),
    )
    .with_label(Label::secondary(
        secondary_span,
        Message::simple(MessageId::FirstDefinedHere),
    ))
    .with_label(Label::primary(
        primary_span,
        Message::named(MessageId::Redefinition, "a"),
    ));

    let span = d.primary_span().expect("should have primary span");
    assert_eq!(span.file, FileId(0));
}

#[test]
fn empty_labels_returns_none() {
    let d = Diagnostic::new(
        Severity::Warning,
        DiagnosticCode::UNUSED_PORT_DECL,
        Message::named(MessageId::UnusedPortDecl, "x"),
    );
    assert!(d.primary_span().is_none());
}

#[test]
fn with_related_adds_secondary() {
    let d = Diagnostic::error(
        DiagnosticCode::DUPLICATE_PORT_CONNECTION,
        Message::named(MessageId::DuplicatePortConnection, "clk"),
        dummy_span(),
    )
    .with_related(
        Span::at(FileId(0), 20, 3),
        Message::simple(MessageId::PreviousUsageHere),
    );

    assert_eq!(d.labels.len(), 2);
    assert_eq!(d.labels[1].kind, LabelKind::Secondary);
}

#[test]
fn render_message_delegates() {
    let d = Diagnostic::error(
        DiagnosticCode::UNKNOWN_INTERFACE,
        Message::named(MessageId::UnknownInterface, "my_bus"),
        dummy_span(),
    );
    assert_eq!(d.render_message(), "unknown interface `my_bus`");
}
