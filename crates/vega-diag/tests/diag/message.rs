use vega_diag::{Arg, Message, MessageId, render_message};

#[test]
fn render_named_messages() {
    let m = Message::named(MessageId::UnknownInterface, "bus_if");
    assert_eq!(render_message(&m), "unknown interface `bus_if`");

    let m = Message::named(MessageId::UnconnectedNamedPort, "clk");
    assert_eq!(render_message(&m), "port `clk` is not connected");
}

#[test]
fn render_multi_arg_messages() {
    let m = Message::new(
        MessageId::NotAModport,
        vec![Arg::Name("producer".into()), Arg::Name("my_bus".into())],
    );
    assert_eq!(
        render_message(&m),
        "`producer` is not a modport of interface `my_bus`"
    );

    let m = Message::new(
        MessageId::TooManyPortConnections,
        vec![Arg::Name("leaf".into()), Arg::Count(3), Arg::Count(2)],
    );
    assert_eq!(
        render_message(&m),
        "too many port connections to `leaf`: 3 given, 2 expected"
    );
}

#[test]
fn render_modport_mismatch() {
    let m = Message::new(
        MessageId::ModportConnMismatch,
        vec![
            Arg::Name("my_bus".into()),
            Arg::Name("consumer".into()),
            Arg::Name("my_bus".into()),
            Arg::Name("producer".into()),
        ],
    );
    assert_eq!(
        render_message(&m),
        "cannot connect modport `my_bus.consumer` to port requiring modport `my_bus.producer`"
    );
}

#[test]
fn render_simple_messages() {
    let m = Message::simple(MessageId::UnconnectedUnnamedPort);
    assert_eq!(render_message(&m), "unnamed port is not connected");

    let m = Message::simple(MessageId::MixingOrderedAndNamedPorts);
    assert_eq!(
        render_message(&m),
        "mixing ordered and named port connections is not allowed"
    );
}

#[test]
fn missing_args_render_placeholder() {
    let m = Message::simple(MessageId::Redefinition);
    assert_eq!(render_message(&m), "redefinition of `?`");
}
