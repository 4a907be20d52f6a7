use super::*;
use clap::Parser;

#[test]
fn timeframe_parses_text_and_optional_now() {
    let cli = Cli::try_parse_from([
        "chatpulse",
        "timeframe",
        "en 2 semanas",
        "--now",
        "2026-10-15T12:00:00Z",
    ])
    .expect("parse");
    match cli.command {
        Commands::Timeframe(TimeframeArgs { text, now }) => {
            assert_eq!(text, "en 2 semanas");
            assert_eq!(
                now.map(|value| value.to_rfc3339()).as_deref(),
                Some("2026-10-15T12:00:00+00:00")
            );
        }
        _ => panic!("expected timeframe command"),
    }
}

#[test]
fn detect_rejects_malformed_now() {
    let parsed = Cli::try_parse_from(["chatpulse", "detect", "mañana", "--now", "yesterday"]);
    assert!(parsed.is_err(), "non-RFC3339 --now must be rejected");
}

#[test]
fn detect_parses_snapshot_fields() {
    let cli = Cli::try_parse_from([
        "chatpulse",
        "detect",
        "tal vez el próximo mes",
        "--size",
        "4x6 metros",
        "--intent",
        "price_inquiry",
    ])
    .expect("parse");
    match cli.command {
        Commands::Detect(args) => {
            assert_eq!(args.size.as_deref(), Some("4x6 metros"));
            assert_eq!(args.intent.as_deref(), Some("price_inquiry"));
            assert_eq!(args.product, None);
        }
        _ => panic!("expected detect command"),
    }
}

#[test]
fn arbitrate_collects_history_turns_in_order() {
    let cli = Cli::try_parse_from([
        "chatpulse",
        "arbitrate",
        "y el rollo?",
        "--topic",
        "malla sombra",
        "--history",
        "user: precio de la malla",
        "--history",
        "assistant: ¿qué medida?",
        "--history",
        "4x6",
    ])
    .expect("parse");
    match cli.command {
        Commands::Arbitrate(args) => {
            assert_eq!(args.topic, "malla sombra");
            assert_eq!(
                args.history,
                vec![
                    ConversationTurn::new("user", "precio de la malla"),
                    ConversationTurn::new("assistant", "¿qué medida?"),
                    ConversationTurn::new("user", "4x6"),
                ]
            );
        }
        _ => panic!("expected arbitrate command"),
    }
}

#[test]
fn arbitrate_requires_topic() {
    let parsed = Cli::try_parse_from(["chatpulse", "arbitrate", "y el rollo?"]);
    assert!(parsed.is_err(), "--topic is mandatory");
}

#[test]
fn coalesce_rejects_zero_window() {
    let parsed = Cli::try_parse_from(["chatpulse", "coalesce", "--window-ms", "0"]);
    assert!(parsed.is_err());

    let cli = Cli::try_parse_from(["chatpulse", "coalesce", "--window-ms", "250"]).expect("parse");
    match cli.command {
        Commands::Coalesce(CoalesceArgs { window_ms, now }) => {
            assert_eq!(window_ms, Some(250));
            assert_eq!(now, None);
        }
        _ => panic!("expected coalesce command"),
    }
}

#[test]
fn history_turn_with_spaced_prefix_is_plain_user_text() {
    let turn = parsers::parse_history_turn("nota importante: llega el lunes").expect("turn");
    assert_eq!(turn, ConversationTurn::new("user", "nota importante: llega el lunes"));
    assert!(parsers::parse_history_turn("assistant:   ").is_err());
}

#[test]
fn operation_names_follow_subcommands() {
    let cli = Cli::try_parse_from(["chatpulse", "arbitrate", "y el rollo?", "--topic", "malla"])
        .expect("parse");
    assert_eq!(cli.command.operation(), "arbitrate");

    let cli = Cli::try_parse_from(["chatpulse", "coalesce"]).expect("parse");
    assert_eq!(cli.command.operation(), "coalesce");
}
