use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chatpulse_core::{
    AppConfig, ConversationSnapshot, CurrentTopic, DebounceCoordinator, FixedClock,
    SettledSignals, SignalEngine, SourceContext, TemporalIntentExtractor, TopicSwitchArbiter,
    TopicSwitchVerdict, detect_at, normalize_message, resolve_timeframe,
};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::cli::{ArbitrateArgs, CoalesceArgs, Commands, DetectArgs, TimeframeArgs};

mod coalesce;
mod support;


use self::coalesce::{parse_script, run_script};
use self::support::{print_json, print_json_line, runtime};

pub(crate) use self::support::failure_report;

pub(crate) fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Timeframe(args) => handle_timeframe(args),
        Commands::Detect(args) => handle_detect(args),
        Commands::Arbitrate(args) => handle_arbitrate(args),
        Commands::Coalesce(args) => handle_coalesce(args),
    }
}

fn handle_timeframe(args: TimeframeArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let resolved = resolve_timeframe(&normalize_message(&args.text), now);
    print_json(&resolved)
}

fn handle_detect(args: DetectArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let snapshot = snapshot_from_args(&args);
    print_json(&detect_at(&args.text, &snapshot, now))
}

fn snapshot_from_args(args: &DetectArgs) -> ConversationSnapshot {
    ConversationSnapshot {
        product_interest: args.product.clone(),
        requested_size: args.size.clone(),
        referenced_item: args.item.clone(),
        last_intent: args.intent.clone(),
        recent_turns: Vec::new(),
    }
}

fn handle_arbitrate(args: ArbitrateArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let arbiter = TopicSwitchArbiter::from_config(config.arbiter)
        .context("failed to configure topic arbiter")?;

    let mut topic = CurrentTopic::new(args.topic);
    if let Some(description) = args.description {
        topic = topic.with_description(description);
    }
    let source = SourceContext {
        origin_topic: args.source,
        channel: args.channel,
    };

    let verdict =
        runtime()?.block_on(arbiter.arbitrate(&args.text, &topic, &args.history, &source));
    print_json(&ArbitrationReport::new(&arbiter, verdict))
}

/// Verdict plus whether it clears the configured confidence floor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArbitrationReport {
    #[serde(flatten)]
    verdict: TopicSwitchVerdict,
    actionable: bool,
}

impl ArbitrationReport {
    fn new(arbiter: &TopicSwitchArbiter, verdict: TopicSwitchVerdict) -> Self {
        Self {
            actionable: arbiter.is_actionable(&verdict),
            verdict,
        }
    }
}

fn handle_coalesce(args: CoalesceArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let window = args
        .window_ms
        .map_or(config.debounce.window, Duration::from_millis);

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut input)
        .context("failed to read coalesce script from stdin")?;
    let script = parse_script(&input)?;

    let extractor = match args.now {
        Some(now) => TemporalIntentExtractor::new(Arc::new(FixedClock(now))),
        None => TemporalIntentExtractor::default(),
    };
    // Script lines never carry a topic check, so no classifier is built.
    let engine = SignalEngine::detection_only(extractor);
    let coordinator = DebounceCoordinator::with_window(window);
    let dispatched = runtime()?.block_on(run_script(
        &engine,
        &coordinator,
        script,
        |event: &SettledSignals| print_json_line(event),
    ))?;
    debug!(dispatched, "coalesce script finished");
    Ok(())
}
