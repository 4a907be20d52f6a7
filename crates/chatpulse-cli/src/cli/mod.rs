use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use chatpulse_core::ConversationTurn;

mod parsers;

#[cfg(test)]
mod tests;

use self::parsers::{parse_history_turn, parse_min_one_u64, parse_rfc3339};

#[derive(Debug, Parser)]
#[command(name = "chatpulse")]
#[command(about = "Inbound chat signal interpretation", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the first timeframe expression in a message.
    Timeframe(TimeframeArgs),
    /// Detect deferred purchase intent in a message.
    Detect(DetectArgs),
    /// Ask the configured classifier whether the message changes topic.
    Arbitrate(ArbitrateArgs),
    /// Coalesce `<delay_ms>\t<user>\t<text>` lines from stdin.
    Coalesce(CoalesceArgs),
}

impl Commands {
    /// Stable name reported in error payloads.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Timeframe(_) => "timeframe",
            Self::Detect(_) => "detect",
            Self::Arbitrate(_) => "arbitrate",
            Self::Coalesce(_) => "coalesce",
        }
    }
}

#[derive(Debug, Args)]
pub struct TimeframeArgs {
    pub text: String,
    #[arg(long, value_parser = parse_rfc3339)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    pub text: String,
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub item: Option<String>,
    #[arg(long)]
    pub intent: Option<String>,
    #[arg(long, value_parser = parse_rfc3339)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct ArbitrateArgs {
    pub text: String,
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub channel: Option<String>,
    /// Prior turn as `role: text`; repeat in chronological order.
    #[arg(long = "history", value_parser = parse_history_turn)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Args)]
pub struct CoalesceArgs {
    /// Overrides CHATPULSE_DEBOUNCE_WINDOW_MS.
    #[arg(long, value_parser = parse_min_one_u64)]
    pub window_ms: Option<u64>,
    /// Pins the extractor clock so follow-up dates are reproducible.
    #[arg(long, value_parser = parse_rfc3339)]
    pub now: Option<DateTime<Utc>>,
}
