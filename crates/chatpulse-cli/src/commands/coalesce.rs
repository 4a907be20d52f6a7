use std::time::Duration;

use anyhow::{Context, Result, bail};
use chatpulse_core::{
    ConversationSnapshot, DebounceCoordinator, SettleOutcome, SettledSignals, SignalEngine,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ScriptLine {
    pub(super) delay: Duration,
    pub(super) user_id: String,
    pub(super) text: String,
}

/// `<delay_ms>\t<user>\t<text>` per line. The delay is waited before the
/// line is submitted. Blank lines and `#` comments are ignored.
pub(super) fn parse_script(input: &str) -> Result<Vec<ScriptLine>> {
    let mut script = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }
        let mut fields = raw.splitn(3, '\t');
        let (Some(delay), Some(user_id), Some(text)) = (fields.next(), fields.next(), fields.next())
        else {
            bail!("line {line_no}: expected <delay_ms>\\t<user>\\t<text>");
        };
        let delay_ms = delay
            .trim()
            .parse::<u64>()
            .with_context(|| format!("line {line_no}: invalid delay '{delay}'"))?;
        let user_id = user_id.trim();
        if user_id.is_empty() {
            bail!("line {line_no}: user id must not be empty");
        }
        script.push(ScriptLine {
            delay: Duration::from_millis(delay_ms),
            user_id: user_id.to_string(),
            text: text.to_string(),
        });
    }
    Ok(script)
}

/// Replays `script` through the coordinator and hands every dispatched burst
/// to `emit`, in the order the bursts were closed. Returns how many bursts
/// were dispatched.
pub(super) async fn run_script<F>(
    engine: &SignalEngine,
    coordinator: &DebounceCoordinator,
    script: Vec<ScriptLine>,
    mut emit: F,
) -> Result<usize>
where
    F: FnMut(&SettledSignals) -> Result<()>,
{
    let mut handles = Vec::with_capacity(script.len());
    for line in script {
        tokio::time::sleep(line.delay).await;
        handles.push(engine.submit(
            coordinator,
            &line.user_id,
            line.text,
            ConversationSnapshot::default(),
            None,
        ));
    }

    let mut dispatched = 0;
    for handle in handles {
        if let SettleOutcome::Dispatched(settled) = handle.outcome().await {
            emit(&settled)?;
            dispatched += 1;
        }
    }
    Ok(dispatched)
}
