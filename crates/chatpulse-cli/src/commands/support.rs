use std::io::{self, Write};

use anyhow::{Context, Result};
use chatpulse_core::SignalError;
use tokio::runtime::{Builder, Runtime};

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// One compact document per line, flushed so a reader sees events as they
/// settle.
pub(super) fn print_json_line<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

pub(super) fn runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Stderr rendering of a failed command: the structured error payload when
/// the failure came from the core, the plain context chain otherwise.
pub(crate) fn failure_report(operation: &str, err: &anyhow::Error) -> String {
    let Some(signal) = err.downcast_ref::<SignalError>() else {
        return format!("Error: {err:#}");
    };
    serde_json::to_string(&signal.to_payload(operation))
        .unwrap_or_else(|_| format!("Error: {err:#}"))
}
