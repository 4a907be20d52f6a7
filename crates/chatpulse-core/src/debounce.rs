//! Per-user coalescing of rapid message bursts.
//!
//! Each user id owns at most one pending entry: the fragments received so far
//! and the abort handle of the single live timer. A new fragment appends to
//! the queue and re-arms the timer; when the timer survives a full quiet
//! window the entry is removed and the callback receives the joined text.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

use crate::config::DebounceConfig;

const FRAGMENT_SEPARATOR: &str = "\n";

struct DebounceEntry {
    generation: u64,
    timer: AbortHandle,
    queued_texts: Vec<String>,
}

type EntryMap = HashMap<String, DebounceEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome<T> {
    /// The quiet window elapsed and the callback ran with this submission's
    /// queue; carries the callback's output.
    Dispatched(T),
    /// A later submission superseded this one, or the user was cancelled.
    Dropped,
}

impl<T> SettleOutcome<T> {
    pub fn into_dispatched(self) -> Option<T> {
        match self {
            Self::Dispatched(output) => Some(output),
            Self::Dropped => None,
        }
    }
}

/// Returned by [`DebounceCoordinator::submit`]. Dropping it detaches; the
/// callback still runs on settle.
#[derive(Debug)]
pub struct SettleHandle<T> {
    task: JoinHandle<Option<T>>,
}

impl<T> SettleHandle<T> {
    /// Waits for this submission's fate. A panic inside the callback resumes
    /// here, in the caller that submitted.
    pub async fn outcome(self) -> SettleOutcome<T> {
        match self.task.await {
            Ok(Some(output)) => SettleOutcome::Dispatched(output),
            Ok(None) => SettleOutcome::Dropped,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => SettleOutcome::Dropped,
        }
    }
}

#[derive(Clone)]
pub struct DebounceCoordinator {
    window: Duration,
    entries: Arc<Mutex<EntryMap>>,
    next_generation: Arc<AtomicU64>,
}

impl DebounceCoordinator {
    #[must_use]
    pub fn new(config: DebounceConfig) -> Self {
        Self::with_window(config.window)
    }

    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Queues `text` for `user_id` and (re)arms the quiet-window timer. The
    /// previous timer for the user, if any, is cancelled and its handle
    /// resolves to [`SettleOutcome::Dropped`]; its queued text is kept.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit<F, Fut, T>(
        &self,
        user_id: &str,
        text: impl Into<String>,
        on_ready: F,
    ) -> SettleHandle<T>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let text = text.into();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.lock_entries();

        let task = tokio::spawn(settle_after(
            self.window,
            Arc::clone(&self.entries),
            user_id.to_string(),
            generation,
            on_ready,
        ));
        let timer = task.abort_handle();

        match entries.get_mut(user_id) {
            Some(entry) => {
                entry.timer.abort();
                entry.timer = timer;
                entry.generation = generation;
                entry.queued_texts.push(text);
            }
            None => {
                entries.insert(
                    user_id.to_string(),
                    DebounceEntry {
                        generation,
                        timer,
                        queued_texts: vec![text],
                    },
                );
            }
        }

        SettleHandle { task }
    }

    /// Drops any pending fragments for `user_id` without invoking a callback.
    /// A timer that already fired is not recalled.
    pub fn cancel(&self, user_id: &str) {
        if let Some(entry) = self.lock_entries().remove(user_id) {
            entry.timer.abort();
            debug!(
                user_id,
                fragments = entry.queued_texts.len(),
                "debounce cancelled"
            );
        }
    }

    #[must_use]
    pub fn has_pending(&self, user_id: &str) -> bool {
        self.lock_entries().contains_key(user_id)
    }

    #[must_use]
    pub fn pending_users(&self) -> usize {
        self.lock_entries().len()
    }

    fn lock_entries(&self) -> MutexGuard<'_, EntryMap> {
        lock(&self.entries)
    }
}

impl std::fmt::Debug for DebounceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceCoordinator")
            .field("window", &self.window)
            .field("pending_users", &self.pending_users())
            .finish()
    }
}

// Never held across an await and nothing panics while holding it, so a
// poisoned map is still consistent.
fn lock(entries: &Mutex<EntryMap>) -> MutexGuard<'_, EntryMap> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn settle_after<F, Fut, T>(
    window: Duration,
    entries: Arc<Mutex<EntryMap>>,
    user_id: String,
    generation: u64,
    on_ready: F,
) -> Option<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = T>,
{
    tokio::time::sleep(window).await;

    let combined = {
        let mut entries = lock(&entries);
        if entries
            .get(&user_id)
            .is_none_or(|entry| entry.generation != generation)
        {
            return None;
        }
        let entry = entries.remove(&user_id)?;
        entry.queued_texts.join(FRAGMENT_SEPARATOR)
    };
    debug!(user_id = %user_id, chars = combined.len(), "debounce settled");

    Some(on_ready(combined).await)
}
