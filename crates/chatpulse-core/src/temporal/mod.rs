//! Deferred purchase intent ("lo compro el próximo mes") with a follow-up date.

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::context::ConversationSnapshot;
use crate::models::FutureInterestRecord;
use crate::text::normalize_message;
use crate::timeframe::resolve_timeframe;

mod patterns;


#[derive(Clone)]
pub struct TemporalIntentExtractor {
    clock: Arc<dyn Clock>,
}

impl TemporalIntentExtractor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Runs [`detect_at`] against the extractor's clock.
    #[must_use]
    pub fn detect(
        &self,
        message: &str,
        snapshot: &ConversationSnapshot,
    ) -> Option<FutureInterestRecord> {
        detect_at(message, snapshot, self.clock.now())
    }
}

impl Default for TemporalIntentExtractor {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for TemporalIntentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalIntentExtractor").finish_non_exhaustive()
    }
}

/// Rejection short-circuits everything. A timeframe is mandatory. Without an
/// explicit interest verb the message must be corroborated either by a
/// product-anchored snapshot or by a contrastive "pero …" construction.
#[must_use]
pub fn detect_at(
    message: &str,
    snapshot: &ConversationSnapshot,
    now: DateTime<Utc>,
) -> Option<FutureInterestRecord> {
    let normalized = normalize_message(message);
    if normalized.is_empty() || patterns::is_rejection(&normalized) {
        return None;
    }

    let explicit_interest = patterns::has_interest_signal(&normalized);
    let timeframe = resolve_timeframe(&normalized, now)?;
    debug!(
        label = timeframe.label,
        days = timeframe.days,
        explicit_interest,
        "timeframe matched"
    );

    if !explicit_interest
        && !snapshot.has_anchored_interest()
        && !patterns::has_contrast(&normalized)
    {
        return None;
    }

    let follow_up_date = now.checked_add_days(Days::new(u64::from(timeframe.days)))?;
    let record = FutureInterestRecord {
        interested: true,
        raw_matched_text: timeframe.matched_text,
        timeframe_label: timeframe.label.to_string(),
        timeframe_days: timeframe.days,
        follow_up_date,
        product_interest: snapshot.product_hint(),
        explicit_interest,
        original_message: message.to_string(),
        detected_at: now,
    };
    info!(
        timeframe_days = record.timeframe_days,
        follow_up = %record.follow_up_day(),
        product = record.product_interest.as_deref().unwrap_or(""),
        "future interest detected"
    );
    Some(record)
}
