//! Natural-language timeframe expressions to day offsets.
//!
//! The rule table in [`rules`] only says *which* kind of expression matched;
//! every day computation lives in [`resolver`] so each kind is resolved the
//! same way regardless of phrasing.

use chrono::{DateTime, Utc};
use regex::Captures;
use serde::Serialize;

pub mod resolver;
mod rules;


pub use rules::{TIMEFRAME_RULES, TimeframeRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TimeframeKind {
    Fixed(u32),
    /// Quantity from the `n` capture group times the unit size.
    Multiplier(u32),
    EndOfYear,
    AfterHoliday {
        month: u32,
        day: u32,
    },
    NamedMonth(u32),
}

impl TimeframeKind {
    fn resolve(self, captures: &Captures<'_>, now: DateTime<Utc>) -> Option<u32> {
        match self {
            Self::Fixed(days) => Some(days),
            Self::Multiplier(unit_days) => captures
                .name("n")
                .and_then(|quantity| resolver::multiplied_days(quantity.as_str(), unit_days)),
            Self::EndOfYear => resolver::days_until_end_of_year(now),
            Self::AfterHoliday { month, day } => {
                resolver::days_until_next_occurrence(now, month, day)
            }
            Self::NamedMonth(month) => resolver::days_until_named_month(now, month),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeMatch {
    pub label: &'static str,
    pub matched_text: String,
    pub kind: TimeframeKind,
    pub days: u32,
}

/// Scans the rule table against an already-normalized message and resolves
/// the first rule that both matches and yields a day count. A rule whose
/// quantity cannot be read is skipped, not fatal.
#[must_use]
pub fn resolve_timeframe(normalized: &str, now: DateTime<Utc>) -> Option<TimeframeMatch> {
    TIMEFRAME_RULES.iter().find_map(|rule| {
        let captures = rule.pattern.captures(normalized)?;
        let days = rule.kind.resolve(&captures, now)?;
        let matched_text = captures.get(0)?.as_str().to_string();
        Some(TimeframeMatch {
            label: rule.label,
            matched_text,
            kind: rule.kind,
            days,
        })
    })
}
