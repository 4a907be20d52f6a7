use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Deferred purchase intent with the date the caller should follow up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureInterestRecord {
    pub interested: bool,
    pub raw_matched_text: String,
    pub timeframe_label: String,
    pub timeframe_days: u32,
    pub follow_up_date: DateTime<Utc>,
    pub product_interest: Option<String>,
    pub explicit_interest: bool,
    pub original_message: String,
    pub detected_at: DateTime<Utc>,
}

impl FutureInterestRecord {
    #[must_use]
    pub fn follow_up_day(&self) -> NaiveDate {
        self.follow_up_date.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSwitchVerdict {
    pub should_switch: bool,
    pub target_topic: Option<String>,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TopicSwitchVerdict {
    /// The verdict used whenever the classifier cannot be trusted: stay put.
    #[must_use]
    pub const fn fail_safe() -> Self {
        Self {
            should_switch: false,
            target_topic: None,
            confidence: 0.0,
            reason: None,
        }
    }

    #[must_use]
    pub fn is_fail_safe(&self) -> bool {
        !self.should_switch && self.target_topic.is_none() && self.confidence == 0.0
    }

    /// Switch, with a target, at or above `min_confidence`.
    #[must_use]
    pub fn is_actionable(&self, min_confidence: f32) -> bool {
        self.should_switch && self.target_topic.is_some() && self.confidence >= min_confidence
    }
}

impl Default for TopicSwitchVerdict {
    fn default() -> Self {
        Self::fail_safe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_safe_verdict_never_switches() {
        let verdict = TopicSwitchVerdict::fail_safe();
        assert!(verdict.is_fail_safe());
        assert!(!verdict.is_actionable(0.0));
        assert_eq!(
            serde_json::to_value(&verdict).expect("verdict json"),
            serde_json::json!({"shouldSwitch": false, "targetTopic": null, "confidence": 0.0})
        );
    }

    #[test]
    fn is_actionable_requires_target_and_threshold() {
        let verdict = TopicSwitchVerdict {
            should_switch: true,
            target_topic: Some("rollos de malla".to_string()),
            confidence: 0.65,
            reason: None,
        };
        assert!(verdict.is_actionable(0.6));
        assert!(!verdict.is_actionable(0.7));
    }
}
