//! Repetition rule descriptors (RFC 5545 §3.3.10, §3.8.5.3).

use serde::{Deserialize, Serialize};

use super::CalDateTime;
use super::enums::ical_enum;
use crate::error::{RfcError, RfcResult};

ical_enum! {
    /// Recurrence frequency (RFC 5545 §3.3.10).
    pub enum Frequency ("repeating.freq") {
        Secondly => "SECONDLY",
        Minutely => "MINUTELY",
        Hourly => "HOURLY",
        Daily => "DAILY",
        Weekly => "WEEKLY",
        Monthly => "MONTHLY",
        Yearly => "YEARLY",
    }
}

ical_enum! {
    /// Day of the week, as used by `BYDAY` and `WKST`.
    pub enum Weekday ("repeating.byDay") {
        Sunday => "SU",
        Monday => "MO",
        Tuesday => "TU",
        Wednesday => "WE",
        Thursday => "TH",
        Friday => "FR",
        Saturday => "SA",
    }
}

/// Structured recurrence rule.
///
/// Validated by [`RepeatingRule::validate`] before an event stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatingRule {
    /// Recurrence frequency (required).
    pub freq: Frequency,

    /// Number of occurrences.
    #[serde(default)]
    pub count: Option<u32>,

    /// How often the frequency repeats.
    #[serde(default)]
    pub interval: Option<u32>,

    /// End of the recurrence (inclusive).
    #[serde(default)]
    pub until: Option<CalDateTime>,

    /// By-day list, order preserved.
    #[serde(default)]
    pub by_day: Vec<Weekday>,

    /// By-month list (1-12).
    #[serde(default)]
    pub by_month: Vec<u8>,

    /// By-monthday list (-31 to 31, excluding 0).
    #[serde(default)]
    pub by_month_day: Vec<i8>,

    /// Position within the frequency period (-366 to 366, excluding 0).
    #[serde(default)]
    pub by_set_pos: Option<i16>,

    /// Excluded occurrences, rendered as `EXDATE`.
    #[serde(default)]
    pub exclude: Vec<CalDateTime>,

    /// Week start day.
    #[serde(default)]
    pub start_of_week: Option<Weekday>,
}

impl RepeatingRule {
    /// Creates a rule with only a frequency set.
    #[must_use]
    pub const fn new(freq: Frequency) -> Self {
        Self {
            freq,
            count: None,
            interval: None,
            until: None,
            by_day: Vec::new(),
            by_month: Vec::new(),
            by_month_day: Vec::new(),
            by_set_pos: None,
            exclude: Vec::new(),
            start_of_week: None,
        }
    }

    /// ## Summary
    /// Checks every rule part against its legal range.
    ///
    /// `BYSETPOS` without `BYDAY` is accepted unchanged; only a warning is logged.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` naming the offending rule part.
    pub fn validate(&self) -> RfcResult<()> {
        if self.count == Some(0) {
            return Err(RfcError::invalid(
                "repeating.count",
                "must be a positive number",
            ));
        }
        if self.interval == Some(0) {
            return Err(RfcError::invalid(
                "repeating.interval",
                "must be a positive number",
            ));
        }
        if let Some(month) = self.by_month.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(RfcError::invalid(
                "repeating.byMonth",
                format!("contains invalid value `{month}`"),
            ));
        }
        if let Some(day) = self
            .by_month_day
            .iter()
            .find(|d| **d == 0 || !(-31..=31).contains(*d))
        {
            return Err(RfcError::invalid(
                "repeating.byMonthDay",
                format!("contains invalid value `{day}`"),
            ));
        }
        if let Some(pos) = self.by_set_pos {
            if pos == 0 || !(-366..=366).contains(&pos) {
                return Err(RfcError::invalid(
                    "repeating.bySetPos",
                    format!("contains invalid value `{pos}`"),
                ));
            }
            if self.by_day.is_empty() {
                tracing::warn!(
                    by_set_pos = pos,
                    "BYSETPOS given without BYDAY; emitting it unchanged"
                );
            }
        }
        Ok(())
    }
}

/// An event's repetition: a structured rule or a raw pass-through string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Repeating {
    /// Raw `RRULE` text, with or without the property name.
    Raw(String),
    /// Structured rule rendered part by part.
    Rule(RepeatingRule),
}

impl From<RepeatingRule> for Repeating {
    fn from(rule: RepeatingRule) -> Self {
        Self::Rule(rule)
    }
}

impl From<&str> for Repeating {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for Repeating {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&rrule::RRuleSet> for Repeating {
    fn from(set: &rrule::RRuleSet) -> Self {
        Self::Raw(set.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_parses_lowercase() {
        assert_eq!(Frequency::parse("monthly"), Some(Frequency::Monthly));
        assert!(Frequency::check("repeating.freq", "fortnightly").is_err());
    }

    #[test]
    fn weekday_tokens() {
        assert_eq!(Weekday::Sunday.as_str(), "SU");
        assert_eq!(Weekday::parse("th"), Some(Weekday::Thursday));
    }

    #[test]
    fn validate_rejects_out_of_range_parts() {
        let mut rule = RepeatingRule::new(Frequency::Yearly);
        rule.by_month = vec![1, 13];
        assert!(rule.validate().unwrap_err().to_string().contains("13"));

        let mut rule = RepeatingRule::new(Frequency::Monthly);
        rule.by_month_day = vec![0];
        assert!(rule.validate().is_err());

        let mut rule = RepeatingRule::new(Frequency::Monthly);
        rule.by_set_pos = Some(400);
        assert!(rule.validate().is_err());

        let mut rule = RepeatingRule::new(Frequency::Daily);
        rule.count = Some(0);
        assert!(rule.validate().is_err());
    }

    #[test_log::test]
    fn validate_accepts_set_pos_without_by_day() {
        let mut rule = RepeatingRule::new(Frequency::Monthly);
        rule.by_set_pos = Some(-1);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn repeating_deserializes_both_shapes() {
        let raw: Repeating = serde_json::from_str("\"FREQ=DAILY;COUNT=2\"").unwrap();
        assert_eq!(raw, Repeating::Raw("FREQ=DAILY;COUNT=2".to_string()));

        let rule: Repeating =
            serde_json::from_str(r#"{"freq":"weekly","byDay":["MO","we"],"interval":2}"#).unwrap();
        let Repeating::Rule(rule) = rule else {
            panic!("expected a structured rule");
        };
        assert_eq!(rule.freq, Frequency::Weekly);
        assert_eq!(rule.by_day, vec![Weekday::Monday, Weekday::Wednesday]);
        assert_eq!(rule.interval, Some(2));
    }
}
