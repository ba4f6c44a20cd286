//! `RRULE` and `EXDATE` content lines (RFC 5545 §3.8.5).

use super::datetime::format_date;
use crate::error::RfcResult;
use crate::rfc::ical::core::{CalDateTime, Repeating, RepeatingRule};

/// Event settings that shape recurrence output.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrenceContext<'a> {
    /// Zone in effect for the event (its own or the calendar's).
    pub timezone: Option<&'a str>,
    pub floating: bool,
    pub all_day: bool,
}

/// ## Summary
/// Renders a structured rule as an `RRULE` line without terminator.
///
/// Parts are emitted in a fixed order: `FREQ`, `COUNT`, `INTERVAL`, `UNTIL`,
/// `BYDAY`, `BYMONTH`, `BYMONTHDAY`, `BYSETPOS`, `WKST`.
///
/// ## Errors
/// Fails if `UNTIL` cannot be rendered in the event's zone.
pub fn rrule_line(rule: &RepeatingRule, context: RecurrenceContext<'_>) -> RfcResult<String> {
    let mut line = format!("RRULE:FREQ={}", rule.freq);

    if let Some(count) = rule.count {
        line.push_str(&format!(";COUNT={count}"));
    }
    if let Some(interval) = rule.interval {
        line.push_str(&format!(";INTERVAL={interval}"));
    }
    if let Some(until) = &rule.until {
        let until = format_date(context.timezone, until, false, context.floating)?;
        line.push_str(&format!(";UNTIL={until}"));
    }
    if !rule.by_day.is_empty() {
        line.push_str(&format!(";BYDAY={}", join(rule.by_day.iter())));
    }
    if !rule.by_month.is_empty() {
        line.push_str(&format!(";BYMONTH={}", join(rule.by_month.iter())));
    }
    if !rule.by_month_day.is_empty() {
        line.push_str(&format!(";BYMONTHDAY={}", join(rule.by_month_day.iter())));
    }
    if let Some(pos) = rule.by_set_pos {
        line.push_str(&format!(";BYSETPOS={pos}"));
    }
    if let Some(wkst) = rule.start_of_week {
        line.push_str(&format!(";WKST={wkst}"));
    }

    Ok(line)
}

/// ## Summary
/// Renders the `EXDATE` line for excluded occurrences, if there are any.
///
/// All-day events list dates; events with a zone list wall-clock times
/// under `TZID`; all others list UTC (or floating) date-times.
///
/// ## Errors
/// Fails if an exclusion cannot be rendered in the event's zone.
pub fn exdate_line(
    exclude: &[CalDateTime],
    context: RecurrenceContext<'_>,
) -> RfcResult<Option<String>> {
    if exclude.is_empty() {
        return Ok(None);
    }

    let (prefix, date_only, floating) = if context.all_day {
        ("EXDATE;VALUE=DATE:".to_string(), true, false)
    } else if let Some(tz) = context.timezone {
        (format!("EXDATE;TZID={tz}:"), false, true)
    } else {
        ("EXDATE:".to_string(), false, context.floating)
    };

    let values = exclude
        .iter()
        .map(|value| format_date(context.timezone, value, date_only, floating))
        .collect::<RfcResult<Vec<_>>>()?;

    Ok(Some(prefix + &values.join(",")))
}

/// Normalizes a raw recurrence string.
///
/// Line breaks become CRLF, empty and `DTSTART` lines are dropped, and a
/// single remaining line gets the `RRULE:` property name if it lacks one.
#[must_use]
pub fn normalize_raw_rule(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("DTSTART:") && !line.starts_with("DTSTART;"))
        .collect();

    match lines.as_slice() {
        [single] if !single.starts_with("RRULE:") => format!("RRULE:{single}"),
        _ => lines.join("\r\n"),
    }
}

/// ## Summary
/// Renders an event's repetition as CRLF-terminated content lines.
///
/// ## Errors
/// See [`rrule_line`] and [`exdate_line`].
pub fn repeating_lines(repeating: &Repeating, context: RecurrenceContext<'_>) -> RfcResult<String> {
    match repeating {
        Repeating::Raw(raw) => {
            let rule = normalize_raw_rule(raw);
            Ok(if rule.is_empty() {
                rule
            } else {
                rule + "\r\n"
            })
        }
        Repeating::Rule(rule) => {
            let mut out = rrule_line(rule, context)?;
            out.push_str("\r\n");
            if let Some(exdate) = exdate_line(&rule.exclude, context)? {
                out.push_str(&exdate);
                out.push_str("\r\n");
            }
            Ok(out)
        }
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{Frequency, Weekday};

    #[test]
    fn monthly_set_pos_rule() {
        let mut rule = RepeatingRule::new(Frequency::Monthly);
        rule.count = Some(3);
        rule.interval = Some(1);
        rule.by_day = vec![Weekday::Sunday];
        rule.by_set_pos = Some(3);

        assert_eq!(
            rrule_line(&rule, RecurrenceContext::default()).unwrap(),
            "RRULE:FREQ=MONTHLY;COUNT=3;INTERVAL=1;BYDAY=SU;BYSETPOS=3"
        );
    }

    #[test]
    fn all_parts_in_order() {
        let mut rule = RepeatingRule::new(Frequency::Yearly);
        rule.until = CalDateTime::parse("2030-01-01T00:00:00Z");
        rule.by_day = vec![Weekday::Friday, Weekday::Monday];
        rule.by_month = vec![1, 6];
        rule.by_month_day = vec![1, -1];
        rule.start_of_week = Some(Weekday::Monday);

        assert_eq!(
            rrule_line(&rule, RecurrenceContext::default()).unwrap(),
            "RRULE:FREQ=YEARLY;UNTIL=20300101T000000Z;BYDAY=FR,MO;BYMONTH=1,6;\
             BYMONTHDAY=1,-1;WKST=MO"
        );
    }

    #[test]
    fn exdate_variants() {
        let exclude = vec![
            CalDateTime::parse("2021-07-01T10:00:00Z").unwrap(),
            CalDateTime::parse("2021-07-08T10:00:00Z").unwrap(),
        ];

        assert_eq!(
            exdate_line(&exclude, RecurrenceContext::default()).unwrap().unwrap(),
            "EXDATE:20210701T100000Z,20210708T100000Z"
        );

        let zoned = RecurrenceContext {
            timezone: Some("Europe/Berlin"),
            ..RecurrenceContext::default()
        };
        assert_eq!(
            exdate_line(&exclude, zoned).unwrap().unwrap(),
            "EXDATE;TZID=Europe/Berlin:20210701T120000,20210708T120000"
        );

        let all_day = RecurrenceContext {
            all_day: true,
            ..RecurrenceContext::default()
        };
        assert_eq!(
            exdate_line(&exclude, all_day).unwrap().unwrap(),
            "EXDATE;VALUE=DATE:20210701,20210708"
        );

        assert!(exdate_line(&[], all_day).unwrap().is_none());
    }

    #[test]
    fn raw_rules_are_normalized() {
        assert_eq!(normalize_raw_rule("FREQ=DAILY;COUNT=2"), "RRULE:FREQ=DAILY;COUNT=2");
        assert_eq!(normalize_raw_rule("RRULE:FREQ=DAILY"), "RRULE:FREQ=DAILY");
        assert_eq!(
            normalize_raw_rule("DTSTART:20200101T000000Z\nRRULE:FREQ=WEEKLY\nEXDATE:20200108T000000Z"),
            "RRULE:FREQ=WEEKLY\r\nEXDATE:20200108T000000Z"
        );
        assert_eq!(
            normalize_raw_rule("DTSTART;TZID=Europe/Berlin:20200101T000000\r\nFREQ=WEEKLY"),
            "RRULE:FREQ=WEEKLY"
        );
    }

    #[test]
    fn repeating_lines_terminate_each_line() {
        let mut rule = RepeatingRule::new(Frequency::Daily);
        rule.exclude = vec![CalDateTime::parse("2021-07-01").unwrap()];
        let context = RecurrenceContext {
            all_day: true,
            ..RecurrenceContext::default()
        };

        assert_eq!(
            repeating_lines(&Repeating::Rule(rule), context).unwrap(),
            "RRULE:FREQ=DAILY\r\nEXDATE;VALUE=DATE:20210701\r\n"
        );
        assert_eq!(
            repeating_lines(&Repeating::from("FREQ=HOURLY"), context).unwrap(),
            "RRULE:FREQ=HOURLY\r\n"
        );
    }

    #[test]
    fn rrule_set_input_drops_dtstart() {
        let set: rrule::RRuleSet = "DTSTART:20200101T090000Z\nRRULE:FREQ=WEEKLY;COUNT=4"
            .parse()
            .unwrap();
        let lines = repeating_lines(&Repeating::from(&set), RecurrenceContext::default()).unwrap();

        assert!(lines.starts_with("RRULE:FREQ=WEEKLY"));
        assert!(lines.contains("COUNT=4"));
        assert!(!lines.contains("DTSTART"));
    }
}
