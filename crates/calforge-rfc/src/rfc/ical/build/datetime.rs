//! DATE and DATE-TIME value rendering (RFC 5545 §3.3.4, §3.3.5).

use chrono::NaiveDateTime;
use chrono_tz::Tz;

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::CalDateTime;

/// Per-event rendering context for date-time properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateContext<'a> {
    /// Zone set on the event itself; adds a `TZID` parameter.
    pub timezone: Option<&'a str>,
    /// Render without the UTC marker.
    pub floating: bool,
}

/// ## Summary
/// Renders a date or date-time value.
///
/// With a `timezone` the value is shown as wall-clock time in that zone
/// (values that are already wall-clock are used verbatim). Without one the
/// value is converted to UTC and suffixed with `Z`, unless `floating` is set,
/// in which case the value's own local time is used. A `date_only` value
/// without a zone keeps the local date of floating, date and zoned values;
/// instants and offset values use their UTC date.
/// A leading `/` on the zone name is ignored.
///
/// ## Errors
/// Returns `RfcError::UnknownTimezone` if an instant has to be converted into
/// a zone chrono-tz does not know.
pub fn format_date(
    timezone: Option<&str>,
    value: &CalDateTime,
    date_only: bool,
    floating: bool,
) -> RfcResult<String> {
    let timezone = timezone
        .map(|tz| tz.strip_prefix('/').unwrap_or(tz))
        .filter(|tz| !tz.is_empty());

    let (local, utc) = match timezone {
        Some(_) if value.is_wall_clock() => (value.local(), false),
        Some(tz) => {
            let zone: Tz = tz
                .parse()
                .map_err(|_e| RfcError::UnknownTimezone(tz.to_string()))?;
            (value.instant().with_timezone(&zone).naive_local(), false)
        }
        None if floating || (date_only && keeps_local_date(value)) => (value.local(), false),
        None => (value.instant().naive_utc(), true),
    };

    Ok(render(local, date_only, utc))
}

const fn keeps_local_date(value: &CalDateTime) -> bool {
    matches!(value, CalDateTime::Zoned(_)) || value.is_wall_clock()
}

fn render(local: NaiveDateTime, date_only: bool, utc: bool) -> String {
    if date_only {
        local.format("%Y%m%d").to_string()
    } else if utc {
        local.format("%Y%m%dT%H%M%SZ").to_string()
    } else {
        local.format("%Y%m%dT%H%M%S").to_string()
    }
}

/// ## Summary
/// Renders `PROPERTY[;TZID=zone]:value` without a line terminator.
///
/// `timezone` is the zone in effect for the event (its own or the
/// calendar's). When the event carries its own zone the `TZID` parameter is
/// added and the value is rendered without the UTC marker.
///
/// ## Errors
/// See [`format_date`].
pub fn format_date_with_property(
    timezone: Option<&str>,
    property: &str,
    value: &CalDateTime,
    context: DateContext<'_>,
) -> RfcResult<String> {
    let mut floating = context.floating;
    let mut line = property.to_string();

    if let Some(tz) = context.timezone {
        line.push_str(";TZID=");
        line.push_str(tz);
        floating = true;
    }

    line.push(':');
    line.push_str(&format_date(timezone, value, false, floating)?);
    Ok(line)
}
