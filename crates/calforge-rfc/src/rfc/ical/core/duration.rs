//! iCalendar DURATION value type (RFC 5545 §3.3.6).

use std::fmt;

/// Duration value (RFC 5545 §3.3.6).
///
/// Built from a signed number of seconds and rendered with day, hour, minute
/// and second designators (`P1DT2H30M`, `-PT15M`, `PT0S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    /// Whether this duration is negative.
    pub negative: bool,
    /// Number of days.
    pub days: u64,
    /// Number of hours.
    pub hours: u64,
    /// Number of minutes.
    pub minutes: u64,
    /// Number of seconds.
    pub seconds: u64,
}

impl Duration {
    /// Splits a signed second count into its components.
    #[must_use]
    pub const fn from_seconds(total: i64) -> Self {
        let negative = total < 0;
        let mut rest = total.unsigned_abs();

        let days = rest / 86_400;
        rest %= 86_400;
        let hours = rest / 3_600;
        rest %= 3_600;
        let minutes = rest / 60;

        Self {
            negative,
            days,
            hours,
            minutes,
            seconds: rest % 60,
        }
    }

    /// Returns the total duration as seconds.
    #[must_use]
    #[expect(
        clippy::cast_possible_wrap,
        reason = "Durations are built from i64 second counts, so the sum fits"
    )]
    pub const fn as_seconds(&self) -> i64 {
        let total = (self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds)
            as i64;

        if self.negative { -total } else { total }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;

        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours == 0 && self.minutes == 0 && self.seconds == 0 {
            if self.days == 0 {
                write!(f, "T0S")?;
            }
            return Ok(());
        }

        write!(f, "T")?;
        if self.hours > 0 {
            write!(f, "{}H", self.hours)?;
        }
        if self.minutes > 0 {
            write!(f, "{}M", self.minutes)?;
        }
        if self.seconds > 0 {
            write!(f, "{}S", self.seconds)?;
        }
        Ok(())
    }
}

/// Renders a signed second count as an iCalendar duration.
#[must_use]
pub fn to_duration_string(seconds: i64) -> String {
    Duration::from_seconds(seconds).to_string()
}
