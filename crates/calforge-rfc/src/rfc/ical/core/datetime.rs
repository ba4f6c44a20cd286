//! Date and date-time values accepted by the calendar model.
//!
//! Every supported external representation is normalized into
//! [`CalDateTime`] exactly once, through [`IntoDateTime`]. Formatting code
//! only ever sees the normalized variant.

use std::cmp::Ordering;
use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RfcError, RfcResult};

/// Layouts of UTC values, probed on the text before the `Z` marker.
const UTC_DATETIME_FORMATS: &[&str] =
    &["%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Offset layouts probed after RFC 3339.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
];

/// Naive date-time layouts probed after the offset-carrying ones.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y%m%dT%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// A normalized date or date-time value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalDateTime {
    /// An absolute instant with no local representation beyond UTC.
    Instant(DateTime<Utc>),
    /// An instant carrying a fixed UTC offset.
    Offset(DateTime<FixedOffset>),
    /// An instant carrying a named time zone.
    Zoned(DateTime<Tz>),
    /// A wall-clock time without zone.
    Floating(NaiveDateTime),
    /// A calendar date without time of day.
    Date(NaiveDate),
}

impl CalDateTime {
    /// ## Summary
    /// Parses an ISO-8601 string, probing shapes in a fixed order: named zone
    /// suffix (`…+02:00[Europe/Berlin]`), UTC (`Z`), explicit offset, naive
    /// date-time, plain date.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Some((value, zone)) = s.strip_suffix(']').and_then(|s| s.split_once('[')) {
            let zone: Tz = zone.parse().ok()?;
            return match Self::parse(value)? {
                Self::Floating(_) | Self::Date(_) => None,
                other => Some(Self::Zoned(other.instant().with_timezone(&zone))),
            };
        }

        if s.ends_with(['Z', 'z']) {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(Self::Instant(dt.with_timezone(&Utc)));
            }
            let local = &s[..s.len() - 1];
            return UTC_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
                .map(|naive| Self::Instant(naive.and_utc()));
        }

        if let Some(dt) = DateTime::parse_from_rfc3339(s).ok().or_else(|| {
            OFFSET_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        }) {
            return Some(Self::Offset(dt));
        }

        if let Some(naive) = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return Some(Self::Floating(naive));
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .map(Self::Date)
    }

    /// Returns the absolute instant. Floating values and dates are read as UTC.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Self::Instant(dt) => *dt,
            Self::Offset(dt) => dt.with_timezone(&Utc),
            Self::Zoned(dt) => dt.with_timezone(&Utc),
            Self::Floating(naive) => naive.and_utc(),
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Returns the value's own wall-clock representation.
    #[must_use]
    pub fn local(&self) -> NaiveDateTime {
        match self {
            Self::Instant(dt) => dt.naive_utc(),
            Self::Offset(dt) => dt.naive_local(),
            Self::Zoned(dt) => dt.naive_local(),
            Self::Floating(naive) => *naive,
            Self::Date(date) => date.and_time(NaiveTime::MIN),
        }
    }

    /// Returns whether the value is already expressed as wall-clock time.
    #[must_use]
    pub const fn is_wall_clock(&self) -> bool {
        matches!(self, Self::Floating(_) | Self::Date(_))
    }

    /// Renders the value as an ISO-8601 string (milliseconds precision).
    /// Zoned values carry their zone name in brackets after the offset.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        match self {
            Self::Instant(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            Self::Offset(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            Self::Zoned(dt) => format!(
                "{}[{}]",
                dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
                dt.timezone().name()
            ),
            Self::Floating(naive) => naive.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Values are ordered by their instants. Equality is structural, so two
/// different representations of the same instant are unordered.
impl PartialOrd for CalDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.instant().cmp(&other.instant()) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

impl fmt::Display for CalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for CalDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for CalDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date value `{raw}`")))
    }
}

impl From<DateTime<Utc>> for CalDateTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }
}

impl From<DateTime<FixedOffset>> for CalDateTime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Offset(dt)
    }
}

impl From<DateTime<Local>> for CalDateTime {
    fn from(dt: DateTime<Local>) -> Self {
        Self::Offset(dt.fixed_offset())
    }
}

impl From<DateTime<Tz>> for CalDateTime {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Zoned(dt)
    }
}

impl From<NaiveDateTime> for CalDateTime {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Floating(naive)
    }
}

impl From<NaiveDate> for CalDateTime {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<SystemTime> for CalDateTime {
    fn from(time: SystemTime) -> Self {
        Self::Instant(DateTime::<Utc>::from(time))
    }
}

/// Conversion of any supported date representation into [`CalDateTime`].
pub trait IntoDateTime {
    /// ## Summary
    /// Normalizes the value on behalf of `attribute`.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value matches no supported shape.
    fn into_date_time(self, attribute: &str) -> RfcResult<CalDateTime>;
}

macro_rules! infallible_into_date_time {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoDateTime for $ty {
                fn into_date_time(self, _attribute: &str) -> RfcResult<CalDateTime> {
                    Ok(self.into())
                }
            }
        )+
    };
}

infallible_into_date_time!(
    CalDateTime,
    DateTime<Utc>,
    DateTime<FixedOffset>,
    DateTime<Local>,
    DateTime<Tz>,
    NaiveDateTime,
    NaiveDate,
    SystemTime,
);

impl IntoDateTime for &CalDateTime {
    fn into_date_time(self, _attribute: &str) -> RfcResult<CalDateTime> {
        Ok(self.clone())
    }
}

impl IntoDateTime for &str {
    fn into_date_time(self, attribute: &str) -> RfcResult<CalDateTime> {
        CalDateTime::parse(self).ok_or_else(|| RfcError::InvalidDate {
            attribute: attribute.to_string(),
            value: self.to_string(),
        })
    }
}

impl IntoDateTime for &String {
    fn into_date_time(self, attribute: &str) -> RfcResult<CalDateTime> {
        self.as_str().into_date_time(attribute)
    }
}

impl IntoDateTime for String {
    fn into_date_time(self, attribute: &str) -> RfcResult<CalDateTime> {
        self.as_str().into_date_time(attribute)
    }
}
