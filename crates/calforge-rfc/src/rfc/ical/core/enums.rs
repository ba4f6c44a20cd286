//! Enumerated property and parameter values.

/// Declares a closed set of iCalendar tokens.
///
/// Each generated type parses case-insensitively, renders its canonical
/// uppercase token and (de)serializes as that token. Rejected input names the
/// attribute and every legal value.
macro_rules! ical_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($attribute:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every legal value, in declaration order.
            pub const ALL: &'static [Self] = &[$( Self::$variant ),+];

            /// Returns the iCalendar token.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $token ),+
                }
            }

            /// Parses a token (case-insensitive).
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL.iter().copied().find(|v| v.as_str().eq_ignore_ascii_case(s))
            }

            /// ## Summary
            /// Parses a token on behalf of `attribute`.
            ///
            /// ## Errors
            /// Returns `RfcError::InvalidEnum` listing every legal token.
            pub fn check(attribute: &str, value: &str) -> $crate::error::RfcResult<Self> {
                Self::parse(value).ok_or_else(|| $crate::error::RfcError::InvalidEnum {
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                    allowed: Self::ALL
                        .iter()
                        .map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::RfcError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::check($attribute, s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::check($attribute, &raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use ical_enum;

ical_enum! {
    /// Calendar `METHOD` (RFC 5546).
    pub enum CalendarMethod ("method") {
        Publish => "PUBLISH",
        Request => "REQUEST",
        Reply => "REPLY",
        Add => "ADD",
        Cancel => "CANCEL",
        Refresh => "REFRESH",
        Counter => "COUNTER",
        DeclineCounter => "DECLINECOUNTER",
    }
}

ical_enum! {
    /// Event `STATUS`.
    pub enum EventStatus ("status") {
        Confirmed => "CONFIRMED",
        Tentative => "TENTATIVE",
        Cancelled => "CANCELLED",
    }
}

ical_enum! {
    /// Microsoft busy status (`X-MICROSOFT-CDO-BUSYSTATUS`).
    pub enum BusyStatus ("busystatus") {
        Free => "FREE",
        Tentative => "TENTATIVE",
        Busy => "BUSY",
        OutOfOffice => "OOF",
    }
}

ical_enum! {
    /// Event `TRANSP`.
    pub enum Transparency ("transparency") {
        Transparent => "TRANSPARENT",
        Opaque => "OPAQUE",
    }
}

ical_enum! {
    /// Event `CLASS`.
    pub enum EventClass ("class") {
        Public => "PUBLIC",
        Private => "PRIVATE",
        Confidential => "CONFIDENTIAL",
    }
}

ical_enum! {
    /// Alarm `ACTION`.
    pub enum AlarmType ("type") {
        Display => "DISPLAY",
        Audio => "AUDIO",
        Email => "EMAIL",
    }
}

ical_enum! {
    /// Anchor an alarm offset is relative to (`RELATED`).
    pub enum AlarmRelation ("relatesTo") {
        Start => "START",
        End => "END",
    }
}

ical_enum! {
    /// Attendee `ROLE`.
    pub enum AttendeeRole ("role") {
        Chair => "CHAIR",
        Required => "REQ-PARTICIPANT",
        Optional => "OPT-PARTICIPANT",
        NonParticipant => "NON-PARTICIPANT",
    }
}

impl Default for AttendeeRole {
    fn default() -> Self {
        Self::Required
    }
}

ical_enum! {
    /// Attendee `PARTSTAT`.
    pub enum AttendeeStatus ("status") {
        Accepted => "ACCEPTED",
        Tentative => "TENTATIVE",
        Declined => "DECLINED",
        Delegated => "DELEGATED",
        NeedsAction => "NEEDS-ACTION",
    }
}

ical_enum! {
    /// Attendee `CUTYPE`.
    pub enum AttendeeType ("type") {
        Individual => "INDIVIDUAL",
        Group => "GROUP",
        Resource => "RESOURCE",
        Room => "ROOM",
        Unknown => "UNKNOWN",
    }
}
