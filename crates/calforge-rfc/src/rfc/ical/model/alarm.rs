//! Event alarms (`VALARM`, RFC 5545 §3.6.6).

use serde::{Deserialize, Serialize};

use super::attendee::{Attendee, AttendeeData};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::{escape, format_date};
use crate::rfc::ical::core::{
    AlarmRelation, AlarmType, CalDateTime, CustomAttributes, IntoDateTime, to_duration_string,
};

const DEFAULT_TRIGGER_SECONDS: i64 = -600;
const DEFAULT_AUDIO_SOUND: &str = "Basso";

/// When an alarm fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlarmTrigger {
    /// Signed offset in seconds from the anchor; negative fires before it.
    Offset(i64),
    /// Absolute point in time.
    Absolute(CalDateTime),
}

/// Repetition of an alarm after it first fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRepeat {
    /// Additional repetitions.
    pub times: u32,
    /// Seconds between repetitions.
    pub interval: i64,
}

/// Resource played or attached by an alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmAttachment {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

/// Serializable alarm record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmData {
    #[serde(rename = "type")]
    pub kind: Option<AlarmType>,
    pub trigger: Option<AlarmTrigger>,
    pub relates_to: Option<AlarmRelation>,
    pub repeat: Option<AlarmRepeat>,
    pub attach: Option<AlarmAttachment>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub attendees: Vec<AttendeeData>,
    #[serde(skip_serializing_if = "CustomAttributes::is_empty")]
    pub x: CustomAttributes,
}

impl Default for AlarmData {
    fn default() -> Self {
        Self {
            kind: Some(AlarmType::Display),
            trigger: Some(AlarmTrigger::Offset(DEFAULT_TRIGGER_SECONDS)),
            relates_to: None,
            repeat: None,
            attach: None,
            description: None,
            summary: None,
            attendees: Vec::new(),
            x: CustomAttributes::default(),
        }
    }
}

/// An alarm attached to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    kind: Option<AlarmType>,
    trigger: Option<AlarmTrigger>,
    relates_to: Option<AlarmRelation>,
    repeat: Option<AlarmRepeat>,
    attach: Option<AlarmAttachment>,
    description: Option<String>,
    summary: Option<String>,
    attendees: Vec<Attendee>,
    x: CustomAttributes,
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            kind: Some(AlarmType::Display),
            trigger: Some(AlarmTrigger::Offset(DEFAULT_TRIGGER_SECONDS)),
            relates_to: None,
            repeat: None,
            attach: None,
            description: None,
            summary: None,
            attendees: Vec::new(),
            x: CustomAttributes::default(),
        }
    }
}

impl Alarm {
    /// ## Summary
    /// Creates an alarm from its record.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` for an invalid repeat interval.
    pub fn new(data: AlarmData) -> RfcResult<Self> {
        let mut alarm = Self {
            kind: data.kind,
            trigger: data.trigger,
            relates_to: data.relates_to,
            repeat: None,
            attach: data.attach,
            description: data.description,
            summary: data.summary,
            attendees: data.attendees.into_iter().map(Attendee::from_record).collect(),
            x: data.x,
        };
        if let Some(repeat) = data.repeat {
            alarm.set_repeat(repeat.times, repeat.interval)?;
        }
        Ok(alarm)
    }

    #[must_use]
    pub const fn kind(&self) -> Option<AlarmType> {
        self.kind
    }

    pub fn set_kind(&mut self, kind: AlarmType) -> &mut Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub const fn trigger(&self) -> Option<&AlarmTrigger> {
        self.trigger.as_ref()
    }

    /// Fires `seconds` before the anchor.
    pub fn set_trigger_before(&mut self, seconds: i64) -> &mut Self {
        self.trigger = Some(AlarmTrigger::Offset(-seconds));
        self
    }

    /// Fires `seconds` after the anchor.
    pub fn set_trigger_after(&mut self, seconds: i64) -> &mut Self {
        self.trigger = Some(AlarmTrigger::Offset(seconds));
        self
    }

    /// ## Summary
    /// Fires at an absolute point in time.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_trigger_at(&mut self, at: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.trigger = Some(AlarmTrigger::Absolute(at.into_date_time("trigger")?));
        Ok(self)
    }

    #[must_use]
    pub const fn relates_to(&self) -> Option<AlarmRelation> {
        self.relates_to
    }

    pub fn set_relates_to(&mut self, relation: AlarmRelation) -> &mut Self {
        self.relates_to = Some(relation);
        self
    }

    #[must_use]
    pub const fn repeat(&self) -> Option<AlarmRepeat> {
        self.repeat
    }

    /// ## Summary
    /// Repeats the alarm `times` more times, `interval` seconds apart.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if `interval` is not positive.
    pub fn set_repeat(&mut self, times: u32, interval: i64) -> RfcResult<&mut Self> {
        if interval <= 0 {
            return Err(RfcError::invalid(
                "repeat.interval",
                "must be a positive number of seconds",
            ));
        }
        self.repeat = Some(AlarmRepeat { times, interval });
        Ok(self)
    }

    pub fn clear_repeat(&mut self) -> &mut Self {
        self.repeat = None;
        self
    }

    #[must_use]
    pub const fn attach(&self) -> Option<&AlarmAttachment> {
        self.attach.as_ref()
    }

    pub fn set_attach(&mut self, uri: impl Into<String>, mime: Option<&str>) -> &mut Self {
        self.attach = Some(AlarmAttachment {
            uri: uri.into(),
            mime: mime.map(str::to_string),
        });
        self
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.summary = Some(summary.into());
        self
    }

    /// Own recipients of an email alarm.
    #[must_use]
    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn add_attendee(&mut self, data: impl Into<AttendeeData>) -> &mut Self {
        self.attendees.push(Attendee::from_record(data.into()));
        self
    }

    #[must_use]
    pub const fn x(&self) -> &CustomAttributes {
        &self.x
    }

    /// ## Summary
    /// Appends a custom attribute.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if the key lacks the `X-` prefix.
    pub fn add_x(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> RfcResult<&mut Self> {
        self.x.push(key, value)?;
        Ok(self)
    }

    #[must_use]
    pub fn to_json(&self) -> AlarmData {
        AlarmData {
            kind: self.kind,
            trigger: self.trigger.clone(),
            relates_to: self.relates_to,
            repeat: self.repeat,
            attach: self.attach.clone(),
            description: self.description.clone(),
            summary: self.summary.clone(),
            attendees: self
                .attendees
                .iter()
                .map(|a| a.to_json(&self.attendees))
                .collect(),
            x: self.x.clone(),
        }
    }

    /// ## Summary
    /// Renders the `VALARM` block, CRLF-terminated.
    ///
    /// `event_summary` stands in for a missing description; email alarms
    /// without own recipients notify `event_attendees`.
    ///
    /// ## Errors
    /// Returns `RfcError::MissingField` if type or trigger is unset, or if an
    /// email alarm has nobody to notify.
    pub fn render(&self, event_summary: &str, event_attendees: &[Attendee]) -> RfcResult<String> {
        let kind = self.kind.ok_or_else(|| RfcError::missing("alarm", "type"))?;
        let trigger = self
            .trigger
            .as_ref()
            .ok_or_else(|| RfcError::missing("alarm", "trigger"))?;

        let mut out = format!("BEGIN:VALARM\r\nACTION:{kind}\r\n");

        match trigger {
            AlarmTrigger::Offset(seconds) => {
                let duration = to_duration_string(*seconds);
                match self.relates_to {
                    Some(relation) => {
                        out.push_str(&format!("TRIGGER;RELATED={relation}:{duration}\r\n"));
                    }
                    None if *seconds > 0 => {
                        out.push_str(&format!("TRIGGER;RELATED=END:{duration}\r\n"));
                    }
                    None => out.push_str(&format!("TRIGGER:{duration}\r\n")),
                }
            }
            AlarmTrigger::Absolute(at) => {
                out.push_str(&format!(
                    "TRIGGER;VALUE=DATE-TIME:{}\r\n",
                    format_date(None, at, false, false)?
                ));
            }
        }

        if let Some(repeat) = self.repeat {
            out.push_str(&format!(
                "REPEAT:{}\r\nDURATION:{}\r\n",
                repeat.times,
                to_duration_string(repeat.interval)
            ));
        }

        if kind == AlarmType::Audio {
            match &self.attach {
                Some(AlarmAttachment {
                    uri,
                    mime: Some(mime),
                }) => out.push_str(&format!(
                    "ATTACH;FMTTYPE={}:{}\r\n",
                    escape(mime, false),
                    escape(uri, false)
                )),
                Some(attach) => {
                    out.push_str(&format!("ATTACH;VALUE=URI:{}\r\n", escape(&attach.uri, false)));
                }
                None => out.push_str(&format!("ATTACH;VALUE=URI:{DEFAULT_AUDIO_SOUND}\r\n")),
            }
        } else {
            let description = self.description.as_deref().unwrap_or(event_summary);
            out.push_str(&format!("DESCRIPTION:{}\r\n", escape(description, false)));
        }

        if kind == AlarmType::Email {
            if let Some(summary) = &self.summary {
                out.push_str(&format!("SUMMARY:{}\r\n", escape(summary, false)));
            }

            let (recipients, siblings) = if self.attendees.is_empty() {
                (event_attendees, event_attendees)
            } else {
                (self.attendees.as_slice(), self.attendees.as_slice())
            };
            if recipients.is_empty() {
                return Err(RfcError::missing("alarm", "attendees"));
            }
            for attendee in recipients {
                out.push_str(&attendee.render(siblings)?);
            }
        }

        out.push_str(&self.x.to_lines());
        out.push_str("END:VALARM\r\n");
        Ok(out)
    }
}
