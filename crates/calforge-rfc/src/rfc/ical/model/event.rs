//! Calendar events (`VEVENT`, RFC 5545 §3.6.1).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::alarm::{Alarm, AlarmData};
use super::attendee::{Attendee, AttendeeData, AttendeeId, Delegate};
use super::category::{Category, CategoryData};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::{
    DateContext, RecurrenceContext, escape, format_date, format_date_with_property,
    repeating_lines,
};
use crate::rfc::ical::core::{
    AlarmType, AttendeeStatus, BusyStatus, CalDateTime, CustomAttributes, Description,
    DescriptionInput, EventClass, EventStatus, Geo, IntoDateTime, Location, LocationInput, Person,
    PersonInput, Repeating, Transparency,
};

const MAX_PRIORITY: u8 = 9;

/// Serializable event record.
///
/// Used both to construct an [`Event`] and as its JSON snapshot. Unknown keys
/// are ignored when deserializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventData {
    pub id: Option<String>,
    pub sequence: u32,
    pub start: Option<CalDateTime>,
    pub end: Option<CalDateTime>,
    pub recurrence_id: Option<CalDateTime>,
    pub timezone: Option<String>,
    pub stamp: Option<CalDateTime>,
    pub all_day: bool,
    pub floating: bool,
    pub repeating: Option<Repeating>,
    pub summary: Option<String>,
    pub location: Option<LocationInput>,
    pub geo: Option<Geo>,
    pub description: Option<DescriptionInput>,
    pub organizer: Option<PersonInput>,
    pub attendees: Vec<AttendeeData>,
    pub alarms: Vec<AlarmData>,
    pub categories: Vec<CategoryData>,
    pub status: Option<EventStatus>,
    pub busystatus: Option<BusyStatus>,
    pub priority: Option<u8>,
    pub class: Option<EventClass>,
    pub url: Option<String>,
    pub attachments: Vec<String>,
    pub transparency: Option<Transparency>,
    pub created: Option<CalDateTime>,
    pub last_modified: Option<CalDateTime>,
    #[serde(skip_serializing_if = "CustomAttributes::is_empty")]
    pub x: CustomAttributes,
}

/// A calendar event and everything it owns.
#[derive(Debug, Clone)]
pub struct Event {
    id: String,
    sequence: u32,
    start: Option<CalDateTime>,
    end: Option<CalDateTime>,
    recurrence_id: Option<CalDateTime>,
    timezone: Option<String>,
    stamp: CalDateTime,
    all_day: bool,
    floating: bool,
    repeating: Option<Repeating>,
    summary: Option<String>,
    location: Option<Location>,
    geo: Option<Geo>,
    description: Option<Description>,
    organizer: Option<Person>,
    attendees: Vec<Attendee>,
    alarms: Vec<Alarm>,
    categories: Vec<Category>,
    status: Option<EventStatus>,
    busystatus: Option<BusyStatus>,
    priority: Option<u8>,
    class: Option<EventClass>,
    url: Option<String>,
    attachments: Vec<String>,
    transparency: Option<Transparency>,
    created: Option<CalDateTime>,
    last_modified: Option<CalDateTime>,
    x: CustomAttributes,
}

impl Event {
    /// ## Summary
    /// Creates an event from its record.
    ///
    /// Fields are applied through their setters in declaration order, so a
    /// start after the end is swapped and `floating` clears `timezone`. A
    /// missing id gets a random UUID and a missing stamp the current time.
    ///
    /// ## Errors
    /// Returns the first validation error of any field.
    pub fn new(data: EventData) -> RfcResult<Self> {
        let mut event = Self {
            id: data
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            sequence: data.sequence,
            start: None,
            end: None,
            recurrence_id: data.recurrence_id,
            timezone: None,
            stamp: data.stamp.unwrap_or_else(|| Utc::now().into()),
            all_day: data.all_day,
            floating: false,
            repeating: None,
            summary: data.summary,
            location: data.location.map(Location::from),
            geo: data.geo,
            description: data.description.map(Description::from),
            organizer: None,
            attendees: Vec::new(),
            alarms: Vec::new(),
            categories: Vec::new(),
            status: data.status,
            busystatus: data.busystatus,
            priority: None,
            class: data.class,
            url: data.url,
            attachments: data.attachments,
            transparency: data.transparency,
            created: data.created,
            last_modified: data.last_modified,
            x: data.x,
        };

        if let Some(start) = data.start {
            event.set_start(start)?;
        }
        if let Some(end) = data.end {
            event.set_end(end)?;
        }
        event.set_timezone(data.timezone.as_deref());
        event.set_floating(data.floating);
        if let Some(repeating) = data.repeating {
            event.set_repeating(repeating)?;
        }
        if let Some(organizer) = data.organizer {
            event.set_organizer(organizer)?;
        }
        if let Some(priority) = data.priority {
            event.set_priority(priority)?;
        }
        event.load_attendees(data.attendees)?;
        for alarm in data.alarms {
            event.create_alarm(alarm)?;
        }
        for category in data.categories {
            event.create_category(category)?;
        }

        Ok(event)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u32) -> &mut Self {
        self.sequence = sequence;
        self
    }

    #[must_use]
    pub const fn start(&self) -> Option<&CalDateTime> {
        self.start.as_ref()
    }

    /// ## Summary
    /// Sets the start; swaps start and end if the start is now later.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_start(&mut self, start: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.start = Some(start.into_date_time("start")?);
        self.order_start_end();
        Ok(self)
    }

    #[must_use]
    pub const fn end(&self) -> Option<&CalDateTime> {
        self.end.as_ref()
    }

    /// ## Summary
    /// Sets the end; swaps start and end if the end is now earlier.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_end(&mut self, end: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.end = Some(end.into_date_time("end")?);
        self.order_start_end();
        Ok(self)
    }

    pub fn clear_end(&mut self) -> &mut Self {
        self.end = None;
        self
    }

    fn order_start_end(&mut self) {
        let reversed = matches!((&self.start, &self.end), (Some(start), Some(end)) if start > end);
        if reversed {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    #[must_use]
    pub const fn recurrence_id(&self) -> Option<&CalDateTime> {
        self.recurrence_id.as_ref()
    }

    /// ## Summary
    /// Sets the `RECURRENCE-ID` of an overridden occurrence.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_recurrence_id(&mut self, value: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.recurrence_id = Some(value.into_date_time("recurrenceId")?);
        Ok(self)
    }

    /// Zone set on the event itself.
    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// Zone in effect: the event's own, else the calendar's.
    #[must_use]
    pub fn effective_timezone<'a>(&'a self, calendar: Option<&'a str>) -> Option<&'a str> {
        self.timezone.as_deref().or(calendar)
    }

    /// Sets the event's own zone. `UTC` clears it; any other zone turns
    /// floating off.
    pub fn set_timezone(&mut self, timezone: Option<&str>) -> &mut Self {
        self.timezone = timezone
            .filter(|tz| !tz.is_empty() && *tz != "UTC")
            .map(str::to_string);
        if self.timezone.is_some() {
            self.floating = false;
        }
        self
    }

    #[must_use]
    pub const fn stamp(&self) -> &CalDateTime {
        &self.stamp
    }

    /// ## Summary
    /// Sets `DTSTAMP`.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_stamp(&mut self, stamp: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.stamp = stamp.into_date_time("stamp")?;
        Ok(self)
    }

    #[must_use]
    pub const fn all_day(&self) -> bool {
        self.all_day
    }

    pub fn set_all_day(&mut self, all_day: bool) -> &mut Self {
        self.all_day = all_day;
        self
    }

    #[must_use]
    pub const fn floating(&self) -> bool {
        self.floating
    }

    /// Turns floating time on or off. Turning it on clears the zone.
    pub fn set_floating(&mut self, floating: bool) -> &mut Self {
        self.floating = floating;
        if floating {
            self.timezone = None;
        }
        self
    }

    #[must_use]
    pub const fn repeating(&self) -> Option<&Repeating> {
        self.repeating.as_ref()
    }

    /// ## Summary
    /// Sets the repetition rule.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if a structured rule is invalid.
    pub fn set_repeating(&mut self, repeating: impl Into<Repeating>) -> RfcResult<&mut Self> {
        let repeating = repeating.into();
        if let Repeating::Rule(rule) = &repeating {
            rule.validate()?;
        }
        self.repeating = Some(repeating);
        Ok(self)
    }

    pub fn clear_repeating(&mut self) -> &mut Self {
        self.repeating = None;
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

    #[must_use]
    pub const fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn set_location(&mut self, location: impl Into<Location>) -> &mut Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub const fn geo(&self) -> Option<Geo> {
        self.geo
    }

    pub fn set_geo(&mut self, geo: Geo) -> &mut Self {
        self.geo = Some(geo);
        self
    }

    #[must_use]
    pub const fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn set_description(&mut self, description: impl Into<Description>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn organizer(&self) -> Option<&Person> {
        self.organizer.as_ref()
    }

    /// ## Summary
    /// Sets the organizer from `Name <email>` text or a record.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` for malformed text or an empty name.
    pub fn set_organizer(&mut self, organizer: impl Into<PersonInput>) -> RfcResult<&mut Self> {
        self.organizer = Some(organizer.into().into_person("organizer")?);
        Ok(self)
    }

    #[must_use]
    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    #[must_use]
    pub fn attendee(&self, id: AttendeeId) -> Option<&Attendee> {
        self.attendees.get(id.0)
    }

    pub fn attendee_mut(&mut self, id: AttendeeId) -> Option<&mut Attendee> {
        self.attendees.get_mut(id.0)
    }

    /// Handle of the first attendee with this email.
    #[must_use]
    pub fn find_attendee(&self, email: &str) -> Option<AttendeeId> {
        self.attendees
            .iter()
            .position(|a| a.email() == Some(email))
            .map(AttendeeId)
    }

    /// ## Summary
    /// Adds an attendee and returns its handle.
    ///
    /// Delegation text in the record is resolved against the attendees that
    /// already exist; unknown addresses become detached contacts.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` for malformed delegation text.
    pub fn create_attendee(&mut self, data: impl Into<AttendeeData>) -> RfcResult<AttendeeId> {
        let mut data = data.into();
        let links = (data.delegated_to.take(), data.delegated_from.take());

        let id = AttendeeId(self.attendees.len());
        self.attendees.push(Attendee::from_record(data));
        if let Err(e) = self.link_delegates(id, links) {
            self.attendees.pop();
            return Err(e);
        }
        Ok(id)
    }

    fn load_attendees(&mut self, records: Vec<AttendeeData>) -> RfcResult<()> {
        let mut pending = Vec::with_capacity(records.len());
        for mut data in records {
            pending.push((data.delegated_to.take(), data.delegated_from.take()));
            self.attendees.push(Attendee::from_record(data));
        }
        for (index, links) in pending.into_iter().enumerate() {
            self.link_delegates(AttendeeId(index), links)?;
        }
        Ok(())
    }

    fn link_delegates(
        &mut self,
        id: AttendeeId,
        (to, from): (Option<String>, Option<String>),
    ) -> RfcResult<()> {
        let to = to
            .map(|text| self.resolve_delegate("delegatedTo", &text))
            .transpose()?;
        let from = from
            .map(|text| self.resolve_delegate("delegatedFrom", &text))
            .transpose()?;

        let attendee = self.attendee_slot(id)?;
        if let Some(to) = to {
            attendee.set_delegated_to(to);
            if attendee.status().is_none() {
                attendee.set_status(AttendeeStatus::Delegated);
            }
        }
        if let Some(from) = from {
            attendee.set_delegated_from(from);
        }
        Ok(())
    }

    fn resolve_delegate(&self, attribute: &str, text: &str) -> RfcResult<Delegate> {
        let person = Person::parse(attribute, text)?;
        let sibling = person
            .email
            .as_deref()
            .and_then(|email| self.find_attendee(email));

        Ok(match sibling {
            Some(id) => Delegate::Attendee(id),
            None => Delegate::Contact(person),
        })
    }

    fn attendee_slot(&mut self, id: AttendeeId) -> RfcResult<&mut Attendee> {
        self.attendees
            .get_mut(id.0)
            .ok_or_else(|| RfcError::invalid("attendee", format!("no attendee #{}", id.0)))
    }

    /// ## Summary
    /// Records that `from` delegated attendance to `to`.
    ///
    /// Sets `from.delegated_to`, `to.delegated_from` and marks `from` as
    /// `DELEGATED`. Cycles are allowed.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if either handle is unknown.
    pub fn delegate(&mut self, from: AttendeeId, to: AttendeeId) -> RfcResult<&mut Self> {
        self.attendee_slot(to)?;
        let delegator = self.attendee_slot(from)?;
        delegator.set_delegated_to(Delegate::Attendee(to));
        delegator.set_status(AttendeeStatus::Delegated);
        self.attendee_slot(to)?
            .set_delegated_from(Delegate::Attendee(from));
        Ok(self)
    }

    /// ## Summary
    /// Creates a new attendee that `from` delegates to.
    ///
    /// ## Errors
    /// Fails if `from` is unknown or the new record is invalid.
    pub fn delegate_to_new(
        &mut self,
        from: AttendeeId,
        data: impl Into<AttendeeData>,
    ) -> RfcResult<AttendeeId> {
        self.attendee_slot(from)?;
        let to = self.create_attendee(data)?;
        self.delegate(from, to)?;
        Ok(to)
    }

    /// ## Summary
    /// Creates a new attendee that delegated to `to`.
    ///
    /// ## Errors
    /// Fails if `to` is unknown or the new record is invalid.
    pub fn delegate_from_new(
        &mut self,
        to: AttendeeId,
        data: impl Into<AttendeeData>,
    ) -> RfcResult<AttendeeId> {
        self.attendee_slot(to)?;
        let from = self.create_attendee(data)?;
        self.delegate(from, to)?;
        Ok(from)
    }

    #[must_use]
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn alarms_mut(&mut self) -> &mut [Alarm] {
        &mut self.alarms
    }

    /// ## Summary
    /// Adds an alarm.
    ///
    /// ## Errors
    /// Fails if the record is invalid, or if it is an email alarm without
    /// recipients while the event has no attendees either.
    pub fn create_alarm(&mut self, data: AlarmData) -> RfcResult<&mut Alarm> {
        let alarm = Alarm::new(data)?;
        if alarm.kind() == Some(AlarmType::Email)
            && alarm.attendees().is_empty()
            && self.attendees.is_empty()
        {
            return Err(RfcError::invalid(
                "alarm.type",
                "email alarms need at least one attendee",
            ));
        }
        self.alarms.push(alarm);
        let index = self.alarms.len() - 1;
        Ok(&mut self.alarms[index])
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// ## Summary
    /// Adds a category.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if the name is empty.
    pub fn create_category(&mut self, data: impl Into<CategoryData>) -> RfcResult<&mut Category> {
        self.categories.push(Category::new(data)?);
        let index = self.categories.len() - 1;
        Ok(&mut self.categories[index])
    }

    #[must_use]
    pub const fn status(&self) -> Option<EventStatus> {
        self.status
    }

    pub fn set_status(&mut self, status: EventStatus) -> &mut Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn busystatus(&self) -> Option<BusyStatus> {
        self.busystatus
    }

    pub fn set_busystatus(&mut self, busystatus: BusyStatus) -> &mut Self {
        self.busystatus = Some(busystatus);
        self
    }

    #[must_use]
    pub const fn priority(&self) -> Option<u8> {
        self.priority
    }

    /// ## Summary
    /// Sets `PRIORITY` (0 undefined, 1 highest, 9 lowest).
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` above 9.
    pub fn set_priority(&mut self, priority: u8) -> RfcResult<&mut Self> {
        if priority > MAX_PRIORITY {
            return Err(RfcError::invalid(
                "priority",
                format!("must be between 0 and {MAX_PRIORITY}"),
            ));
        }
        self.priority = Some(priority);
        Ok(self)
    }

    #[must_use]
    pub const fn class(&self) -> Option<EventClass> {
        self.class
    }

    pub fn set_class(&mut self, class: EventClass) -> &mut Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    pub fn create_attachment(&mut self, uri: impl Into<String>) -> &mut Self {
        self.attachments.push(uri.into());
        self
    }

    #[must_use]
    pub const fn transparency(&self) -> Option<Transparency> {
        self.transparency
    }

    pub fn set_transparency(&mut self, transparency: Transparency) -> &mut Self {
        self.transparency = Some(transparency);
        self
    }

    #[must_use]
    pub const fn created(&self) -> Option<&CalDateTime> {
        self.created.as_ref()
    }

    /// ## Summary
    /// Sets `CREATED`.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_created(&mut self, created: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.created = Some(created.into_date_time("created")?);
        Ok(self)
    }

    #[must_use]
    pub const fn last_modified(&self) -> Option<&CalDateTime> {
        self.last_modified.as_ref()
    }

    /// ## Summary
    /// Sets `LAST-MODIFIED`.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidDate` if the value is not a date.
    pub fn set_last_modified(&mut self, modified: impl IntoDateTime) -> RfcResult<&mut Self> {
        self.last_modified = Some(modified.into_date_time("lastModified")?);
        Ok(self)
    }

    #[must_use]
    pub const fn x(&self) -> &CustomAttributes {
        &self.x
    }

    /// ## Summary
    /// Replaces the custom attributes.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if a key lacks the `X-` prefix.
    pub fn set_x<I, K, V>(&mut self, pairs: I) -> RfcResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.x = CustomAttributes::try_from_pairs(pairs)?;
        Ok(self)
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
    pub fn to_json(&self) -> EventData {
        EventData {
            id: Some(self.id.clone()),
            sequence: self.sequence,
            start: self.start.clone(),
            end: self.end.clone(),
            recurrence_id: self.recurrence_id.clone(),
            timezone: self.timezone.clone(),
            stamp: Some(self.stamp.clone()),
            all_day: self.all_day,
            floating: self.floating,
            repeating: self.repeating.clone(),
            summary: self.summary.clone(),
            location: self.location.clone().map(LocationInput::Structured),
            geo: self.geo,
            description: self.description.clone().map(DescriptionInput::Rich),
            organizer: self.organizer.clone().map(PersonInput::Record),
            attendees: self
                .attendees
                .iter()
                .map(|a| a.to_json(&self.attendees))
                .collect(),
            alarms: self.alarms.iter().map(Alarm::to_json).collect(),
            categories: self.categories.iter().map(Category::to_json).collect(),
            status: self.status,
            busystatus: self.busystatus,
            priority: self.priority,
            class: self.class,
            url: self.url.clone(),
            attachments: self.attachments.clone(),
            transparency: self.transparency,
            created: self.created.clone(),
            last_modified: self.last_modified.clone(),
            x: self.x.clone(),
        }
    }

    /// ## Summary
    /// Renders the `VEVENT` block, CRLF-terminated and unfolded.
    ///
    /// `calendar_timezone` is used when the event has no zone of its own.
    ///
    /// ## Errors
    /// Returns `RfcError::MissingField` without start or summary, and
    /// propagates errors of attendees, alarms and date rendering.
    pub fn render(&self, calendar_timezone: Option<&str>) -> RfcResult<String> {
        let start = self
            .start
            .as_ref()
            .ok_or_else(|| RfcError::missing("event", "start"))?;
        let summary = self
            .summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RfcError::missing("event", "summary"))?;

        let timezone = self.effective_timezone(calendar_timezone);

        let mut out = String::from("BEGIN:VEVENT\r\n");
        out.push_str(&format!("UID:{}\r\n", self.id));
        out.push_str(&format!("SEQUENCE:{}\r\n", self.sequence));
        out.push_str(&utc_line("DTSTAMP", &self.stamp)?);

        if !self.categories.is_empty() {
            let names: Vec<String> = self.categories.iter().map(Category::render).collect();
            out.push_str(&format!("CATEGORIES:{}\r\n", names.join(",")));
        }

        self.push_dates(&mut out, timezone, start)?;
        out.push_str(&format!("SUMMARY:{}\r\n", escape(summary, false)));
        self.push_details(&mut out, summary)?;
        self.push_classification(&mut out);

        out.push_str(&self.x.to_lines());
        out.push_str("END:VEVENT\r\n");
        Ok(out)
    }

    fn push_dates(
        &self,
        out: &mut String,
        timezone: Option<&str>,
        start: &CalDateTime,
    ) -> RfcResult<()> {
        let context = DateContext {
            timezone: self.timezone.as_deref(),
            floating: self.floating,
        };

        if let Some(recurrence_id) = &self.recurrence_id {
            out.push_str(&format_date_with_property(
                timezone,
                "RECURRENCE-ID",
                recurrence_id,
                context,
            )?);
            out.push_str("\r\n");
        }
        if let Some(created) = &self.created {
            out.push_str(&utc_line("CREATED", created)?);
        }
        if let Some(modified) = &self.last_modified {
            out.push_str(&utc_line("LAST-MODIFIED", modified)?);
        }

        if self.all_day {
            out.push_str(&format!(
                "DTSTART;VALUE=DATE:{}\r\n",
                format_date(timezone, start, true, false)?
            ));
            if let Some(end) = &self.end {
                out.push_str(&format!(
                    "DTEND;VALUE=DATE:{}\r\n",
                    format_date(timezone, end, true, false)?
                ));
            }
            out.push_str("X-MICROSOFT-CDO-ALLDAYEVENT:TRUE\r\n");
            out.push_str("X-MICROSOFT-MSNCALENDAR-ALLDAYEVENT:TRUE\r\n");
        } else {
            out.push_str(&format_date_with_property(timezone, "DTSTART", start, context)?);
            out.push_str("\r\n");
            if let Some(end) = &self.end {
                out.push_str(&format_date_with_property(timezone, "DTEND", end, context)?);
                out.push_str("\r\n");
            }
        }

        if let Some(repeating) = &self.repeating {
            out.push_str(&repeating_lines(
                repeating,
                RecurrenceContext {
                    timezone,
                    floating: self.floating,
                    all_day: self.all_day,
                },
            )?);
        }
        Ok(())
    }

    fn push_details(&self, out: &mut String, summary: &str) -> RfcResult<()> {
        if let Some(location) = &self.location {
            out.push_str(&location.to_lines());
        }
        if let Some(geo) = &self.geo
            && self.location.as_ref().is_none_or(|l| l.geo.is_none())
        {
            out.push_str(&geo.to_line());
        }
        if let Some(description) = &self.description {
            out.push_str(&description.to_lines());
        }
        if let Some(organizer) = &self.organizer {
            out.push_str(&organizer_line(organizer)?);
        }

        for attendee in &self.attendees {
            out.push_str(&attendee.render(&self.attendees)?);
        }
        for attachment in &self.attachments {
            out.push_str(&format!("ATTACH:{}\r\n", escape(attachment, false)));
        }
        for alarm in &self.alarms {
            out.push_str(&alarm.render(summary, &self.attendees)?);
        }
        Ok(())
    }

    fn push_classification(&self, out: &mut String) {
        if let Some(url) = &self.url {
            out.push_str(&format!("URL;VALUE=URI:{}\r\n", escape(url, false)));
        }
        if let Some(status) = self.status {
            out.push_str(&format!("STATUS:{status}\r\n"));
        }
        if let Some(busystatus) = self.busystatus {
            out.push_str(&format!("X-MICROSOFT-CDO-BUSYSTATUS:{busystatus}\r\n"));
        }
        if let Some(priority) = self.priority {
            out.push_str(&format!("PRIORITY:{priority}\r\n"));
        }
        if let Some(class) = self.class {
            out.push_str(&format!("CLASS:{class}\r\n"));
        }
        if let Some(transparency) = self.transparency {
            out.push_str(&format!("TRANSP:{transparency}\r\n"));
        }
    }
}

impl TryFrom<EventData> for Event {
    type Error = RfcError;

    fn try_from(data: EventData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

fn utc_line(property: &str, value: &CalDateTime) -> RfcResult<String> {
    Ok(format!("{property}:{}\r\n", format_date(None, value, false, false)?))
}

fn organizer_line(organizer: &Person) -> RfcResult<String> {
    let address = organizer
        .address()
        .ok_or_else(|| RfcError::missing("organizer", "email"))?;

    let mut line = format!("ORGANIZER;CN=\"{}\"", escape(&organizer.name, true));
    if let Some(sent_by) = &organizer.sent_by {
        line.push_str(&format!(";SENT-BY=\"mailto:{}\"", escape(sent_by, true)));
    }
    if let (Some(email), Some(_)) = (&organizer.email, &organizer.mailto) {
        line.push_str(&format!(";EMAIL={}", escape(email, false)));
    }
    line.push_str(&format!(":mailto:{}\r\n", escape(address, false)));
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{Frequency, RepeatingRule, Weekday};

    fn event(json: &str) -> Event {
        Event::new(serde_json::from_str(json).unwrap()).unwrap()
    }

    fn lines(block: &str) -> Vec<&str> {
        block.trim_end().split("\r\n").collect()
    }

    #[test]
    fn start_after_end_is_swapped() {
        let e = event(
            r#"{"start":"2021-07-01T12:00:00Z","end":"2021-07-01T10:00:00Z","summary":"x"}"#,
        );
        assert!(e.start().unwrap() < e.end().unwrap());
        assert_eq!(e.start().unwrap().to_iso_string(), "2021-07-01T10:00:00.000Z");

        let mut e = e;
        e.set_end("2021-07-01T08:00:00Z").unwrap();
        assert_eq!(e.start().unwrap().to_iso_string(), "2021-07-01T08:00:00.000Z");
        assert_eq!(e.end().unwrap().to_iso_string(), "2021-07-01T10:00:00.000Z");
    }

    #[test]
    fn invalid_dates_name_the_attribute() {
        let mut e = Event::new(EventData::default()).unwrap();
        let err = e.set_start("soon").unwrap_err();
        assert!(err.to_string().contains("`start`"));
        assert!(e.start().is_none());
    }

    #[test]
    fn timezone_and_floating_exclude_each_other() {
        let mut e = Event::new(EventData::default()).unwrap();
        e.set_timezone(Some("Europe/Berlin"));
        assert_eq!(e.timezone(), Some("Europe/Berlin"));

        e.set_floating(true);
        assert!(e.floating());
        assert_eq!(e.timezone(), None);

        e.set_timezone(Some("America/New_York"));
        assert!(!e.floating());

        e.set_timezone(Some("UTC"));
        assert_eq!(e.timezone(), None);
    }

    #[test]
    fn defaults() {
        let e = Event::new(EventData::default()).unwrap();
        assert_eq!(e.id().len(), 36);
        assert_eq!(e.sequence(), 0);
        assert!(e.summary().is_none());
    }

    #[test]
    fn missing_fields_fail_generation() {
        let e = event(r#"{"summary":"x"}"#);
        assert_eq!(
            e.render(None).unwrap_err().to_string(),
            "No value for `start` in event given"
        );

        let e = event(r#"{"start":"2021-07-01T10:00:00Z"}"#);
        assert_eq!(
            e.render(None).unwrap_err().to_string(),
            "No value for `summary` in event given"
        );
    }

    #[test]
    fn delegation_cycle_terminates() {
        let mut e = event(r#"{"id":"d","start":"2021-07-01T10:00:00Z","summary":"x"}"#);
        let a = e.create_attendee(AttendeeData::new("A", "a@example.com")).unwrap();
        let b = e.create_attendee(AttendeeData::new("B", "b@example.com")).unwrap();

        e.delegate(a, b).unwrap();
        assert_eq!(e.attendee(a).unwrap().delegated_to(), Some(&Delegate::Attendee(b)));
        assert_eq!(e.attendee(b).unwrap().delegated_from(), Some(&Delegate::Attendee(a)));
        assert_eq!(e.attendee(a).unwrap().status(), Some(AttendeeStatus::Delegated));

        e.delegate(b, a).unwrap();
        let block = e.render(None).unwrap();
        assert!(block.contains(
            "ATTENDEE;ROLE=REQ-PARTICIPANT;PARTSTAT=DELEGATED;DELEGATED-TO=\"b@example.com\";\
             DELEGATED-FROM=\"b@example.com\";CN=\"A\":MAILTO:a@example.com\r\n"
        ));
        assert!(block.contains(
            "ATTENDEE;ROLE=REQ-PARTICIPANT;PARTSTAT=DELEGATED;DELEGATED-TO=\"a@example.com\";\
             DELEGATED-FROM=\"a@example.com\";CN=\"B\":MAILTO:b@example.com\r\n"
        ));
    }

    #[test]
    fn delegate_to_and_from_new() {
        let mut e = Event::new(EventData::default()).unwrap();
        let a = e.create_attendee(AttendeeData::new("A", "a@example.com")).unwrap();

        let b = e.delegate_to_new(a, AttendeeData::new("B", "b@example.com")).unwrap();
        assert_eq!(e.attendees().len(), 2);
        assert_eq!(e.attendee(b).unwrap().delegated_from(), Some(&Delegate::Attendee(a)));

        let c = e.delegate_from_new(a, AttendeeData::new("C", "c@example.com")).unwrap();
        assert_eq!(e.attendee(c).unwrap().delegated_to(), Some(&Delegate::Attendee(a)));
        assert_eq!(e.attendee(a).unwrap().delegated_from(), Some(&Delegate::Attendee(c)));

        assert!(e.delegate(a, AttendeeId(42)).is_err());
        assert!(e.delegate_to_new(AttendeeId(42), AttendeeData::default()).is_err());
        assert_eq!(e.attendees().len(), 3);
    }

    #[test]
    fn delegation_text_resolves_to_siblings() {
        let e = event(
            r#"{"attendees":[
                {"name":"A","email":"a@example.com","delegatedTo":"b@example.com"},
                {"name":"B","email":"b@example.com","delegatedFrom":"a@example.com"},
                {"name":"C","email":"c@example.com","delegatedTo":"Dana <d@example.com>"}
            ]}"#,
        );

        let a = e.find_attendee("a@example.com").unwrap();
        let b = e.find_attendee("b@example.com").unwrap();
        let c = e.find_attendee("c@example.com").unwrap();
        assert_eq!(e.attendee(a).unwrap().delegated_to(), Some(&Delegate::Attendee(b)));
        assert_eq!(e.attendee(b).unwrap().delegated_from(), Some(&Delegate::Attendee(a)));
        assert_eq!(
            e.attendee(c).unwrap().delegated_to(),
            Some(&Delegate::Contact(Person::new("Dana", "d@example.com")))
        );
        assert_eq!(e.attendee(c).unwrap().status(), Some(AttendeeStatus::Delegated));
    }

    #[test]
    fn email_alarm_needs_recipients() {
        let mut e = Event::new(EventData::default()).unwrap();
        let data: AlarmData = serde_json::from_str(r#"{"type":"email"}"#).unwrap();
        assert!(e.create_alarm(data.clone()).is_err());

        e.create_attendee(AttendeeData::new("A", "a@example.com")).unwrap();
        assert!(e.create_alarm(data).is_ok());
    }

    #[test]
    fn priority_range() {
        let mut e = Event::new(EventData::default()).unwrap();
        assert!(e.set_priority(9).is_ok());
        assert!(e.set_priority(10).is_err());
        assert_eq!(e.priority(), Some(9));
    }

    #[test]
    fn full_event_order() {
        let mut e = event(
            r#"{
                "id": "full",
                "sequence": 2,
                "stamp": "2021-06-01T00:00:00Z",
                "start": "2021-07-01T10:00:00Z",
                "end": "2021-07-01T11:00:00Z",
                "created": "2021-05-01T00:00:00Z",
                "lastModified": "2021-05-02T00:00:00Z",
                "summary": "Planning; Q3",
                "location": "Room 7",
                "geo": {"lat": 1.5, "lon": -2.25},
                "description": {"plain": "Agenda", "html": "<b>Agenda</b>"},
                "organizer": "Olga <olga@example.com>",
                "attendees": [{"email": "a@example.com", "rsvp": false}],
                "alarms": [{"trigger": -300}],
                "categories": [{"name": "Work"}, {"name": "Q3"}],
                "attachments": ["https://example.com/agenda.pdf"],
                "url": "https://example.com/e/full",
                "status": "confirmed",
                "busystatus": "busy",
                "priority": 1,
                "class": "private",
                "transparency": "opaque",
                "x": {"X-CUSTOM": "yes"}
            }"#,
        );
        e.set_repeating(RepeatingRule {
            by_day: vec![Weekday::Thursday],
            ..RepeatingRule::new(Frequency::Weekly)
        })
        .unwrap();

        assert_eq!(
            lines(&e.render(None).unwrap()),
            vec![
                "BEGIN:VEVENT",
                "UID:full",
                "SEQUENCE:2",
                "DTSTAMP:20210601T000000Z",
                "CATEGORIES:Work,Q3",
                "CREATED:20210501T000000Z",
                "LAST-MODIFIED:20210502T000000Z",
                "DTSTART:20210701T100000Z",
                "DTEND:20210701T110000Z",
                "RRULE:FREQ=WEEKLY;BYDAY=TH",
                "SUMMARY:Planning\\; Q3",
                "LOCATION:Room 7",
                "GEO:1.5;-2.25",
                "DESCRIPTION:Agenda",
                "X-ALT-DESC;FMTTYPE=text/html:<b>Agenda</b>",
                "ORGANIZER;CN=\"Olga\":mailto:olga@example.com",
                "ATTENDEE;ROLE=REQ-PARTICIPANT;RSVP=FALSE:MAILTO:a@example.com",
                "ATTACH:https://example.com/agenda.pdf",
                "BEGIN:VALARM",
                "ACTION:DISPLAY",
                "TRIGGER:-PT5M",
                "DESCRIPTION:Planning\\; Q3",
                "END:VALARM",
                "URL;VALUE=URI:https://example.com/e/full",
                "STATUS:CONFIRMED",
                "X-MICROSOFT-CDO-BUSYSTATUS:BUSY",
                "PRIORITY:1",
                "CLASS:PRIVATE",
                "TRANSP:OPAQUE",
                "X-CUSTOM:yes",
                "END:VEVENT",
            ]
        );
    }

    #[test]
    fn all_day_and_timezone_forms() {
        let e = event(
            r#"{"id":"ad","stamp":"2021-06-01T00:00:00Z","start":"2021-07-01","end":"2021-07-02",
                "allDay":true,"summary":"Holiday"}"#,
        );
        let block = e.render(Some("Europe/Berlin")).unwrap();
        assert!(block.contains(
            "DTSTART;VALUE=DATE:20210701\r\nDTEND;VALUE=DATE:20210702\r\n\
             X-MICROSOFT-CDO-ALLDAYEVENT:TRUE\r\nX-MICROSOFT-MSNCALENDAR-ALLDAYEVENT:TRUE\r\n"
        ));

        let e = event(
            r#"{"id":"tz","stamp":"2021-06-01T00:00:00Z","start":"2021-07-01T10:00:00Z",
                "timezone":"Europe/Berlin","summary":"Call",
                "repeating":{"freq":"DAILY","count":2,"exclude":["2021-07-02T10:00:00Z"]}}"#,
        );
        let block = e.render(None).unwrap();
        assert!(block.contains("DTSTART;TZID=Europe/Berlin:20210701T120000\r\n"));
        assert!(block.contains("RRULE:FREQ=DAILY;COUNT=2\r\n"));
        assert!(block.contains("EXDATE;TZID=Europe/Berlin:20210702T120000\r\n"));

        let e = event(
            r#"{"id":"fl","start":"2021-07-01T10:00:00+02:00","floating":true,"summary":"Local"}"#,
        );
        assert!(e.render(None).unwrap().contains("DTSTART:20210701T100000\r\n"));
    }

    #[test]
    fn structured_location_suppresses_direct_geo() {
        let e = event(
            r#"{"start":"2021-07-01T10:00:00Z","summary":"x","geo":{"lat":9.0,"lon":9.0},
                "location":{"title":"Hall","radius":40,"geo":{"lat":1.0,"lon":2.0}}}"#,
        );
        let block = e.render(None).unwrap();
        assert!(block.contains(
            "X-APPLE-STRUCTURED-LOCATION;VALUE=URI;X-APPLE-RADIUS=40;X-TITLE=Hall:geo:1,2\r\n"
        ));
        assert!(block.contains("GEO:1;2\r\n"));
        assert!(!block.contains("GEO:9;9"));
    }
}
