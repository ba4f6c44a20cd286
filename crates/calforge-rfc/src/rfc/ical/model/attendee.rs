//! Event attendees (`ATTENDEE`) and delegation references.

use serde::{Deserialize, Serialize};

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::escape;
use crate::rfc::ical::core::{
    AttendeeRole, AttendeeStatus, AttendeeType, CustomAttributes, Person,
};

/// Handle of an attendee inside its event's attendee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttendeeId(pub(crate) usize);

impl AttendeeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Target of a delegation edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delegate {
    /// Another attendee of the same event.
    Attendee(AttendeeId),
    /// Someone who is not an attendee of the event.
    Contact(Person),
}

/// Serializable attendee record.
///
/// Delegation references are stored as `Name <email>` text or a bare address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendeeData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mailto: Option<String>,
    pub sent_by: Option<String>,
    pub status: Option<AttendeeStatus>,
    pub role: AttendeeRole,
    pub rsvp: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<AttendeeType>,
    pub delegated_to: Option<String>,
    pub delegated_from: Option<String>,
    #[serde(skip_serializing_if = "CustomAttributes::is_empty")]
    pub x: CustomAttributes,
}

impl AttendeeData {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

impl From<Person> for AttendeeData {
    fn from(person: Person) -> Self {
        Self {
            name: Some(person.name),
            email: person.email,
            mailto: person.mailto,
            sent_by: person.sent_by,
            ..Self::default()
        }
    }
}

/// An event participant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attendee {
    name: Option<String>,
    email: Option<String>,
    mailto: Option<String>,
    sent_by: Option<String>,
    status: Option<AttendeeStatus>,
    role: AttendeeRole,
    rsvp: Option<bool>,
    kind: Option<AttendeeType>,
    delegated_to: Option<Delegate>,
    delegated_from: Option<Delegate>,
    x: CustomAttributes,
}

impl Attendee {
    /// Builds an attendee without its delegation references.
    ///
    /// Delegations name other attendees, so the owning event resolves them
    /// once every sibling exists.
    pub(crate) fn from_record(data: AttendeeData) -> Self {
        Self {
            name: data.name,
            email: data.email,
            mailto: data.mailto,
            sent_by: data.sent_by,
            status: data.status,
            role: data.role,
            rsvp: data.rsvp,
            kind: data.kind,
            delegated_to: None,
            delegated_from: None,
            x: data.x,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn mailto(&self) -> Option<&str> {
        self.mailto.as_deref()
    }

    pub fn set_mailto(&mut self, mailto: impl Into<String>) -> &mut Self {
        self.mailto = Some(mailto.into());
        self
    }

    #[must_use]
    pub fn sent_by(&self) -> Option<&str> {
        self.sent_by.as_deref()
    }

    pub fn set_sent_by(&mut self, sent_by: impl Into<String>) -> &mut Self {
        self.sent_by = Some(sent_by.into());
        self
    }

    #[must_use]
    pub const fn role(&self) -> AttendeeRole {
        self.role
    }

    pub fn set_role(&mut self, role: AttendeeRole) -> &mut Self {
        self.role = role;
        self
    }

    #[must_use]
    pub const fn status(&self) -> Option<AttendeeStatus> {
        self.status
    }

    pub fn set_status(&mut self, status: AttendeeStatus) -> &mut Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn rsvp(&self) -> Option<bool> {
        self.rsvp
    }

    pub fn set_rsvp(&mut self, rsvp: bool) -> &mut Self {
        self.rsvp = Some(rsvp);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> Option<AttendeeType> {
        self.kind
    }

    pub fn set_kind(&mut self, kind: AttendeeType) -> &mut Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub const fn delegated_to(&self) -> Option<&Delegate> {
        self.delegated_to.as_ref()
    }

    #[must_use]
    pub const fn delegated_from(&self) -> Option<&Delegate> {
        self.delegated_from.as_ref()
    }

    pub(crate) fn set_delegated_to(&mut self, delegate: Delegate) {
        self.delegated_to = Some(delegate);
    }

    pub(crate) fn set_delegated_from(&mut self, delegate: Delegate) {
        self.delegated_from = Some(delegate);
    }

    #[must_use]
    pub const fn x(&self) -> &CustomAttributes {
        &self.x
    }

    /// ## Summary
    /// Replaces the custom parameters.
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
    /// Snapshots the attendee. `siblings` is the owning event's attendee
    /// list, used to turn delegation handles back into addresses.
    #[must_use]
    pub fn to_json(&self, siblings: &[Self]) -> AttendeeData {
        AttendeeData {
            name: self.name.clone(),
            email: self.email.clone(),
            mailto: self.mailto.clone(),
            sent_by: self.sent_by.clone(),
            status: self.status,
            role: self.role,
            rsvp: self.rsvp,
            kind: self.kind,
            delegated_to: self
                .delegated_to
                .as_ref()
                .and_then(|d| delegate_text(d, siblings)),
            delegated_from: self
                .delegated_from
                .as_ref()
                .and_then(|d| delegate_text(d, siblings)),
            x: self.x.clone(),
        }
    }

    /// ## Summary
    /// Renders the `ATTENDEE` content line, CRLF-terminated.
    ///
    /// Delegation references render as the delegate's address only, so
    /// cyclic delegation never recurses.
    ///
    /// ## Errors
    /// Returns `RfcError::MissingField` if the attendee has no email.
    pub fn render(&self, siblings: &[Self]) -> RfcResult<String> {
        let Some(email) = self.email.as_deref() else {
            return Err(RfcError::missing("attendee", "email"));
        };

        let mut line = format!("ATTENDEE;ROLE={}", self.role);
        if let Some(kind) = self.kind {
            line.push_str(&format!(";CUTYPE={kind}"));
        }
        if let Some(status) = self.status {
            line.push_str(&format!(";PARTSTAT={status}"));
        }
        if let Some(rsvp) = self.rsvp {
            line.push_str(if rsvp { ";RSVP=TRUE" } else { ";RSVP=FALSE" });
        }
        if let Some(sent_by) = &self.sent_by {
            line.push_str(&format!(";SENT-BY=\"mailto:{}\"", escape(sent_by, true)));
        }
        if let Some(to) = self.delegated_to.as_ref().and_then(|d| delegate_email(d, siblings)) {
            line.push_str(&format!(";DELEGATED-TO=\"{}\"", escape(to, true)));
        }
        if let Some(from) = self
            .delegated_from
            .as_ref()
            .and_then(|d| delegate_email(d, siblings))
        {
            line.push_str(&format!(";DELEGATED-FROM=\"{}\"", escape(from, true)));
        }
        if let Some(name) = &self.name {
            line.push_str(&format!(";CN=\"{}\"", escape(name, true)));
        }
        if self.mailto.is_some() {
            line.push_str(&format!(";EMAIL={}", escape(email, false)));
        }
        line.push_str(&self.x.to_parameters());

        let address = self.mailto.as_deref().unwrap_or(email);
        line.push_str(&format!(":MAILTO:{}\r\n", escape(address, false)));
        Ok(line)
    }
}

fn delegate_email<'a>(delegate: &'a Delegate, siblings: &'a [Attendee]) -> Option<&'a str> {
    match delegate {
        Delegate::Attendee(id) => siblings.get(id.0).and_then(Attendee::email),
        Delegate::Contact(person) => person.email.as_deref().or(person.mailto.as_deref()),
    }
}

fn delegate_text(delegate: &Delegate, siblings: &[Attendee]) -> Option<String> {
    match delegate {
        Delegate::Attendee(_) => delegate_email(delegate, siblings).map(str::to_string),
        Delegate::Contact(person) => {
            let email = delegate_email(delegate, siblings)?;
            Some(if person.name == email {
                email.to_string()
            } else {
                format!("{} <{email}>", person.name)
            })
        }
    }
}
