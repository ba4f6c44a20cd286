//! People referenced by events: organizers and detached contacts.

use serde::{Deserialize, Serialize};

use crate::error::{RfcError, RfcResult};

/// A named person with a calendar address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Address used in the `mailto:` value instead of `email`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_by: Option<String>,
}

impl Person {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: Some(email.into()),
            mailto: None,
            sent_by: None,
        }
    }

    /// Returns the address rendered after `mailto:`.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.mailto.as_deref().or(self.email.as_deref())
    }

    /// ## Summary
    /// Parses `Name <email>`, or a bare address used as both name and email.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` for any other shape or an empty name.
    pub fn parse(attribute: &str, value: &str) -> RfcResult<Self> {
        let value = value.trim();

        let person = if let Some((name, rest)) = value.split_once('<')
            && let Some(email) = rest.strip_suffix('>')
            && !email.trim().is_empty()
        {
            Self::new(name.trim(), email.trim())
        } else if value.contains('@') && !value.contains(['<', '>']) {
            Self::new(value, value)
        } else {
            return Err(RfcError::invalid(
                attribute,
                "has invalid format, expected `Name <email>`",
            ));
        };

        person.checked(attribute)
    }

    /// ## Summary
    /// Ensures the record carries a name.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if the name is empty.
    pub fn checked(self, attribute: &str) -> RfcResult<Self> {
        if self.name.trim().is_empty() {
            return Err(RfcError::invalid(format!("{attribute}.name"), "is empty"));
        }
        Ok(self)
    }
}

/// Either a `Name <email>` string or a structured record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonInput {
    Text(String),
    Record(Person),
}

impl PersonInput {
    /// ## Summary
    /// Normalizes the input into a [`Person`].
    ///
    /// ## Errors
    /// See [`Person::parse`] and [`Person::checked`].
    pub fn into_person(self, attribute: &str) -> RfcResult<Person> {
        match self {
            Self::Text(text) => Person::parse(attribute, &text),
            Self::Record(person) => person.checked(attribute),
        }
    }
}

impl From<&str> for PersonInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for PersonInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Person> for PersonInput {
    fn from(person: Person) -> Self {
        Self::Record(person)
    }
}
