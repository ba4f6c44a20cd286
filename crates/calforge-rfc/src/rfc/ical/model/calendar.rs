//! The calendar root (`VCALENDAR`) and document generation.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use calforge_core::constants::DEFAULT_PROD_ID;
use serde::{Deserialize, Serialize};

use super::event::{Event, EventData};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::{escape, fold_lines};
use crate::rfc::ical::core::{CalendarMethod, CustomAttributes, to_duration_string};

const DEFAULT_PROD_LANGUAGE: &str = "EN";

/// Structured product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdIdParts {
    pub company: String,
    pub product: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// `//company//product//LANG` text or its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProdIdInput {
    Text(String),
    Parts(ProdIdParts),
}

impl From<&str> for ProdIdInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ProdIdParts> for ProdIdInput {
    fn from(parts: ProdIdParts) -> Self {
        Self::Parts(parts)
    }
}

impl ProdIdInput {
    fn into_text(self) -> RfcResult<String> {
        match self {
            Self::Text(text) => {
                check_prod_id(&text)?;
                Ok(text)
            }
            Self::Parts(parts) => {
                if parts.company.is_empty() || parts.product.is_empty() {
                    return Err(RfcError::invalid(
                        "prodId",
                        "company and product must not be empty",
                    ));
                }
                let language = parts
                    .language
                    .as_deref()
                    .unwrap_or(DEFAULT_PROD_LANGUAGE)
                    .to_uppercase();
                let text = format!("//{}//{}//{language}", parts.company, parts.product);
                check_prod_id(&text)?;
                Ok(text)
            }
        }
    }
}

fn check_prod_id(text: &str) -> RfcResult<()> {
    let well_formed = text
        .strip_prefix("//")
        .and_then(|rest| rest.rsplit_once("//"))
        .and_then(|(head, language)| {
            let (company, product) = head.split_once("//")?;
            Some(
                !company.is_empty()
                    && !product.is_empty()
                    && (1..=4).contains(&language.len())
                    && language.chars().all(|c| c.is_ascii_uppercase()),
            )
        })
        .unwrap_or(false);

    if well_formed {
        Ok(())
    } else {
        Err(RfcError::invalid(
            "prodId",
            "expected `//company//product//LANG`",
        ))
    }
}

/// Caller-supplied producer of `VTIMEZONE` blocks, keyed by zone name.
#[derive(Clone)]
pub struct TimezoneGenerator(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>);

impl TimezoneGenerator {
    #[must_use]
    pub fn new(generator: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(generator))
    }

    fn block(&self, zone: &str) -> Option<String> {
        let raw = (self.0)(zone)?;
        let block = raw.replace("\r\n", "\n").replace('\n', "\r\n");
        let block = block.trim();
        (!block.is_empty()).then(|| block.to_string())
    }
}

impl fmt::Debug for TimezoneGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TimezoneGenerator(..)")
    }
}

/// Serializable calendar record.
///
/// The timezone generator is not part of the record; reattach it after
/// loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarData {
    pub prod_id: Option<ProdIdInput>,
    pub method: Option<CalendarMethod>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub scale: Option<String>,
    pub ttl: Option<i64>,
    pub events: Vec<EventData>,
    #[serde(skip_serializing_if = "CustomAttributes::is_empty")]
    pub x: CustomAttributes,
}

/// A calendar and its events.
///
/// The generated document is memoized; every mutable access drops the memo.
#[derive(Debug, Clone)]
pub struct Calendar {
    prod_id: String,
    method: Option<CalendarMethod>,
    name: Option<String>,
    description: Option<String>,
    timezone: Option<String>,
    timezone_generator: Option<TimezoneGenerator>,
    source: Option<String>,
    url: Option<String>,
    scale: Option<String>,
    ttl: Option<i64>,
    events: Vec<Event>,
    x: CustomAttributes,
    generated: RefCell<Option<String>>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            prod_id: DEFAULT_PROD_ID.to_string(),
            method: None,
            name: None,
            description: None,
            timezone: None,
            timezone_generator: None,
            source: None,
            url: None,
            scale: None,
            ttl: None,
            events: Vec::new(),
            x: CustomAttributes::default(),
            generated: RefCell::new(None),
        }
    }
}

impl Calendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Creates a calendar from its record.
    ///
    /// ## Errors
    /// Returns the first validation error of the calendar or any event.
    pub fn from_data(data: CalendarData) -> RfcResult<Self> {
        let mut calendar = Self {
            method: data.method,
            name: data.name,
            description: data.description,
            source: data.source,
            url: data.url,
            x: data.x,
            ..Self::default()
        };

        if let Some(prod_id) = data.prod_id {
            calendar.set_prod_id(prod_id)?;
        }
        calendar.set_timezone(data.timezone.as_deref());
        if let Some(scale) = data.scale {
            calendar.set_scale(scale);
        }
        if let Some(ttl) = data.ttl {
            calendar.set_ttl(ttl)?;
        }
        calendar.set_events(data.events)?;

        Ok(calendar)
    }

    /// ## Summary
    /// Parses a JSON calendar record.
    ///
    /// ## Errors
    /// Returns `RfcError::Json` for malformed JSON, otherwise see
    /// [`Calendar::from_data`].
    pub fn from_json(json: &str) -> RfcResult<Self> {
        Self::from_data(serde_json::from_str(json)?)
    }

    fn invalidate(&mut self) {
        *self.generated.get_mut() = None;
    }

    #[must_use]
    pub fn prod_id(&self) -> &str {
        &self.prod_id
    }

    /// ## Summary
    /// Sets the product identifier from `//company//product//LANG` text or
    /// its parts (language defaults to `EN`).
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` for malformed text or empty parts.
    pub fn set_prod_id(&mut self, prod_id: impl Into<ProdIdInput>) -> RfcResult<&mut Self> {
        self.prod_id = prod_id.into().into_text()?;
        self.invalidate();
        Ok(self)
    }

    #[must_use]
    pub const fn method(&self) -> Option<CalendarMethod> {
        self.method
    }

    pub fn set_method(&mut self, method: Option<CalendarMethod>) -> &mut Self {
        self.method = method;
        self.invalidate();
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self.invalidate();
        self
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self.invalidate();
        self
    }

    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn set_timezone(&mut self, timezone: Option<&str>) -> &mut Self {
        self.timezone = timezone.filter(|tz| !tz.is_empty()).map(str::to_string);
        self.invalidate();
        self
    }

    /// Installs the producer of `VTIMEZONE` blocks.
    pub fn set_timezone_generator(
        &mut self,
        generator: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> &mut Self {
        self.timezone_generator = Some(TimezoneGenerator::new(generator));
        self.invalidate();
        self
    }

    pub fn clear_timezone_generator(&mut self) -> &mut Self {
        self.timezone_generator = None;
        self.invalidate();
        self
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = Some(source.into());
        self.invalidate();
        self
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self.invalidate();
        self
    }

    #[must_use]
    pub fn scale(&self) -> Option<&str> {
        self.scale.as_deref()
    }

    /// Sets `CALSCALE`; stored uppercase.
    pub fn set_scale(&mut self, scale: impl AsRef<str>) -> &mut Self {
        self.scale = Some(scale.as_ref().to_uppercase());
        self.invalidate();
        self
    }

    /// Refresh interval in seconds.
    #[must_use]
    pub const fn ttl(&self) -> Option<i64> {
        self.ttl
    }

    /// ## Summary
    /// Sets the refresh interval in seconds.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` unless `ttl` is positive.
    pub fn set_ttl(&mut self, ttl: i64) -> RfcResult<&mut Self> {
        if ttl <= 0 {
            return Err(RfcError::invalid("ttl", "must be a positive number of seconds"));
        }
        self.ttl = Some(ttl);
        self.invalidate();
        Ok(self)
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut [Event] {
        self.invalidate();
        &mut self.events
    }

    pub fn event_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.invalidate();
        self.events.get_mut(index)
    }

    /// ## Summary
    /// Adds an event built from `data`.
    ///
    /// ## Errors
    /// Returns the first validation error of the event.
    pub fn create_event(&mut self, data: EventData) -> RfcResult<&mut Event> {
        let event = Event::new(data)?;
        self.invalidate();
        self.events.push(event);
        let index = self.events.len() - 1;
        Ok(&mut self.events[index])
    }

    /// ## Summary
    /// Replaces all events. Nothing changes if any record is invalid.
    ///
    /// ## Errors
    /// Returns the first validation error of any event.
    pub fn set_events(&mut self, events: Vec<EventData>) -> RfcResult<&mut Self> {
        self.events = events
            .into_iter()
            .map(Event::new)
            .collect::<RfcResult<Vec<_>>>()?;
        self.invalidate();
        Ok(self)
    }

    /// Removes every event; all other settings stay.
    pub fn clear(&mut self) -> &mut Self {
        self.events.clear();
        self.invalidate();
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
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
        self.invalidate();
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
        self.invalidate();
        Ok(self)
    }

    #[must_use]
    pub fn to_json(&self) -> CalendarData {
        CalendarData {
            prod_id: Some(ProdIdInput::Text(self.prod_id.clone())),
            method: self.method,
            name: self.name.clone(),
            description: self.description.clone(),
            timezone: self.timezone.clone(),
            source: self.source.clone(),
            url: self.url.clone(),
            scale: self.scale.clone(),
            ttl: self.ttl,
            events: self.events.iter().map(Event::to_json).collect(),
            x: self.x.clone(),
        }
    }

    /// ## Summary
    /// Generates the folded iCalendar document.
    ///
    /// The result has CRLF line endings and no line break after
    /// `END:VCALENDAR`. It is memoized until the next mutable access.
    ///
    /// ## Errors
    /// Propagates the first event generation error.
    pub fn generate(&self) -> RfcResult<String> {
        if let Some(document) = self.generated.borrow().as_ref() {
            return Ok(document.clone());
        }

        let document = fold_lines(&self.render()?);
        tracing::debug!(
            events = self.events.len(),
            bytes = document.len(),
            "Generated calendar document"
        );

        *self.generated.borrow_mut() = Some(document.clone());
        Ok(document)
    }

    fn render(&self) -> RfcResult<String> {
        let mut out = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n");
        out.push_str(&format!("PRODID:-{}\r\n", self.prod_id));

        if let Some(url) = &self.url {
            out.push_str(&format!("URL:{url}\r\n"));
        }
        if let Some(source) = &self.source {
            out.push_str(&format!("SOURCE;VALUE=URI:{source}\r\n"));
        }
        if let Some(scale) = &self.scale {
            out.push_str(&format!("CALSCALE:{scale}\r\n"));
        }
        if let Some(method) = self.method {
            out.push_str(&format!("METHOD:{method}\r\n"));
        }
        if let Some(name) = &self.name {
            let name = escape(name, false);
            out.push_str(&format!("NAME:{name}\r\nX-WR-CALNAME:{name}\r\n"));
        }
        if let Some(description) = &self.description {
            out.push_str(&format!("X-WR-CALDESC:{}\r\n", escape(description, false)));
        }

        if let Some(generator) = &self.timezone_generator {
            for zone in self.zones() {
                if let Some(block) = generator.block(zone) {
                    out.push_str(&block);
                    out.push_str("\r\n");
                }
            }
        }
        if let Some(timezone) = &self.timezone {
            out.push_str(&format!("TIMEZONE-ID:{timezone}\r\nX-WR-TIMEZONE:{timezone}\r\n"));
        }
        if let Some(ttl) = self.ttl {
            let ttl = to_duration_string(ttl);
            out.push_str(&format!(
                "REFRESH-INTERVAL;VALUE=DURATION:{ttl}\r\nX-PUBLISHED-TTL:{ttl}\r\n"
            ));
        }

        for event in &self.events {
            out.push_str(&event.render(self.timezone.as_deref())?);
        }

        out.push_str(&self.x.to_lines());
        out.push_str("END:VCALENDAR");
        Ok(out)
    }

    /// Distinct zones in use, calendar first, skipping `/`-prefixed names.
    fn zones(&self) -> Vec<&str> {
        let calendar = self.timezone.as_deref();
        let mut zones: Vec<&str> = Vec::new();
        let candidates = calendar
            .into_iter()
            .chain(self.events.iter().filter_map(|e| e.effective_timezone(calendar)));

        for zone in candidates {
            if !zone.starts_with('/') && !zones.contains(&zone) {
                zones.push(zone);
            }
        }
        zones
    }
}
