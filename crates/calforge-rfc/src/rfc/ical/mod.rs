//! iCalendar generation (RFC 5545).
//!
//! - `core`: value types (dates, durations, rules, enumerations)
//! - `build`: escaping, folding, date and recurrence rendering
//! - `model`: the calendar entities and document generation
//!
//! ## Example
//!
//! ```rust
//! use calforge_rfc::rfc::ical::{Calendar, EventData};
//!
//! let mut calendar = Calendar::new();
//! calendar
//!     .create_event(EventData {
//!         id: Some("standup".to_string()),
//!         summary: Some("Standup".to_string()),
//!         ..EventData::default()
//!     })
//!     .unwrap()
//!     .set_start("2024-03-04T09:00:00Z")
//!     .unwrap();
//!
//! let document = calendar.generate().unwrap();
//! assert!(document.starts_with("BEGIN:VCALENDAR\r\n"));
//! ```

pub mod build;
pub mod core;
pub mod model;

#[cfg(test)]
mod tests;

pub use model::{Alarm, Attendee, Calendar, CalendarData, Category, Event, EventData};
