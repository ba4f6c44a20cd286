//! iCalendar value types (RFC 5545).
//!
//! These types hold already-validated values; entities in `model` store them
//! and the `build` module turns them into content lines.

mod contact;
mod custom;
mod datetime;
mod duration;
mod enums;
mod location;
mod rrule;

pub use contact::{Person, PersonInput};
pub use custom::{CustomAttributes, CustomAttributesInput, KeyValue};
pub use datetime::{CalDateTime, IntoDateTime};
pub use duration::{Duration, to_duration_string};
pub use enums::{
    AlarmRelation, AlarmType, AttendeeRole, AttendeeStatus, AttendeeType, BusyStatus,
    CalendarMethod, EventClass, EventStatus, Transparency,
};
pub use location::{Description, DescriptionInput, Geo, Location, LocationInput};
pub use rrule::{Frequency, Repeating, RepeatingRule, Weekday};
