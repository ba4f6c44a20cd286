//! Calendar entities.
//!
//! Each entity is built from a serializable record (`*Data`), exposes
//! getters and validating setters, snapshots itself with `to_json()` and
//! renders its own content lines. Ownership is a tree: a [`Calendar`] owns
//! its [`Event`]s, which own their [`Attendee`]s, [`Alarm`]s and
//! [`Category`]s. Attendee delegation is stored as [`AttendeeId`] handles.

mod alarm;
mod attendee;
mod calendar;
mod category;
mod event;

pub use alarm::{Alarm, AlarmAttachment, AlarmData, AlarmRepeat, AlarmTrigger};
pub use attendee::{Attendee, AttendeeData, AttendeeId, Delegate};
pub use calendar::{Calendar, CalendarData, ProdIdInput, ProdIdParts, TimezoneGenerator};
pub use category::{Category, CategoryData};
pub use event::{Event, EventData};
