//! iCalendar serialization helpers (RFC 5545).
//!
//! - Escape: TEXT and parameter value escaping
//! - Fold: content line folding at 75 octets
//! - Datetime: DATE and DATE-TIME rendering with zone handling
//! - Rrule: `RRULE` and `EXDATE` lines

mod datetime;
mod escape;
mod fold;
mod rrule;

pub use datetime::{DateContext, format_date, format_date_with_property};
pub use escape::{escape, quote_parameter};
pub use fold::{fold_line, fold_lines};
pub use rrule::{RecurrenceContext, exdate_line, normalize_raw_rule, repeating_lines, rrule_line};
