/// Product identifier used when a calendar does not set one.
pub const DEFAULT_PROD_COMPANY: &str = "sebbo.net";
pub const DEFAULT_PROD_PRODUCT: &str = "ical-generator";
pub const DEFAULT_PROD_LANGUAGE: &str = "EN";
pub const DEFAULT_PROD_ID: &str = const_str::concat!(
    "//",
    DEFAULT_PROD_COMPANY,
    "//",
    DEFAULT_PROD_PRODUCT,
    "//",
    DEFAULT_PROD_LANGUAGE
);

/// Prefix every custom extension attribute key must carry.
pub const CUSTOM_ATTRIBUTE_PREFIX: &str = "X-";

pub const ICS_EXTENSION: &str = "ics";
pub const CALENDAR_MIME_TYPE: &str = "text/calendar";
pub const CALENDAR_CONTENT_TYPE: &str = const_str::concat!(CALENDAR_MIME_TYPE, "; charset=utf-8");

pub const HEALTHCHECK_ROUTE_COMPONENT: &str = "healthcheck";
