mod feed;
mod healthcheck;

use calforge_core::config::Settings;
use salvo::Router;

pub use calforge_core::constants::{CALENDAR_CONTENT_TYPE, HEALTHCHECK_ROUTE_COMPONENT};

/// ## Summary
/// Constructs the router serving the health check and the calendar feed.
///
/// The feed is published under the configured file name.
#[must_use]
pub fn routes(settings: &Settings) -> Router {
    Router::new()
        .push(healthcheck::routes())
        .push(feed::routes(&settings.calendar.file_name()))
}
