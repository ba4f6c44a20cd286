//! Writing generated documents to disk.

use std::path::Path;

use calforge_rfc::rfc::ical::Calendar;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Generates `calendar` and writes the document to `path`, creating missing
/// parent directories.
///
/// ## Errors
/// Returns `AppError::RfcError` if generation fails and `AppError::IoError`
/// if the file cannot be written.
#[tracing::instrument(skip(calendar))]
pub async fn write_calendar(path: &Path, calendar: &Calendar) -> AppResult<()> {
    let document = calendar.generate()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::io(parent, e))?;
    }
    tokio::fs::write(path, document.as_bytes())
        .await
        .map_err(|e| AppError::io(path, e))?;

    tracing::info!(bytes = document.len(), "Calendar written");
    Ok(())
}
