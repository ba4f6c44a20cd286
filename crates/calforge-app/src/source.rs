//! Reading calendar records from disk.

use std::path::Path;

use calforge_rfc::rfc::ical::Calendar;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a JSON calendar record and builds the calendar from it.
///
/// ## Errors
/// Returns `AppError::IoError` if the file cannot be read and
/// `AppError::RfcError` if the record is malformed or invalid.
#[tracing::instrument]
pub async fn load_calendar(path: &Path) -> AppResult<Calendar> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    let calendar = Calendar::from_json(&json)?;

    tracing::debug!(events = calendar.len(), "Calendar record loaded");
    Ok(calendar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("calforge-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[test_log::test(tokio::test)]
    async fn loads_record() {
        let path = temp_path("record.json");
        tokio::fs::write(
            &path,
            r#"{"name":"Team","events":[{"id":"a","start":"2021-01-01T10:00:00Z","summary":"A"}]}"#,
        )
        .await
        .unwrap();

        let calendar = load_calendar(&path).await.unwrap();
        assert_eq!(calendar.name(), Some("Team"));
        assert_eq!(calendar.len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn missing_file_is_not_found() {
        let err = load_calendar(&temp_path("absent.json")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test_log::test(tokio::test)]
    async fn invalid_record_is_rfc_error() {
        let path = temp_path("invalid.json");
        tokio::fs::write(&path, r#"{"ttl": -5}"#).await.unwrap();

        let err = load_calendar(&path).await.unwrap_err();
        assert!(matches!(err, AppError::RfcError(_)));
        assert!(!err.is_not_found());

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
