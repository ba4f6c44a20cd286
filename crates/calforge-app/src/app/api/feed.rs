//! Calendar feed handler.

use std::path::Path;

use salvo::http::HeaderValue;
use salvo::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use salvo::prelude::*;

use super::CALENDAR_CONTENT_TYPE;
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::source::load_calendar;

#[must_use]
pub fn routes(file_name: &str) -> Router {
    Router::with_path(file_name).get(serve_calendar)
}

/// ## Summary
/// Loads the configured calendar record and responds with its generated
/// document.
///
/// A missing record is answered with 404, any other failure with 500.
#[handler]
async fn serve_calendar(depot: &mut Depot, res: &mut Response) {
    match render_feed(depot).await {
        Ok((file_name, document)) => write_document(res, &file_name, document),
        Err(e) if e.is_not_found() => {
            tracing::warn!(error = %e, "Calendar record not found");
            res.status_code(StatusCode::NOT_FOUND);
            res.render(Text::Plain("calendar not found"));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to generate calendar feed");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Text::Plain(e.to_string()));
        }
    }
}

async fn render_feed(depot: &Depot) -> AppResult<(String, String)> {
    let settings = get_config_from_depot(depot)?;
    let calendar = load_calendar(Path::new(&settings.calendar.source)).await?;
    let document = calendar.generate()?;
    Ok((settings.calendar.file_name(), document))
}

/// ## Side Effects
/// Sets `Content-Type`, `Content-Disposition` and the response body.
fn write_document(res: &mut Response, file_name: &str, document: String) {
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(CALENDAR_CONTENT_TYPE));
    if let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
    {
        res.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    }

    res.status_code(StatusCode::OK);
    if let Err(e) = res.write_body(document.into_bytes()) {
        tracing::error!("Failed to write response body: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};

    use super::*;
    use crate::config::{ConfigHandler, Settings};

    const RECORD: &str = r#"{
        "name": "Team",
        "events": [{
            "id": "feed-1",
            "stamp": "2021-01-01T00:00:00Z",
            "start": "2021-01-04T09:00:00Z",
            "summary": "Standup"
        }]
    }"#;

    fn service_for(source: &Path) -> Service {
        let toml = format!(
            "[calendar]\nsource = {:?}\nfilename = \"team\"\n",
            source.display().to_string()
        );
        let settings = Settings::from_toml_str(&toml).unwrap();
        let router = Router::new()
            .hoop(ConfigHandler {
                settings: Arc::new(settings.clone()),
            })
            .push(crate::app::api::routes(&settings));
        Service::new(router)
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("calforge-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[test_log::test(tokio::test)]
    async fn serves_generated_document() {
        let source = temp_path("feed.json");
        tokio::fs::write(&source, RECORD).await.unwrap();
        let service = service_for(&source);

        let mut resp = TestClient::get("http://127.0.0.1:5800/team.ics")
            .send(&service)
            .await;

        assert_eq!(resp.status_code, Some(StatusCode::OK));
        let headers = resp.headers();
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "text/calendar; charset=utf-8"
        );
        assert_eq!(
            headers.get(CONTENT_DISPOSITION).unwrap().to_str().unwrap(),
            "attachment; filename=\"team.ics\""
        );

        let body = resp.take_string().await.unwrap();
        assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(body.contains("\r\nX-WR-CALNAME:Team\r\n"));
        assert!(body.contains("\r\nUID:feed-1\r\n"));
        assert!(body.ends_with("END:VCALENDAR"));

        tokio::fs::remove_file(&source).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn missing_record_is_not_found() {
        let service = service_for(&temp_path("absent.json"));

        let resp = TestClient::get("http://127.0.0.1:5800/team.ics")
            .send(&service)
            .await;

        assert_eq!(resp.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[test_log::test(tokio::test)]
    async fn invalid_record_is_server_error() {
        let source = temp_path("broken.json");
        tokio::fs::write(&source, r#"{"events":[{"summary":"No start"}]}"#)
            .await
            .unwrap();
        let service = service_for(&source);

        let mut resp = TestClient::get("http://127.0.0.1:5800/team.ics")
            .send(&service)
            .await;

        assert_eq!(resp.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(resp.take_string().await.unwrap().contains("start"));

        tokio::fs::remove_file(&source).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn other_paths_are_not_routed() {
        let source = temp_path("feed.json");
        let service = service_for(&source);

        let resp = TestClient::get("http://127.0.0.1:5800/other.ics")
            .send(&service)
            .await;

        assert_eq!(resp.status_code, Some(StatusCode::NOT_FOUND));
    }
}
