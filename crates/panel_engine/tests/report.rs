use std::fs;
use std::sync::Arc;

use panel_core::TaskId;
use panel_engine::{
    ApiErrorKind, EngineSettings, ReportDownloader, ReportError, ReqwestScrapeClient,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn downloader(server: &MockServer, dir: &TempDir) -> ReportDownloader {
    let settings = EngineSettings {
        base_url: server.uri(),
        download_dir: dir.path().join("reports"),
        ..EngineSettings::default()
    };
    let api = Arc::new(ReqwestScrapeClient::new(&settings).unwrap());
    ReportDownloader::new(api, settings.download_dir)
}

fn saved_files(dir: &TempDir) -> usize {
    fs::read_dir(dir.path().join("reports"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn report_is_saved_under_task_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-pdf/abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4\n%%EOF".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = downloader(&server, &dir)
        .download(&TaskId::new("abc123"))
        .await
        .expect("download ok");

    assert_eq!(path.file_name().unwrap(), "scraping_report_abc123.pdf");
    assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4\n%%EOF");
}

#[tokio::test]
async fn missing_report_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-pdf/abc123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = downloader(&server, &dir)
        .download(&TaskId::new("abc123"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::Api(ref api) if api.kind == ApiErrorKind::HttpStatus(404)
    ));
    assert_eq!(saved_files(&dir), 0);
}

#[tokio::test]
async fn non_pdf_body_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-pdf/abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{\"detail\":\"Internal server error\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = downloader(&server, &dir)
        .download(&TaskId::new("abc123"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::NotPdf(_)));
    assert_eq!(saved_files(&dir), 0);
}
