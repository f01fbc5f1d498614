//! Report download: fetch the PDF artifact of a task and save it.

use std::path::PathBuf;
use std::sync::Arc;

use panel_core::TaskId;
use panel_logging::panel_info;
use thiserror::Error;

use crate::{ApiError, ReportArtifact, ReportStore, ScrapeApi, StoreError};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report request failed: {0}")]
    Api(#[from] ApiError),
    #[error("report is not a PDF: {0}")]
    NotPdf(String),
    #[error("could not save report: {0}")]
    Persist(#[from] StoreError),
}

#[derive(Clone)]
pub struct ReportDownloader {
    api: Arc<dyn ScrapeApi>,
    store: ReportStore,
}

impl ReportDownloader {
    pub fn new(api: Arc<dyn ScrapeApi>, download_dir: PathBuf) -> Self {
        Self {
            api,
            store: ReportStore::new(download_dir),
        }
    }

    /// Downloads the report of `task_id` and returns where it was saved.
    pub async fn download(&self, task_id: &TaskId) -> Result<PathBuf, ReportError> {
        let artifact = self.api.download_report(task_id).await?;
        ensure_pdf(&artifact)?;
        let path = self
            .store
            .save(&report_filename(task_id), &artifact.bytes)?;
        panel_info!(
            "Saved report for task {} ({} bytes) to {:?}",
            task_id,
            artifact.bytes.len(),
            path
        );
        Ok(path)
    }
}

/// Rejects bodies that are not PDF documents.
///
/// A declared content type other than PDF or a generic octet stream is
/// rejected even if the body looks right.
pub fn ensure_pdf(artifact: &ReportArtifact) -> Result<(), ReportError> {
    if let Some(content_type) = artifact.content_type.as_deref() {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        let accepted = ["application/pdf", "application/octet-stream"]
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence));
        if !accepted {
            return Err(ReportError::NotPdf(format!(
                "unexpected content type {essence}"
            )));
        }
    }
    if !artifact.bytes.starts_with(PDF_MAGIC) {
        return Err(ReportError::NotPdf("missing %PDF- header".to_string()));
    }
    Ok(())
}

/// `scraping_report_{task_id}.pdf`, with characters that are unsafe in file
/// names replaced by `_`.
pub fn report_filename(task_id: &TaskId) -> String {
    let sanitized: String = task_id
        .as_str()
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    format!("scraping_report_{sanitized}.pdf")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(bytes: &[u8], content_type: Option<&str>) -> ReportArtifact {
        ReportArtifact {
            bytes: bytes.to_vec(),
            content_type: content_type.map(str::to_string),
        }
    }

    #[test]
    fn filename_replaces_path_characters() {
        assert_eq!(report_filename(&TaskId::new("42")), "scraping_report_42.pdf");
        assert_eq!(
            report_filename(&TaskId::new("../a:b")),
            "scraping_report_.._a_b.pdf"
        );
    }

    #[test]
    fn pdf_check_accepts_pdf_and_octet_stream() {
        assert!(ensure_pdf(&artifact(b"%PDF-1.4 body", Some("application/pdf"))).is_ok());
        assert!(ensure_pdf(&artifact(b"%PDF-1.7", Some("application/octet-stream"))).is_ok());
        assert!(ensure_pdf(&artifact(b"%PDF-1.7", None)).is_ok());
    }

    #[test]
    fn pdf_check_rejects_html_and_bad_magic() {
        assert!(matches!(
            ensure_pdf(&artifact(b"%PDF-1.4", Some("text/html; charset=utf-8"))),
            Err(ReportError::NotPdf(_))
        ));
        assert!(matches!(
            ensure_pdf(&artifact(b"{\"detail\":\"oops\"}", Some("application/pdf"))),
            Err(ReportError::NotPdf(_))
        ));
    }
}
