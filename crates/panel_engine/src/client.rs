use futures_util::StreamExt;
use panel_core::{ResultRow, TaskId};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::SubmitResponse;
use crate::{
    ApiError, ApiErrorKind, EngineSettings, HealthStatus, ReportArtifact, ResultFetch, TaskEntry,
};

/// HTTP contract of the scraping service.
#[async_trait::async_trait]
pub trait ScrapeApi: Send + Sync {
    /// `POST /scrape`: starts a new task for `url`.
    async fn submit(&self, url: &str) -> Result<TaskId, ApiError>;

    /// `GET /tasks`: every task the service knows about.
    async fn list_tasks(&self) -> Result<Vec<TaskEntry>, ApiError>;

    /// `GET /result/{task_id}`.
    async fn fetch_result(&self, task_id: &TaskId) -> Result<ResultFetch, ApiError>;

    /// `GET /download-pdf/{task_id}`.
    async fn download_report(&self, task_id: &TaskId) -> Result<ReportArtifact, ApiError>;

    /// `GET /health`.
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestScrapeClient {
    base: Url,
    http: reqwest::Client,
    max_report_bytes: u64,
}

impl ReqwestScrapeClient {
    pub fn new(settings: &EngineSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiErrorKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;

        Ok(Self {
            base,
            http,
            max_report_bytes: settings.max_report_bytes,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(ApiErrorKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl ScrapeApi for ReqwestScrapeClient {
    async fn submit(&self, url: &str) -> Result<TaskId, ApiError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ApiError::new(ApiErrorKind::InvalidUrl, "url is empty"));
        }
        let body = serde_json::to_vec(&SubmitRequest { url })
            .map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))?;

        let response = self
            .http
            .post(self.endpoint(&["scrape"])?)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        let accepted: SubmitResponse = read_json(response).await?;
        Ok(accepted.task_id)
    }

    async fn list_tasks(&self) -> Result<Vec<TaskEntry>, ApiError> {
        self.get_json(self.endpoint(&["tasks"])?).await
    }

    async fn fetch_result(&self, task_id: &TaskId) -> Result<ResultFetch, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["result", task_id.as_str()])?)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // The service answers 404 until the result row has been stored.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ResultFetch::NotReady {
                reason: "result not found".to_string(),
            });
        }
        let response = ensure_success(response)?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(parse_result_payload(&body))
    }

    async fn download_report(&self, task_id: &TaskId) -> Result<ReportArtifact, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["download-pdf", task_id.as_str()])?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_report_bytes {
                return Err(ApiError::new(
                    ApiErrorKind::TooLarge {
                        max_bytes: self.max_report_bytes,
                        actual: Some(content_len),
                    },
                    "report too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_report_bytes {
                return Err(ApiError::new(
                    ApiErrorKind::TooLarge {
                        max_bytes: self.max_report_bytes,
                        actual: Some(next_len),
                    },
                    "report too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(ReportArtifact {
            bytes,
            content_type,
        })
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json(self.endpoint(&["health"])?).await
    }
}

/// Interprets a `GET /result/{id}` body.
///
/// Anything without a decodable `data` array is reported as not ready rather
/// than as an error.
pub fn parse_result_payload(body: &[u8]) -> ResultFetch {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            return ResultFetch::NotReady {
                reason: format!("undecodable payload: {err}"),
            }
        }
    };
    let Some(data) = value.get("data").filter(|data| data.is_array()) else {
        return ResultFetch::NotReady {
            reason: "payload has no data records".to_string(),
        };
    };
    match Vec::<ResultRow>::deserialize(data) {
        Ok(rows) => ResultFetch::Ready(rows),
        Err(err) => ResultFetch::NotReady {
            reason: format!("malformed records: {err}"),
        },
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            ApiErrorKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
