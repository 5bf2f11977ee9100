//! HTTP client for the category catalog and project endpoints.

mod error;

pub use error::ApiError;

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::ledger::remote::LedgerBackend;
use crate::models::{CategoryKind, CategoryOption, SaveProjectRequest};

const CATEGORIES_PATH: &str = "/api/categoryCode";
const PROJECTS_PATH: &str = "/api/projects";

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("estimate-ledger/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl LedgerBackend for ApiClient {
    async fn fetch_categories(&self, kind: CategoryKind) -> Result<Vec<CategoryOption>, ApiError> {
        debug!(kind = kind.as_str(), "fetching category codes");
        let resp = self
            .http
            .get(self.url(CATEGORIES_PATH))
            .query(&[("type", kind.as_str())])
            .send()
            .await?;
        read_categories(resp).await
    }

    async fn save_project(&self, request: &SaveProjectRequest) -> Result<(), ApiError> {
        debug!(items = request.materials.len(), "posting project");
        let resp = self
            .http
            .post(self.url(PROJECTS_PATH))
            .json(request)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }
}

async fn read_categories(resp: reqwest::Response) -> Result<Vec<CategoryOption>, ApiError> {
    check_response(resp)
        .await?
        .json::<Vec<CategoryOption>>()
        .await
        .map_err(|err| ApiError::Parse(err.to_string()))
}

/// Passes success responses through and turns anything else into an error.
///
/// A failure body is read as `{ "message": ... }`. When it is not JSON at
/// all the failure is reported as [`ApiError::Parse`].
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.bytes().await?;
    Err(failure_from_body(status.as_u16(), &body))
}

fn failure_from_body(status: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => ApiError::Api {
            status,
            message: parsed.message.filter(|message| !message.is_empty()),
        },
        Err(err) => ApiError::Parse(format!("status {status}: {err}")),
    }
}
