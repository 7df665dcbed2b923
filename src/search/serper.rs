use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{SearchError, SearchResult};
use super::{SearchProvider, WebResult};

pub const SERPER_URL: &str = "https://google.serper.dev/search";
pub const DEFAULT_RESULT_COUNT: u32 = 3;
/// Appended to every query to bias results towards the domain.
pub const QUERY_SUFFIX: &str = " mathematics";

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: String,
}

impl From<SerperOrganic> for WebResult {
    fn from(r: SerperOrganic) -> Self {
        WebResult {
            id: r.link,
            title: r.title.unwrap_or_else(|| "Search Result".to_string()),
            content: r.snippet.clone(),
            snippet: r.snippet,
        }
    }
}

/// Google results through the Serper API.
pub struct SerperSearch {
    http: HttpClient,
    api_key: String,
    url: String,
    num: u32,
}

impl SerperSearch {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: HttpClient::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            api_key: api_key.into(),
            url: SERPER_URL.to_string(),
            num: DEFAULT_RESULT_COUNT,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_result_count(mut self, num: u32) -> Self {
        self.num = num;
        self
    }

    fn parse(body: &str) -> SearchResult<Vec<WebResult>> {
        let response: SerperResponse =
            serde_json::from_str(body).map_err(|e| SearchError::InvalidResponse {
                message: e.to_string(),
            })?;
        Ok(response.organic.into_iter().map(WebResult::from).collect())
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(&self, text: &str) -> SearchResult<Vec<WebResult>> {
        if self.api_key.is_empty() {
            return Err(SearchError::NotConfigured);
        }

        let request_failed = |e: reqwest::Error| SearchError::RequestFailed {
            url: self.url.clone(),
            message: e.to_string(),
        };

        let query = format!("{text}{QUERY_SUFFIX}");
        let body = self
            .http
            .post(&self.url)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest {
                q: &query,
                num: self.num,
            })
            .send()
            .await
            .map_err(request_failed)?
            .error_for_status()
            .map_err(request_failed)?
            .text()
            .await
            .map_err(request_failed)?;

        let results = Self::parse(&body)?;
        debug!(results = results.len(), "Web search complete");
        Ok(results)
    }

    fn name(&self) -> &str {
        "serper"
    }
}
