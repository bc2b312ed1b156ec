//! HTTP implementation of the evaluation API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::models::{
    ApiResponse, CreateVideoRequest, CreateVideoResponse, Frame, Highlight, PageQuery, Paginated,
    Video, VideosQuery,
};
use super::EvaluationApi;
use crate::config::ApiConfig;
use crate::error::{ApiOperation, DashboardError, Result};

/// Evaluation API client over `reqwest`
///
/// Every request bypasses caches so each page reflects current backend state.
pub struct HttpEvaluationClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEvaluationClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| {
            DashboardError::Configuration(format!("invalid API base URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DashboardError::Configuration(format!(
                "API base URL must use http or https: {}",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: ApiOperation,
        path: &str,
        pairs: Vec<(&'static str, String)>,
    ) -> Result<ApiResponse<T>> {
        let url = self.endpoint(path);
        debug!("GET {} {:?}", url, pairs);

        let mut request = self.client.get(&url);
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} ({}): {}", operation, url, e);
            DashboardError::transport(operation, e.to_string())
        })?;

        Self::decode(operation, response).await
    }

    async fn decode<T: DeserializeOwned>(
        operation: ApiOperation,
        response: reqwest::Response,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string());
            warn!("{}: HTTP {}", operation, status);
            return Err(DashboardError::transport(operation, reason));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::transport(operation, e.to_string()))?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            warn!("{}: undecodable response body: {}", operation, e);
            DashboardError::transport(operation, format!("invalid response body ({})", e))
        })?;

        if !envelope.is_success() {
            debug!("{} rejected by backend: {}", operation, envelope.message);
        }

        Ok(envelope)
    }
}

#[async_trait]
impl EvaluationApi for HttpEvaluationClient {
    async fn list_videos(&self, query: &VideosQuery) -> Result<ApiResponse<Paginated<Video>>> {
        self.get(ApiOperation::FetchVideos, "/videos", query.to_pairs())
            .await
    }

    async fn list_highlights(
        &self,
        video_id: u64,
        query: &PageQuery,
    ) -> Result<ApiResponse<Paginated<Highlight>>> {
        let path = format!("/videos/{}/highlights", video_id);
        self.get(ApiOperation::FetchHighlights, &path, query.to_pairs())
            .await
    }

    async fn list_frames(
        &self,
        highlight_id: u64,
        query: &PageQuery,
    ) -> Result<ApiResponse<Paginated<Frame>>> {
        let path = format!("/highlights/{}/frames", highlight_id);
        self.get(ApiOperation::FetchFrames, &path, query.to_pairs())
            .await
    }

    async fn create_video(
        &self,
        request: &CreateVideoRequest,
    ) -> Result<ApiResponse<CreateVideoResponse>> {
        let operation = ApiOperation::CreateVideo;
        let url = self.endpoint("/videos");
        debug!("POST {} title={:?}", url, request.title);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("{} ({}): {}", operation, url, e);
                DashboardError::transport(operation, e.to_string())
            })?;

        Self::decode(operation, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HttpEvaluationClient::new(&api_config("http://localhost:8080/api/v1/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(
            client.endpoint("/videos"),
            "http://localhost:8080/api/v1/videos"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpEvaluationClient::new(&api_config("not a url")),
            Err(DashboardError::Configuration(_))
        ));
        assert!(matches!(
            HttpEvaluationClient::new(&api_config("ftp://example.com")),
            Err(DashboardError::Configuration(_))
        ));
    }
}
