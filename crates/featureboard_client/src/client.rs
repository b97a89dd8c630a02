use crate::error::{ClientError, ClientResult};
use crate::types::{
    CreateFeatureRequest, DeleteResponse, FeatureFilter, HealthResponse, UpdateFeatureRequest,
};
use featureboard_core::{Feature, FeatureId, FeatureStats};
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Async client bound to one API base url, e.g. `http://127.0.0.1:3001`.
#[derive(Debug, Clone)]
pub struct FeatureBoardClient {
    http: Client,
    base_url: String,
}

impl FeatureBoardClient {
    /// Creates a client for `base_url`. Only `http` and `https` are accepted.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> ClientResult<Self> {
        let raw = base_url.into();
        let parsed = Url::parse(&raw).map_err(|_| ClientError::InvalidBaseUrl(raw.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ClientError::InvalidBaseUrl(raw));
        }
        Ok(Self {
            http,
            base_url: raw.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/features`
    pub async fn list_features(&self, filter: &FeatureFilter) -> ClientResult<Vec<Feature>> {
        let request = self
            .http
            .get(self.url("/api/features"))
            .query(&filter.query_pairs());
        self.send(request).await
    }

    /// `GET /api/features/{id}`
    pub async fn get_feature(&self, id: FeatureId) -> ClientResult<Feature> {
        let request = self.http.get(self.feature_url(id));
        self.send(request).await
    }

    /// `POST /api/features`
    pub async fn create_feature(&self, request: &CreateFeatureRequest) -> ClientResult<Feature> {
        let request = self.http.post(self.url("/api/features")).json(request);
        self.send(request).await
    }

    /// `PUT /api/features/{id}`
    pub async fn update_feature(
        &self,
        id: FeatureId,
        request: &UpdateFeatureRequest,
    ) -> ClientResult<Feature> {
        let request = self.http.put(self.feature_url(id)).json(request);
        self.send(request).await
    }

    /// `DELETE /api/features/{id}`
    pub async fn delete_feature(&self, id: FeatureId) -> ClientResult<DeleteResponse> {
        let request = self.http.delete(self.feature_url(id));
        self.send(request).await
    }

    /// `GET /api/features/stats`
    pub async fn stats(&self) -> ClientResult<FeatureStats> {
        let request = self.http.get(self.url("/api/features/stats"));
        self.send(request).await
    }

    /// `GET /api/health`
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let request = self.http.get(self.url("/api/health"));
        self.send(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn feature_url(&self, id: FeatureId) -> String {
        self.url(&format!("/api/features/{id}"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message =
            error_message(&body).unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
        debug!(
            "event=client_request module=client status=error http_status={} message={}",
            status.as_u16(),
            message
        );
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
