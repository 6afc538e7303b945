use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use marquee_config::{HttpConfig, ServiceConfig};
use marquee_model::{
    Availability, CatalogEntity, CatalogKind, ContentGroups, EntityId,
    IdentityKey,
};
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::CatalogApi;
use super::routes::Endpoint;
use super::types::{
    RequestAck, SubmitRequestBody, WireContentResponse, WireEntity,
    WireLibraryStatus,
};
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "X-Api-Key";

const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP implementation of [`CatalogApi`].
///
/// The endpoint and credential can be swapped at runtime; calls already in
/// flight finish against the values they started with.
pub struct HttpCatalogClient {
    state: RwLock<ClientState>,
}

#[derive(Clone)]
struct ClientState {
    client: Client,
    base_url: Url,
    api_key: HeaderValue,
    timeout: Option<Duration>,
}

impl fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &state.base_url.as_str())
            .field("timeout", &state.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpCatalogClient {
    pub fn new(
        service: &ServiceConfig,
        http: &HttpConfig,
    ) -> Result<Self, ApiError> {
        let state = ClientState {
            client: build_client(http.request_timeout)?,
            base_url: service.url.clone(),
            api_key: api_key_header(service)?,
            timeout: http.request_timeout,
        };

        info!(
            base_url = %state.base_url,
            timeout = ?state.timeout,
            "created request service client"
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    pub fn base_url(&self) -> Url {
        self.state.read().base_url.clone()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.state.read().timeout
    }

    /// Point subsequent calls at a different service or credential.
    pub fn set_endpoint(&self, service: &ServiceConfig) -> Result<(), ApiError> {
        let api_key = api_key_header(service)?;
        let mut state = self.state.write();
        state.base_url = service.url.clone();
        state.api_key = api_key;
        debug!(base_url = %state.base_url, "request service endpoint updated");
        Ok(())
    }

    /// Apply new service and transport settings, rebuilding the underlying
    /// HTTP client only when the timeout changed. Nothing changes unless
    /// every new setting is usable.
    pub fn reconfigure(
        &self,
        service: &ServiceConfig,
        http: &HttpConfig,
    ) -> Result<(), ApiError> {
        let api_key = api_key_header(service)?;
        let rebuilt = if self.timeout() != http.request_timeout {
            Some(build_client(http.request_timeout)?)
        } else {
            None
        };

        let mut state = self.state.write();
        if let Some(client) = rebuilt {
            state.client = client;
            state.timeout = http.request_timeout;
        }
        state.base_url = service.url.clone();
        state.api_key = api_key;
        debug!(
            base_url = %state.base_url,
            timeout = ?state.timeout,
            "request service client reconfigured"
        );
        Ok(())
    }

    /// Issue one call and return the decoded JSON body.
    ///
    /// An empty success body decodes as `null`. Any non-success status fails
    /// with [`ApiError::Status`]; nothing is retried.
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let (client, url, api_key) = {
            let state = self.state.read();
            (
                state.client.clone(),
                endpoint.url(&state.base_url)?,
                state.api_key.clone(),
            )
        };

        let method = endpoint.method();
        let mut request = client
            .request(method.clone(), url)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            warn!(
                %method,
                endpoint = endpoint.template(),
                error = %err,
                "request service unreachable"
            );
            ApiError::from(err)
        })?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            %method,
            endpoint = endpoint.template(),
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request service call"
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|err| ApiError::Decode {
            endpoint: endpoint.template().to_string(),
            message: err.to_string(),
        })
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let value = self.call(endpoint, body).await?;
        serde_json::from_value(value).map_err(|err| ApiError::Decode {
            endpoint: endpoint.template().to_string(),
            message: err.to_string(),
        })
    }

    async fn fetch_catalog(
        &self,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntity>, ApiError> {
        let entities: Vec<WireEntity> =
            self.call_as(&Endpoint::Catalog(kind), None).await?;
        Ok(entities.into_iter().map(CatalogEntity::from).collect())
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_networks(&self) -> Result<Vec<CatalogEntity>, ApiError> {
        self.fetch_catalog(CatalogKind::Networks).await
    }

    async fn list_studios(&self) -> Result<Vec<CatalogEntity>, ApiError> {
        self.fetch_catalog(CatalogKind::Studios).await
    }

    async fn list_content_for_entity(
        &self,
        kind: CatalogKind,
        id: &EntityId,
    ) -> Result<ContentGroups, ApiError> {
        let endpoint = Endpoint::EntityContent {
            kind,
            id: id.clone(),
        };
        let wire: WireContentResponse = self.call_as(&endpoint, None).await?;
        Ok(ContentGroups::from(wire))
    }

    async fn submit_request(
        &self,
        key: IdentityKey,
    ) -> Result<RequestAck, ApiError> {
        let body = serde_json::to_value(SubmitRequestBody::from(key)).map_err(
            |err| ApiError::InvalidRequest(err.to_string()),
        )?;
        let value = self.call(&Endpoint::Request, Some(body)).await?;
        if value.is_null() {
            return Ok(RequestAck::default());
        }
        // The acknowledgment shape varies between service versions; an
        // unrecognized body still means the request was accepted.
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn check_library_status(
        &self,
        key: IdentityKey,
    ) -> Result<Availability, ApiError> {
        let wire: WireLibraryStatus =
            self.call_as(&Endpoint::SearchStatus(key), None).await?;
        Ok(Availability::from(wire))
    }
}

fn build_client(timeout: Option<Duration>) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| ApiError::Transport(err.to_string()))
}

fn api_key_header(service: &ServiceConfig) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(service.api_key.expose().trim())
        .map_err(|_| {
            ApiError::InvalidRequest(
                "API key contains characters not allowed in a header".into(),
            )
        })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Pull a readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(field)
                && !message.trim().is_empty()
            {
                return message.trim().to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
