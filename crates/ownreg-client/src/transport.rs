use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use ownreg_protocol::{endpoints, owner_path, ApiResponse};
use ownreg_service::OwnerService;
use ownreg_types::{Owner, OwnerDraft, OwnerId, OwnerPatch, OwnerProjection};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Transport interface for a remote owner registry.
#[async_trait]
pub trait OwnerTransport: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<OwnerProjection>>;
    async fn create(&self, draft: &OwnerDraft) -> ClientResult<Owner>;
    async fn update(&self, id: &OwnerId, patch: &OwnerPatch) -> ClientResult<Owner>;
    async fn delete(&self, id: &OwnerId) -> ClientResult<()>;
}

/// JSON-over-HTTP transport speaking the `/api/owners` contract.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Unwrap an envelope, turning any failure into a classified error.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<ApiResponse<T>> {
    let status = response.status();
    let bytes = response.bytes().await?;
    match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
        Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
        Ok(envelope) => Err(ClientError::from_failure(
            status.as_u16(),
            envelope.code,
            envelope.message,
        )),
        Err(e) if status.is_success() => {
            Err(ClientError::Transport(format!("invalid response body: {e}")))
        }
        Err(_) => Err(ClientError::from_failure(status.as_u16(), None, None)),
    }
}

fn require_data<T>(envelope: ApiResponse<T>) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::Transport("response missing data".into()))
}

#[async_trait]
impl OwnerTransport for HttpTransport {
    async fn list(&self) -> ClientResult<Vec<OwnerProjection>> {
        let response = self.client.get(self.url(endpoints::OWNERS)).send().await?;
        require_data(read_envelope(response).await?)
    }

    async fn create(&self, draft: &OwnerDraft) -> ClientResult<Owner> {
        let response = self
            .client
            .post(self.url(endpoints::OWNERS))
            .json(draft)
            .send()
            .await?;
        require_data(read_envelope(response).await?)
    }

    async fn update(&self, id: &OwnerId, patch: &OwnerPatch) -> ClientResult<Owner> {
        let response = self
            .client
            .patch(self.url(&owner_path(id)))
            .json(patch)
            .send()
            .await?;
        require_data(read_envelope(response).await?)
    }

    async fn delete(&self, id: &OwnerId) -> ClientResult<()> {
        let response = self.client.delete(self.url(&owner_path(id))).send().await?;
        read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }
}

/// In-process transport calling an [`OwnerService`] directly.
#[derive(Clone, Debug)]
pub struct LocalTransport {
    service: Arc<OwnerService>,
}

impl LocalTransport {
    pub fn new(service: Arc<OwnerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OwnerTransport for LocalTransport {
    async fn list(&self) -> ClientResult<Vec<OwnerProjection>> {
        Ok(self.service.reader().list()?)
    }

    async fn create(&self, draft: &OwnerDraft) -> ClientResult<Owner> {
        Ok(self.service.create(draft.clone())?)
    }

    async fn update(&self, id: &OwnerId, patch: &OwnerPatch) -> ClientResult<Owner> {
        Ok(self.service.update(id, patch.clone())?)
    }

    async fn delete(&self, id: &OwnerId) -> ClientResult<()> {
        Ok(self.service.delete(id)?)
    }
}
