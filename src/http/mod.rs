//! JSON-over-HTTP implementation of [`EntityBackend`].
//!
//! Validation and creation both `POST {base}/{resource}`; the body's `commit`
//! flag tells them apart. Updates `PUT {base}/{resource}/{id}` and attachments
//! go as multipart to `POST {base}/{resource}/{id}/{slot}`.

mod response;

use async_trait::async_trait;
use condo_config::Config;
use condo_domain::{AssetId, EntityId, ValidationReport};
use reqwest::{multipart, Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{EntityBackend, SecondaryAsset};
use crate::errors::{Result, WizardError};
use crate::wizard::SessionContext;

use self::response::{
    decode_error, decode_identifier, decode_record, decode_report, with_commit_flag,
};

pub const ORGANIZATION_HEADER: &str = "X-Organization-Id";

pub struct RestBackend {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl RestBackend {
    /// No request timeout is applied.
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self> {
        let client = Client::builder().build().map_err(transport)?;
        Ok(Self::with_client(client, base_url, session))
    }

    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;
        Ok(Self::with_client(client, config.api_base_url.clone(), session))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, session: SessionContext) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Loads an existing record, e.g. to seed an edit wizard.
    pub async fn fetch(&self, resource: &str, id: &EntityId) -> Result<Value> {
        let url = self.url(&[resource, id.as_str()]);
        let body = self.send(self.client.get(&url), &url).await?;
        decode_record(&body)
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment.trim_matches('/'));
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request.header("Accept", "application/json");
        if let Some(token) = self.session.auth_token() {
            request = request.bearer_auth(token);
        }
        if let Some(organization) = self.session.organization_id() {
            request = request.header(ORGANIZATION_HEADER, organization);
        }
        request
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<String> {
        let response = self.authorize(request).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(%url, status = status.as_u16(), "response received");

        if status.is_success() {
            Ok(body)
        } else {
            let err = decode_error(status.as_u16(), &body);
            warn!(%url, status = status.as_u16(), error = %err, "request failed");
            Err(err)
        }
    }
}

#[async_trait]
impl EntityBackend for RestBackend {
    async fn validate(&self, resource: &str, payload: &Value) -> Result<ValidationReport> {
        let url = self.url(&[resource]);
        let request = self.client.post(&url).json(&with_commit_flag(payload, false));
        match self.send(request, &url).await {
            Ok(body) => decode_report(&body),
            Err(WizardError::Rejected { issues, .. }) => Ok(ValidationReport::invalid(issues)),
            Err(err) => Err(err),
        }
    }

    async fn create(&self, resource: &str, payload: &Value) -> Result<EntityId> {
        let url = self.url(&[resource]);
        let request = self.client.post(&url).json(&with_commit_flag(payload, true));
        let body = self.send(request, &url).await?;
        decode_identifier(&body).map(EntityId::new)
    }

    async fn update(&self, resource: &str, id: &EntityId, payload: &Value) -> Result<EntityId> {
        let url = self.url(&[resource, id.as_str()]);
        let request = self.client.put(&url).json(&with_commit_flag(payload, true));
        let body = self.send(request, &url).await?;
        // Some endpoints answer 204 or omit the id on update.
        if body.trim().is_empty() {
            return Ok(id.clone());
        }
        Ok(decode_identifier(&body)
            .map(EntityId::new)
            .unwrap_or_else(|_| id.clone()))
    }

    async fn upload_secondary_asset(
        &self,
        resource: &str,
        id: &EntityId,
        asset: &SecondaryAsset,
    ) -> Result<AssetId> {
        let url = self.url(&[resource, id.as_str(), asset.slot]);
        let part = multipart::Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone())
            .mime_str(&asset.content_type)
            .map_err(transport)?;
        let form = multipart::Form::new().part("file", part);
        let body = self.send(self.client.post(&url).multipart(form), &url).await?;
        decode_identifier(&body).map(AssetId::new)
    }
}

fn transport(err: reqwest::Error) -> WizardError {
    WizardError::Transport(err.to_string())
}
