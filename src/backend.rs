//! Operations the wizard needs from the outside world.
//!
//! Any transport satisfying these contracts will do; [`crate::http::RestBackend`]
//! is the JSON-over-HTTP one.

use std::{fmt, fs, path::Path};

use async_trait::async_trait;
use condo_domain::{AssetId, EntityId, ValidationReport};
use serde_json::Value;

use crate::errors::Result;

/// Binary attachment uploaded once the owning entity exists.
#[derive(Clone, PartialEq, Eq)]
pub struct SecondaryAsset {
    pub slot: &'static str,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SecondaryAsset {
    pub fn new(
        slot: &'static str,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            slot,
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads `path` and guesses the content type from its extension.
    pub fn from_path(slot: &'static str, path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = content_type_for(path).to_string();
        Ok(Self::new(slot, file_name, content_type, bytes))
    }
}

impl fmt::Debug for SecondaryAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondaryAsset")
            .field("slot", &self.slot)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// CRUD seam consumed by the wizard controller.
///
/// `resource` is the API collection (`condominiums`, `blocks`, …) and
/// `payload` the JSON produced by the form's draft-to-wire mapping.
#[async_trait]
pub trait EntityBackend: Send + Sync {
    /// Non-committing check of the full draft.
    async fn validate(&self, resource: &str, payload: &Value) -> Result<ValidationReport>;

    async fn create(&self, resource: &str, payload: &Value) -> Result<EntityId>;

    async fn update(&self, resource: &str, id: &EntityId, payload: &Value) -> Result<EntityId>;

    /// Best-effort; a failure never undoes the primary save.
    async fn upload_secondary_asset(
        &self,
        resource: &str,
        id: &EntityId,
        asset: &SecondaryAsset,
    ) -> Result<AssetId>;
}
