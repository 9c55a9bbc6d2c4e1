use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Where an uploaded file belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum UploadFolder {
    #[serde(rename = "category/image")]
    CategoryImage,
    #[serde(rename = "country/icons")]
    CountryIcon,
    #[serde(rename = "products/main_images")]
    ProductMainImage,
    #[serde(rename = "products/images")]
    ProductImage,
    #[serde(rename = "services/images")]
    ServiceImage,
    #[serde(rename = "users/image")]
    UserImage,
}

impl UploadFolder {
    pub fn as_path(self) -> &'static str {
        match self {
            UploadFolder::CategoryImage => "category/image",
            UploadFolder::CountryIcon => "country/icons",
            UploadFolder::ProductMainImage => "products/main_images",
            UploadFolder::ProductImage => "products/images",
            UploadFolder::ServiceImage => "services/images",
            UploadFolder::UserImage => "users/image",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_matches('/') {
            "category/image" => Some(UploadFolder::CategoryImage),
            "country/icons" => Some(UploadFolder::CountryIcon),
            "products/main_images" => Some(UploadFolder::ProductMainImage),
            "products/images" => Some(UploadFolder::ProductImage),
            "services/images" => Some(UploadFolder::ServiceImage),
            "users/image" => Some(UploadFolder::UserImage),
            _ => None,
        }
    }
}

/// Stores uploaded bytes and hands back a reference URL. File contents are
/// never inspected.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, folder: UploadFolder, file_name: &str, bytes: &[u8]) -> AppResult<String>;
}

pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, folder: UploadFolder, file_name: &str, bytes: &[u8]) -> AppResult<String> {
        let dir = self.root.join(folder.as_path());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name));
        fs::write(dir.join(&stored_name), bytes)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        tracing::debug!(folder = folder.as_path(), file = %stored_name, size = bytes.len(), "stored upload");
        Ok(format!("{}/{}/{}", self.base_url, folder.as_path(), stored_name))
    }
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_`, and never
/// returns a hidden or empty name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
