use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MediaError;
use crate::format::AvatarFormat;

/// An avatar image received from a client.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub format: AvatarFormat,
    pub bytes: Vec<u8>,
}

/// Reference returned by the store after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub public_id: String,
    pub url: String,
}

/// Object store for avatar images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads an image and returns its identifier and public URL.
    async fn upload(&self, upload: AvatarUpload) -> Result<StoredBlob, MediaError>;

    /// Deletes a previously uploaded image.
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

pub type DynBlobStore = Arc<dyn BlobStore>;

/// Store used when no credentials are configured. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl BlobStore for DisabledStore {
    async fn upload(&self, _upload: AvatarUpload) -> Result<StoredBlob, MediaError> {
        Err(MediaError::NotConfigured)
    }

    async fn destroy(&self, _public_id: &str) -> Result<(), MediaError> {
        Err(MediaError::NotConfigured)
    }
}
