//! Cloudinary upload API client.
//!
//! Requests are authenticated with a signature: the signed parameters sorted
//! by name, joined as `k=v&k=v`, suffixed with the API secret and hashed.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::config::{MediaConfig, SignatureAlgorithm};
use crate::error::MediaError;
use crate::store::{AvatarUpload, BlobStore, StoredBlob};

pub struct CloudinaryStore {
    http_client: Client,
    config: MediaConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStore {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        sign_params(params, &self.config.api_secret, self.config.signature_algorithm)
    }

    async fn read_error(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => "Unknown error".to_string(),
        };
        MediaError::Rejected { status, message }
    }
}

/// Computes a Cloudinary request signature.
pub(crate) fn sign_params(
    params: &[(&str, String)],
    secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);
    let mut payload = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    payload.push_str(secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[async_trait]
impl BlobStore for CloudinaryStore {
    async fn upload(&self, upload: AvatarUpload) -> Result<StoredBlob, MediaError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let mut signed = vec![("timestamp", timestamp.clone())];
        if let Some(folder) = &self.config.folder {
            signed.push(("folder", folder.clone()));
        }
        let signature = self.sign(&signed);

        let file = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.format.mime_type())?;
        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (name, value) in signed {
            form = form.text(name, value);
        }

        let response = self
            .http_client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        tracing::debug!(public_id = %body.public_id, "Uploaded avatar");
        Ok(StoredBlob {
            public_id: body.public_id,
            url: body.secure_url,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signed = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ];
        let signature = self.sign(&signed);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (name, value) in signed {
            form = form.text(name, value);
        }

        let response = self
            .http_client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        if body.result != "ok" {
            return Err(MediaError::Rejected {
                status: 200,
                message: body.result,
            });
        }
        tracing::debug!(public_id = %public_id, "Destroyed avatar");
        Ok(())
    }
}
