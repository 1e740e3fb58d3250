use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cloudinary settings, loaded from the `[media]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,

    /// API origin, overridable for tests.
    pub base_url: String,

    /// Folder that uploaded avatars are placed in.
    pub folder: Option<String>,

    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    pub signature_algorithm: SignatureAlgorithm,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            base_url: "https://api.cloudinary.com".into(),
            folder: None,
            timeout: Duration::from_secs(30),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }
}

impl MediaConfig {
    /// All three credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// Digest used for request signatures. Must match the account setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}
