//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Authentication settings, loaded from the `[auth]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: String,

    /// How long an issued token stays valid.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// Max-Age of the session cookie.
    #[serde(with = "humantime_serde")]
    pub cookie_lifetime: Duration,

    /// Mark session cookies `Secure`.
    pub cookie_secure: bool,

    /// `SameSite` attribute of session cookies.
    pub cookie_same_site: SameSitePolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
            cookie_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::Lax,
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.trim().is_empty() {
            return Err("auth.jwt_secret must not be empty".into());
        }
        if self.token_lifetime.is_zero() {
            return Err("auth.token_lifetime must be greater than zero".into());
        }
        if self.cookie_lifetime.is_zero() {
            return Err("auth.cookie_lifetime must be greater than zero".into());
        }
        if self.cookie_same_site == SameSitePolicy::None && !self.cookie_secure {
            return Err("auth.cookie_same_site = \"none\" requires auth.cookie_secure".into());
        }
        Ok(())
    }
}

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSitePolicy> for cookie::SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => cookie::SameSite::Strict,
            SameSitePolicy::Lax => cookie::SameSite::Lax,
            SameSitePolicy::None => cookie::SameSite::None,
        }
    }
}
