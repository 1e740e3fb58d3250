//! Role-scoped session cookies.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite};
use carebook_storage::Role;
use time::OffsetDateTime;

use crate::config::AuthConfig;

/// Cookie carrying an admin session.
pub const ADMIN_COOKIE: &str = "adminToken";

/// Cookie carrying every non-admin session.
pub const PATIENT_COOKIE: &str = "patientToken";

/// Returns the session cookie name for a role.
#[must_use]
pub fn cookie_name_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_COOKIE,
        Role::Patient | Role::Doctor => PATIENT_COOKIE,
    }
}

/// Attributes shared by all session cookies.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub lifetime: Duration,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieSettings {
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            lifetime: config.cookie_lifetime,
            secure: config.cookie_secure,
            same_site: config.cookie_same_site.into(),
        }
    }

    /// Builds the `httpOnly` cookie holding `token`.
    #[must_use]
    pub fn session_cookie(&self, name: &'static str, token: String) -> Cookie<'static> {
        let max_age = time::Duration::seconds(self.lifetime.as_secs() as i64);
        Cookie::build((name, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age)
            .expires(OffsetDateTime::now_utc() + max_age)
            .build()
    }

    /// Builds an empty cookie that expires immediately, overwriting the session.
    #[must_use]
    pub fn clear_cookie(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(time::Duration::ZERO)
            .expires(OffsetDateTime::now_utc())
            .build()
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_name_for_role() {
        assert_eq!(cookie_name_for(Role::Admin), "adminToken");
        assert_eq!(cookie_name_for(Role::Patient), "patientToken");
        assert_eq!(cookie_name_for(Role::Doctor), "patientToken");
    }

    #[test]
    fn test_session_cookie_attributes() {
        let settings = CookieSettings::default();
        let cookie = settings.session_cookie(ADMIN_COOKIE, "abc".into());
        assert_eq!(cookie.name(), "adminToken");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_clear_cookie_expires_now() {
        let cookie = CookieSettings::default().clear_cookie(PATIENT_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        let header = cookie.to_string();
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("HttpOnly"));
    }
}
