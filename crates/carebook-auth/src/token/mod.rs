//! Session tokens and the cookies that carry them.

mod session_cookie;
mod issuer;
mod jwt;

pub use session_cookie::{ADMIN_COOKIE, CookieSettings, PATIENT_COOKIE, cookie_name_for};
pub use issuer::{TokenIssuer, TokenResponse};
pub use jwt::{JwtError, JwtService, SessionClaims};
