//! HTTP handlers owned by the auth layer.

mod logout;

pub use logout::{LogoutResponse, logout_admin, logout_patient};
