use axum::extract::FromRef;
use carebook_auth::{AuthState, TokenIssuer};
use carebook_media::DynBlobStore;
use carebook_storage::{DynAppointmentStorage, DynMessageStorage, DynUserStorage};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub users: DynUserStorage,
    pub messages: DynMessageStorage,
    pub appointments: DynAppointmentStorage,
    pub blobs: DynBlobStore,
}

impl AppState {
    pub fn issuer(&self) -> &TokenIssuer {
        &self.auth.issuer
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
