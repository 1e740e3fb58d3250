use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Blob store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Blob store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected blob store response: {0}")]
    InvalidResponse(String),

    #[error("Blob store is not configured")]
    NotConfigured,
}
