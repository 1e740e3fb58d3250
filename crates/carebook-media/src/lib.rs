//! Avatar blob storage for the Carebook server.
//!
//! [`BlobStore`] is the seam the handlers use; [`CloudinaryStore`] talks to
//! the Cloudinary upload API and [`DisabledStore`] stands in when no
//! credentials are configured.

mod cloudinary;
mod config;
mod error;
mod format;
mod store;

pub use cloudinary::CloudinaryStore;
pub use config::{MediaConfig, SignatureAlgorithm};
pub use error::MediaError;
pub use format::AvatarFormat;
pub use store::{AvatarUpload, BlobStore, DisabledStore, DynBlobStore, StoredBlob};
