//! Rapid-upload pipeline for the netdisk service.
//!
//! Given a stream of known size, the pipeline:
//! - stages it into a temporary file
//! - hashes it once (content, per-slice and head-window MD5)
//! - negotiates a session, skipping all transfer on a content match
//! - uploads the required slices with bounded parallelism and retry
//! - commits the session
//!
//! Service access goes through the [`NetdiskApi`] trait so the pipeline can
//! be driven by mocks in tests.

pub mod api;
pub mod error;
pub mod pipeline;
pub mod retry;
mod slices;
pub mod types;

pub use api::{ApiFuture, NetdiskApi};
pub use error::UploadError;
pub use pipeline::Uploader;
pub use retry::RetryPolicy;
pub use types::{
    DEFAULT_UPLOAD_THREADS, MAX_UPLOAD_THREADS, MIN_UPLOAD_THREADS, UploadConfig, UploadSession,
    UploadStream,
};
