//! Staging, slicing and hashing for chunked uploads.
//!
//! An input stream is spilled once to a [`StagedFile`], hashed in a single
//! sequential pass ([`hash_staged`]), then served as independent range reads
//! for concurrent slice transfer.

mod hasher;
mod progress;
mod slicer;
mod stage;
mod types;
mod validation;

pub use hasher::{MultiHasher, hash_staged};
pub use progress::{ProgressFn, SliceProgress};
pub use slicer::SlicePlan;
pub use stage::StagedFile;
pub use types::{HashBundle, SliceSpec};
pub use validation::join_remote_path;

/// Default slice size: 4 MiB.
///
/// Larger slices are accepted for some account tiers, so callers may
/// override it; the head window is fixed regardless.
pub const DEFAULT_SLICE_SIZE: u64 = 4 * 1024 * 1024;

/// Number of leading bytes covered by the head digest: 256 KiB.
pub const HEAD_WINDOW_SIZE: u64 = 256 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("hashed {actual} slices, plan has {expected}")]
    SliceCount { expected: usize, actual: usize },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("cancelled")]
    Cancelled,
}
