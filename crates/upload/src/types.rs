//! Data types for the upload flow.

use std::path::PathBuf;

use netdisk_transfer::DEFAULT_SLICE_SIZE;
use tracing::warn;

use crate::error::UploadError;
use crate::retry::RetryPolicy;

/// Fewest concurrent slice transfers.
pub const MIN_UPLOAD_THREADS: usize = 1;
/// Most concurrent slice transfers.
pub const MAX_UPLOAD_THREADS: usize = 32;
/// Concurrent slice transfers when unconfigured or misconfigured.
pub const DEFAULT_UPLOAD_THREADS: usize = 3;

/// A named byte source of known size, read exactly once.
pub struct UploadStream<R> {
    pub name: String,
    pub size: u64,
    pub reader: R,
}

impl<R> UploadStream<R> {
    pub fn new(name: impl Into<String>, size: u64, reader: R) -> Self {
        Self {
            name: name.into(),
            size,
            reader,
        }
    }
}

/// Tunables for one [`Uploader`](crate::Uploader).
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Concurrent slice transfers, within `[1, 32]`.
    pub upload_threads: usize,
    pub slice_size: u64,
    pub retry: RetryPolicy,
    /// Directory for the staged copy; the system temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_threads: DEFAULT_UPLOAD_THREADS,
            slice_size: DEFAULT_SLICE_SIZE,
            retry: RetryPolicy::default(),
            temp_dir: None,
        }
    }
}

impl UploadConfig {
    /// Sets the worker count. Values outside `[1, 32]` fall back to 3.
    pub fn with_threads(mut self, threads: i64) -> Self {
        self.upload_threads = sanitize_threads(threads);
        self
    }

    /// Worker count actually used by the uploader.
    pub(crate) fn effective_threads(&self) -> usize {
        sanitize_threads(self.upload_threads as i64)
    }
}

fn sanitize_threads(threads: i64) -> usize {
    if (MIN_UPLOAD_THREADS as i64..=MAX_UPLOAD_THREADS as i64).contains(&threads) {
        threads as usize
    } else {
        warn!(
            threads,
            default = DEFAULT_UPLOAD_THREADS,
            "upload thread count out of range, using default"
        );
        DEFAULT_UPLOAD_THREADS
    }
}

/// A server-side upload session awaiting slice data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub upload_id: String,
    /// Indices the server still needs, in server order.
    pub required: Vec<usize>,
    pub total_slices: usize,
}

impl UploadSession {
    /// Builds a session, rejecting indices outside the slice plan.
    pub fn new(
        upload_id: String,
        required: Vec<usize>,
        total_slices: usize,
    ) -> Result<Self, UploadError> {
        if let Some(&partseq) = required.iter().find(|&&i| i >= total_slices) {
            return Err(UploadError::UnknownSlice {
                partseq,
                slice_count: total_slices,
            });
        }
        Ok(Self {
            upload_id,
            required,
            total_slices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.upload_threads, 3);
        assert_eq!(config.slice_size, 4 * 1024 * 1024);
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn threads_in_range_are_kept() {
        assert_eq!(UploadConfig::default().with_threads(1).upload_threads, 1);
        assert_eq!(UploadConfig::default().with_threads(32).upload_threads, 32);
        assert_eq!(UploadConfig::default().with_threads(8).upload_threads, 8);
    }

    #[test]
    fn threads_out_of_range_fall_back_to_default() {
        assert_eq!(UploadConfig::default().with_threads(0).upload_threads, 3);
        assert_eq!(UploadConfig::default().with_threads(33).upload_threads, 3);
        assert_eq!(UploadConfig::default().with_threads(-4).upload_threads, 3);
    }

    #[test]
    fn field_set_threads_are_sanitized_at_use() {
        let config = UploadConfig {
            upload_threads: 500,
            ..UploadConfig::default()
        };
        assert_eq!(config.effective_threads(), 3);
    }

    #[test]
    fn session_accepts_known_indices() {
        let session = UploadSession::new("u1".into(), vec![2, 0], 3).unwrap();
        assert_eq!(session.required, vec![2, 0]);
    }

    #[test]
    fn session_rejects_unknown_index() {
        let err = UploadSession::new("u1".into(), vec![0, 3], 3).unwrap_err();
        assert!(matches!(
            err,
            UploadError::UnknownSlice {
                partseq: 3,
                slice_count: 3
            }
        ));
    }
}
