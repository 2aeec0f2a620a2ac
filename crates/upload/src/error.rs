//! Upload error types.

use netdisk_transfer::TransferError;

/// Errors produced by the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("netdisk error: {0}")]
    Client(#[from] netdisk_client::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] netdisk_protocol::ProtocolError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server requested slice {partseq}, plan has {slice_count} slices")]
    UnknownSlice { partseq: usize, slice_count: usize },

    #[error("slice {partseq} failed after {attempts} attempts: {source}")]
    SliceFailed {
        partseq: usize,
        attempts: u32,
        #[source]
        source: Box<UploadError>,
    },

    #[error("cancelled")]
    Cancelled,
}

impl UploadError {
    /// `true` when the upload stopped because it was cancelled, at any layer.
    ///
    /// Callers use this to avoid retrying a deliberately stopped upload.
    pub fn is_cancelled(&self) -> bool {
        match self {
            UploadError::Cancelled | UploadError::Transfer(TransferError::Cancelled) => true,
            UploadError::SliceFailed { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_recognised_through_layers() {
        assert!(UploadError::Cancelled.is_cancelled());
        assert!(UploadError::Transfer(TransferError::Cancelled).is_cancelled());
        assert!(
            !UploadError::Transfer(TransferError::SizeMismatch {
                expected: 1,
                actual: 0
            })
            .is_cancelled()
        );
        assert!(
            !UploadError::UnknownSlice {
                partseq: 9,
                slice_count: 2
            }
            .is_cancelled()
        );
    }

    #[test]
    fn slice_failure_mentions_partseq_and_attempts() {
        let err = UploadError::SliceFailed {
            partseq: 4,
            attempts: 3,
            source: Box::new(UploadError::Client(netdisk_client::Error::Slice {
                error_code: 31299,
                errno: 0,
                body: "{}".into(),
            })),
        };
        let msg = err.to_string();
        assert!(msg.contains("slice 4"));
        assert!(msg.contains("3 attempts"));
        assert!(!err.is_cancelled());
    }
}
