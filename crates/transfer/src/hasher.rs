use md5::{Digest, Md5};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::slicer::SlicePlan;
use crate::stage::StagedFile;
use crate::types::HashBundle;
use crate::{HEAD_WINDOW_SIZE, TransferError};

/// Read buffer for the hash pass (256 KiB).
const HASH_BUFFER_SIZE: usize = 256 * 1024;

/// Feeds one sequential byte stream into three MD5 accumulators at once.
///
/// - the content digest covers every byte;
/// - the slice digest restarts at every `slice_size` boundary;
/// - the head digest stops after `head_window` bytes, independent of slices.
pub struct MultiHasher {
    slice_size: u64,
    head_window: u64,
    content: Md5,
    slice: Md5,
    head: Md5,
    slice_filled: u64,
    head_filled: u64,
    slice_md5s: Vec<String>,
}

impl MultiHasher {
    /// Creates a hasher with the standard 256 KiB head window.
    pub fn new(slice_size: u64) -> Self {
        Self::with_head_window(slice_size, HEAD_WINDOW_SIZE)
    }

    pub fn with_head_window(slice_size: u64, head_window: u64) -> Self {
        let slice_size = if slice_size == 0 {
            crate::DEFAULT_SLICE_SIZE
        } else {
            slice_size
        };
        Self {
            slice_size,
            head_window,
            content: Md5::new(),
            slice: Md5::new(),
            head: Md5::new(),
            slice_filled: 0,
            head_filled: 0,
            slice_md5s: Vec::new(),
        }
    }

    pub fn update(&mut self, mut data: &[u8]) {
        self.content.update(data);

        if self.head_filled < self.head_window {
            let room = (self.head_window - self.head_filled).min(data.len() as u64) as usize;
            self.head.update(&data[..room]);
            self.head_filled += room as u64;
        }

        while !data.is_empty() {
            let room = (self.slice_size - self.slice_filled).min(data.len() as u64) as usize;
            self.slice.update(&data[..room]);
            self.slice_filled += room as u64;
            data = &data[room..];

            if self.slice_filled == self.slice_size {
                self.close_slice();
            }
        }
    }

    /// Number of slice digests finalized so far.
    pub fn completed_slices(&self) -> usize {
        self.slice_md5s.len()
    }

    fn close_slice(&mut self) {
        self.slice_md5s.push(hex::encode(self.slice.finalize_reset()));
        self.slice_filled = 0;
    }

    /// Finalizes all digests.
    ///
    /// A trailing partial slice gets its own digest; an input of zero bytes
    /// yields exactly one slice digest (of the empty string).
    pub fn finish(mut self) -> HashBundle {
        if self.slice_filled > 0 || self.slice_md5s.is_empty() {
            self.close_slice();
        }
        HashBundle {
            content_md5: hex::encode(self.content.finalize()),
            slice_md5s: self.slice_md5s,
            head_md5: hex::encode(self.head.finalize()),
        }
    }
}

/// Hashes a staged stream in one sequential pass from offset 0.
///
/// Cancellation is checked between reads. The resulting bundle is checked
/// against `plan` so that a truncated stage cannot produce a short block list.
pub async fn hash_staged(
    staged: &StagedFile,
    plan: &SlicePlan,
    cancel: &CancellationToken,
) -> Result<HashBundle, TransferError> {
    let mut file = staged.open().await?;
    let mut hasher = MultiHasher::new(plan.slice_size());
    let mut buf = vec![0u8; HASH_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    if total != plan.size() {
        return Err(TransferError::SizeMismatch {
            expected: plan.size(),
            actual: total,
        });
    }

    let bundle = hasher.finish();
    if bundle.slice_md5s.len() != plan.len() {
        return Err(TransferError::SliceCount {
            expected: plan.len(),
            actual: bundle.slice_md5s.len(),
        });
    }

    debug!(
        bytes = total,
        slices = plan.len(),
        content_md5 = %bundle.content_md5,
        "hash pass complete"
    );
    Ok(bundle)
}
