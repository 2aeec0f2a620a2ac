use std::io::SeekFrom;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::TransferError;

/// Write buffer used while spilling the input stream (256 KiB).
const STAGE_BUFFER_SIZE: usize = 256 * 1024;

const STAGE_PREFIX: &str = "netdisk-stage-";

/// A read-only, randomly addressable copy of an input stream.
///
/// Backed by a named temporary file that is deleted when the value is
/// dropped, on every exit path of the owning pipeline.
pub struct StagedFile {
    file: NamedTempFile,
    len: u64,
}

impl StagedFile {
    /// Spills `reader` to a temporary file in `dir` (or the system temp dir).
    ///
    /// Fails with [`TransferError::SizeMismatch`] if the stream does not yield
    /// exactly `expected_len` bytes.
    pub async fn stage<R>(
        reader: &mut R,
        expected_len: u64,
        dir: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<Self, TransferError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGE_PREFIX);
        let temp = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let handle = tokio::fs::File::from_std(temp.as_file().try_clone()?);
        let mut writer = BufWriter::with_capacity(STAGE_BUFFER_SIZE, handle);

        let copied = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransferError::Cancelled),
            result = tokio::io::copy(reader, &mut writer) => result?,
        };
        writer.flush().await?;

        if copied != expected_len {
            return Err(TransferError::SizeMismatch {
                expected: expected_len,
                actual: copied,
            });
        }

        debug!(path = %temp.path().display(), bytes = copied, "stream staged");
        Ok(Self {
            file: temp,
            len: copied,
        })
    }

    /// Number of staged bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Opens an independent handle positioned at offset 0.
    pub async fn open(&self) -> Result<tokio::fs::File, TransferError> {
        Ok(tokio::fs::File::open(self.file.path()).await?)
    }

    /// Reads `len` bytes starting at `offset` through a fresh handle.
    ///
    /// Each call owns its own file cursor, so concurrent readers never
    /// interfere with each other.
    pub async fn read_range(&self, offset: u64, len: u64) -> Result<Vec<u8>, TransferError> {
        let end = offset.checked_add(len).filter(|end| *end <= self.len);
        if end.is_none() {
            return Err(TransferError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "range {offset}+{len} exceeds staged length {}",
                    self.len
                ),
            )));
        }

        let mut buf = vec![0u8; len as usize];
        if len == 0 {
            return Ok(buf);
        }

        let mut file = self.open().await?;
        file.seek(SeekFrom::Start(offset)).await?;
        file.read_exact(&mut buf).await?;
        Ok(buf)
    }
}
