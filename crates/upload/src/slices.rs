//! Bounded parallel slice transfer.

use futures_util::{TryStreamExt, stream};
use netdisk_protocol::SliceUploadParams;
use netdisk_transfer::{SlicePlan, SliceProgress, StagedFile};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::NetdiskApi;
use crate::error::UploadError;
use crate::retry::RetryPolicy;
use crate::types::UploadSession;

/// Sends the slices a session still needs, at most `threads` at a time.
pub(crate) struct SliceUploader<'a> {
    pub api: &'a dyn NetdiskApi,
    pub staged: &'a StagedFile,
    pub plan: &'a SlicePlan,
    /// Remote path of the file being uploaded.
    pub path: &'a str,
    /// Name used for the multipart file field.
    pub file_name: &'a str,
    pub retry: &'a RetryPolicy,
    pub cancel: &'a CancellationToken,
}

impl SliceUploader<'_> {
    /// Uploads every required slice, reporting progress after each success.
    ///
    /// The first slice that exhausts its retries (or a cancellation) stops
    /// the whole phase; slices still in flight are dropped.
    pub async fn run(
        &self,
        session: &UploadSession,
        threads: usize,
        progress: &SliceProgress<'_>,
    ) -> Result<(), UploadError> {
        self.check_cancelled()?;

        if session.required.is_empty() {
            debug!(upload_id = %session.upload_id, "server holds every slice");
            progress.report_done();
            return Ok(());
        }

        debug!(
            upload_id = %session.upload_id,
            required = session.required.len(),
            total = session.total_slices,
            threads,
            "uploading slices"
        );

        let upload_id = session.upload_id.as_str();
        stream::iter(session.required.iter().copied().map(Ok::<usize, UploadError>))
            .try_for_each_concurrent(threads, |partseq| async move {
                self.check_cancelled()?;
                self.upload_with_retry(upload_id, partseq).await?;
                // No await between count and callback: progress stays monotonic.
                let pct = progress.record_success();
                debug!(partseq, pct, "slice uploaded");
                Ok(())
            })
            .await
    }

    async fn upload_with_retry(&self, upload_id: &str, partseq: usize) -> Result<(), UploadError> {
        let spec = self
            .plan
            .get(partseq)
            .ok_or(UploadError::UnknownSlice {
                partseq,
                slice_count: self.plan.len(),
            })?;
        let params = SliceUploadParams {
            path: self.path.to_string(),
            upload_id: upload_id.to_string(),
            partseq,
        };

        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.check_cancelled()?;

            let result = match self.staged.read_range(spec.offset, spec.len).await {
                Ok(data) => tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Err(UploadError::Cancelled),
                    r = self.api.upload_slice(&params, self.file_name, data) => r,
                },
                Err(e) => Err(e.into()),
            };

            let err = match result {
                Ok(()) => return Ok(()),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => e,
            };

            if attempt >= max_attempts {
                warn!(partseq, attempts = attempt, error = %err, "slice upload gave up");
                return Err(UploadError::SliceFailed {
                    partseq,
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                partseq,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "slice upload failed, retrying"
            );
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            Err(UploadError::Cancelled)
        } else {
            Ok(())
        }
    }
}
