//! Single-file upload pipeline.

use netdisk_protocol::{CreateRequest, Precreate, PrecreateRequest, RemoteFile};
use netdisk_transfer::{
    ProgressFn, SlicePlan, SliceProgress, StagedFile, hash_staged, join_remote_path,
};
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{ApiFuture, NetdiskApi};
use crate::error::UploadError;
use crate::slices::SliceUploader;
use crate::types::{UploadConfig, UploadSession, UploadStream};

/// Uploads streams through one [`NetdiskApi`].
pub struct Uploader<'a> {
    api: &'a dyn NetdiskApi,
    cancel: CancellationToken,
    config: UploadConfig,
}

impl<'a> Uploader<'a> {
    pub fn new(api: &'a dyn NetdiskApi, cancel: CancellationToken) -> Self {
        Self {
            api,
            cancel,
            config: UploadConfig::default(),
        }
    }

    pub fn with_config(mut self, config: UploadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Uploads `stream` into the remote directory `dest_dir`.
    ///
    /// The pipeline:
    /// 1. Stage the stream into a temporary file
    /// 2. Plan slices
    /// 3. Hash content, slices and head window in one pass
    /// 4. Precreate; a content match returns immediately
    /// 5. Upload the slices the server still needs
    /// 6. Create the file from the session
    ///
    /// `progress` receives slice-completion percentages during step 5 and
    /// `100` when nothing needs sending. The staged file is removed on
    /// every exit path.
    pub async fn upload<R>(
        &self,
        stream: UploadStream<R>,
        dest_dir: &str,
        progress: &ProgressFn<'_>,
    ) -> Result<RemoteFile, UploadError>
    where
        R: AsyncRead + Unpin,
    {
        self.check_cancelled()?;

        let UploadStream {
            name,
            size,
            mut reader,
        } = stream;
        let path = join_remote_path(dest_dir, &name)?;

        // 1. Stage
        let staged = StagedFile::stage(
            &mut reader,
            size,
            self.config.temp_dir.as_deref(),
            &self.cancel,
        )
        .await?;
        drop(reader);

        // 2. Plan
        let plan = SlicePlan::new(size, self.config.slice_size);

        // 3. Hash
        let hashes = hash_staged(&staged, &plan, &self.cancel).await?;
        let block_list = hashes.block_list_json()?;
        debug!(
            path = %path,
            size,
            slices = plan.len(),
            content_md5 = %hashes.content_md5,
            "hashed upload"
        );

        // 4. Negotiate
        self.check_cancelled()?;
        let req = PrecreateRequest {
            path: path.clone(),
            size,
            block_list: block_list.clone(),
            content_md5: hashes.content_md5.clone(),
            slice_md5: hashes.head_md5.clone(),
        };
        let outcome = self
            .cancellable(self.api.precreate(&req))
            .await?
            .into_outcome()?;

        let session = match outcome {
            Precreate::Rapid(file) => {
                info!(path = %file.path, size = file.size, "rapid upload matched");
                progress(100);
                return Ok(file);
            }
            Precreate::Session {
                upload_id,
                required,
            } => UploadSession::new(upload_id, required, plan.len())?,
        };

        // 5. Upload slices
        let tracker = SliceProgress::new(session.required.len(), progress);
        let uploader = SliceUploader {
            api: self.api,
            staged: &staged,
            plan: &plan,
            path: &path,
            file_name: &name,
            retry: &self.config.retry,
            cancel: &self.cancel,
        };
        uploader
            .run(&session, self.config.effective_threads(), &tracker)
            .await?;

        // 6. Finalize
        self.check_cancelled()?;
        let req = CreateRequest {
            path,
            size,
            upload_id: session.upload_id,
            block_list,
        };
        let file = self.cancellable(self.api.create(&req)).await?;

        info!(
            path = %file.path,
            size = file.size,
            uploaded = tracker.completed(),
            total = plan.len(),
            "upload complete"
        );
        Ok(file)
    }

    async fn cancellable<T>(&self, call: ApiFuture<'_, T>) -> Result<T, UploadError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(UploadError::Cancelled),
            result = call => result,
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
