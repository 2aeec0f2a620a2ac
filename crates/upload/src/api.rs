//! Remote service seam.
//!
//! `NetdiskApi` is implemented by [`netdisk_client::Client`] for real
//! traffic. Keeping the pipeline behind a trait makes it testable with mocks.

use std::future::Future;
use std::pin::Pin;

use netdisk_client::Client;
use netdisk_protocol::{
    CreateRequest, PrecreateRequest, PrecreateResponse, RemoteFile, SliceUploadParams,
};

use crate::error::UploadError;

/// Boxed future returned by [`NetdiskApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// The three calls the upload pipeline makes against the service.
pub trait NetdiskApi: Send + Sync {
    /// Announces the file and its digests.
    fn precreate<'a>(&'a self, req: &'a PrecreateRequest) -> ApiFuture<'a, PrecreateResponse>;

    /// Sends one slice. Any error is treated as transient by the caller.
    fn upload_slice<'a>(
        &'a self,
        params: &'a SliceUploadParams,
        file_name: &'a str,
        data: Vec<u8>,
    ) -> ApiFuture<'a, ()>;

    /// Commits the session.
    fn create<'a>(&'a self, req: &'a CreateRequest) -> ApiFuture<'a, RemoteFile>;
}

impl NetdiskApi for Client {
    fn precreate<'a>(&'a self, req: &'a PrecreateRequest) -> ApiFuture<'a, PrecreateResponse> {
        Box::pin(async move { Ok(Client::precreate(self, req).await?) })
    }

    fn upload_slice<'a>(
        &'a self,
        params: &'a SliceUploadParams,
        file_name: &'a str,
        data: Vec<u8>,
    ) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            Client::upload_slice(self, params, file_name, data).await?;
            Ok(())
        })
    }

    fn create<'a>(&'a self, req: &'a CreateRequest) -> ApiFuture<'a, RemoteFile> {
        Box::pin(async move { Ok(Client::create(self, req).await?) })
    }
}
