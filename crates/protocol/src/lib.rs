//! Wire types for the netdisk rapid-upload protocol.
//!
//! Three request shapes make up an upload:
//!
//! 1. **precreate**: announce size and hashes; the service either confirms a
//!    content match (rapid upload) or opens an upload session.
//! 2. **superfile upload**: one multipart request per required slice.
//! 3. **create**: commit the session and receive the final file descriptor.

pub mod constants;
pub mod messages;
pub mod types;

pub use messages::{
    CreateRequest, Precreate, PrecreateRequest, PrecreateResponse, SliceUploadParams,
    SliceUploadResponse,
};
pub use types::RemoteFile;

/// Errors produced while interpreting protocol responses.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("precreate response has no uploadid")]
    MissingUploadId,

    #[error("rapid upload response has no file info")]
    MissingFileInfo,
}
