//! Netdisk API client.
//!
//! Async HTTP client using `reqwest`; the access token travels as a query
//! parameter on every call.

use std::time::Duration;

use netdisk_protocol::constants::{
    DEFAULT_API_BASE, DEFAULT_UPLOAD_URL, FILE_ENDPOINT, METHOD_CREATE, METHOD_PRECREATE,
    METHOD_UPLOAD, SLICE_FIELD_NAME,
};
use netdisk_protocol::messages::Errno;
use netdisk_protocol::{
    CreateRequest, PrecreateRequest, PrecreateResponse, RemoteFile, SliceUploadParams,
    SliceUploadResponse,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the netdisk client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, with the request URL removed.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API errno {errno}: {body}")]
    Api { errno: i64, body: String },

    #[error("slice rejected (error_code {error_code}, errno {errno}): {body}")]
    Slice {
        error_code: i64,
        errno: i64,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing access token")]
    InvalidToken,
}

// The URL carries the access token as a query parameter.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.without_url())
    }
}

/// Netdisk API client.
pub struct Client {
    http: reqwest::Client,
    access_token: String,
    api_base: String,
    upload_url: String,
}

impl Client {
    /// Creates a client against the public endpoints.
    pub fn new(access_token: &str) -> Result<Self, Error> {
        if access_token.trim().is_empty() {
            return Err(Error::InvalidToken);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            access_token: access_token.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
        })
    }

    /// Overrides the REST base URL and the superfile URL.
    pub fn with_endpoints(mut self, api_base: &str, upload_url: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.upload_url = upload_url.to_string();
        self
    }

    /// Posts a form to `/xpan/file` and decodes the response.
    async fn post_file_form<T: DeserializeOwned>(
        &self,
        method: &str,
        fields: &[(&'static str, String)],
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.api_base, FILE_ENDPOINT);
        let resp = self
            .http
            .post(&url)
            .query(&[("method", method), ("access_token", self.access_token.as_str())])
            .form(fields)
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        debug!(method, status = status.as_u16(), len = body.len(), "file api response");

        let errno: Errno = serde_json::from_slice(&body)?;
        if errno.errno != 0 {
            return Err(Error::Api {
                errno: errno.errno,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Announces a file by size and digests.
    pub async fn precreate(&self, req: &PrecreateRequest) -> Result<PrecreateResponse, Error> {
        self.post_file_form(METHOD_PRECREATE, &req.form_fields()).await
    }

    /// Commits an upload session and returns the stored file.
    pub async fn create(&self, req: &CreateRequest) -> Result<RemoteFile, Error> {
        self.post_file_form(METHOD_CREATE, &req.form_fields()).await
    }

    /// Sends one slice to the superfile endpoint.
    ///
    /// A non-zero `error_code` or `errno` in an otherwise successful response
    /// is reported as [`Error::Slice`].
    pub async fn upload_slice(
        &self,
        params: &SliceUploadParams,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<SliceUploadResponse, Error> {
        let mut query = vec![
            ("method", METHOD_UPLOAD.to_string()),
            ("access_token", self.access_token.clone()),
        ];
        query.extend(params.query_pairs());

        let part = Part::bytes(data).file_name(file_name.to_string());
        let form = Form::new().part(SLICE_FIELD_NAME, part);

        let resp = self
            .http
            .post(&self.upload_url)
            .query(&query)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(partseq = params.partseq, status = status.as_u16(), %body, "superfile response");

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SliceUploadResponse = serde_json::from_str(&body)?;
        if !parsed.is_success() {
            return Err(Error::Slice {
                error_code: parsed.error_code,
                errno: parsed.errno,
                body,
            });
        }
        Ok(parsed)
    }
}
