//! Endpoints and fixed request values.

/// Base URL of the REST API (`/xpan/*` endpoints).
pub const DEFAULT_API_BASE: &str = "https://pan.baidu.com/rest/2.0";

/// Superfile endpoint that receives slice data.
pub const DEFAULT_UPLOAD_URL: &str = "https://d.pcs.baidu.com/rest/2.0/pcs/superfile2";

/// File management endpoint, relative to the API base.
pub const FILE_ENDPOINT: &str = "/xpan/file";

/// `method` query value for session negotiation.
pub const METHOD_PRECREATE: &str = "precreate";

/// `method` query value for the final commit.
pub const METHOD_CREATE: &str = "create";

/// `method` query value for slice uploads.
pub const METHOD_UPLOAD: &str = "upload";

/// Superfile transfer type.
pub const UPLOAD_TYPE_TMPFILE: &str = "tmpfile";

/// Rename policy: overwrite whatever already exists at the path.
pub const RTYPE_OVERWRITE: u8 = 3;

/// `return_type` signalling that the service already holds the content.
pub const RETURN_TYPE_RAPID: i32 = 2;

/// Multipart field name carrying slice bytes.
pub const SLICE_FIELD_NAME: &str = "file";
