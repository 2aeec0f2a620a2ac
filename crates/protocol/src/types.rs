use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical descriptor of a file stored on the remote service.
///
/// The rapid-upload path embeds this under `info` with `server_*` time
/// fields, while `create` returns it at the top level with bare
/// `ctime`/`mtime`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    #[serde(default)]
    pub fs_id: u64,
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub isdir: u8,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub md5: String,
    #[serde(default, alias = "ctime")]
    pub server_ctime: i64,
    #[serde(default, alias = "mtime")]
    pub server_mtime: i64,
}

impl RemoteFile {
    /// File name, falling back to the last path segment when the service
    /// omits `server_filename`.
    pub fn name(&self) -> &str {
        if !self.server_filename.is_empty() {
            return &self.server_filename;
        }
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn is_dir(&self) -> bool {
        self.isdir != 0
    }

    /// Last modification time, if the service reported one.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        if self.server_mtime <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.server_mtime, 0)
    }

    /// Creation time, if the service reported one.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        if self.server_ctime <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.server_ctime, 0)
    }
}
