use serde::{Deserialize, Serialize};

use crate::ProtocolError;
use crate::constants::{RETURN_TYPE_RAPID, RTYPE_OVERWRITE, UPLOAD_TYPE_TMPFILE};
use crate::types::RemoteFile;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Session negotiation: announces size and hashes before any bytes move.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecreateRequest {
    /// Absolute remote path of the file being created.
    pub path: String,
    pub size: u64,
    /// JSON array of hex slice digests.
    pub block_list: String,
    /// Digest of the whole stream.
    pub content_md5: String,
    /// Digest of the head window.
    pub slice_md5: String,
}

impl PrecreateRequest {
    /// Form fields in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("path", self.path.clone()),
            ("size", self.size.to_string()),
            ("isdir", "0".into()),
            ("autoinit", "1".into()),
            ("rtype", RTYPE_OVERWRITE.to_string()),
            ("block_list", self.block_list.clone()),
            ("content-md5", self.content_md5.clone()),
            ("slice-md5", self.slice_md5.clone()),
        ]
    }
}

/// Commits an upload session.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub path: String,
    pub size: u64,
    pub upload_id: String,
    /// The full block list sent during precreate, not just the uploaded subset.
    pub block_list: String,
}

impl CreateRequest {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("path", self.path.clone()),
            ("size", self.size.to_string()),
            ("isdir", "0".into()),
            ("rtype", RTYPE_OVERWRITE.to_string()),
            ("uploadid", self.upload_id.clone()),
            ("block_list", self.block_list.clone()),
        ]
    }
}

/// Query parameters identifying one slice within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceUploadParams {
    pub path: String,
    pub upload_id: String,
    /// Zero-based slice index.
    pub partseq: usize,
}

impl SliceUploadParams {
    /// Query pairs excluding the method tag and credentials.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("type", UPLOAD_TYPE_TMPFILE.into()),
            ("path", self.path.clone()),
            ("uploadid", self.upload_id.clone()),
            ("partseq", self.partseq.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Minimal view of any REST response: only the status code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Errno {
    #[serde(default)]
    pub errno: i64,
}

/// Raw precreate response as sent by the service.
///
/// Use [`PrecreateResponse::into_outcome`] rather than inspecting
/// `return_type` directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecreateResponse {
    #[serde(default)]
    pub errno: i64,
    #[serde(default)]
    pub return_type: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uploadid: String,
    #[serde(default)]
    pub block_list: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<RemoteFile>,
}

/// Outcome of session negotiation.
#[derive(Debug, Clone, PartialEq)]
pub enum Precreate {
    /// The service already holds this content; no bytes need to move.
    Rapid(RemoteFile),
    /// A session was opened and these slice indices still need uploading.
    Session {
        upload_id: String,
        required: Vec<usize>,
    },
}

impl PrecreateResponse {
    pub fn into_outcome(self) -> Result<Precreate, ProtocolError> {
        if self.return_type == RETURN_TYPE_RAPID {
            return self
                .info
                .map(Precreate::Rapid)
                .ok_or(ProtocolError::MissingFileInfo);
        }
        if self.uploadid.is_empty() {
            return Err(ProtocolError::MissingUploadId);
        }
        Ok(Precreate::Session {
            upload_id: self.uploadid,
            required: self.block_list,
        })
    }
}

/// Superfile response. Either code being non-zero means the slice was not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceUploadResponse {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub errno: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_msg: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub md5: String,
}

impl SliceUploadResponse {
    pub fn is_success(&self) -> bool {
        self.error_code == 0 && self.errno == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precreate_form_field_order() {
        let req = PrecreateRequest {
            path: "/apps/demo/a b.txt".into(),
            size: 11,
            block_list: r#"["5eb63bbbe01eeed093cb22bb8f5acdc3"]"#.into(),
            content_md5: "5eb63bbbe01eeed093cb22bb8f5acdc3".into(),
            slice_md5: "5eb63bbbe01eeed093cb22bb8f5acdc3".into(),
        };
        let keys: Vec<_> = req.form_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            [
                "path",
                "size",
                "isdir",
                "autoinit",
                "rtype",
                "block_list",
                "content-md5",
                "slice-md5"
            ]
        );
        let fields = req.form_fields();
        assert_eq!(fields[1].1, "11");
        assert_eq!(fields[2].1, "0");
        assert_eq!(fields[3].1, "1");
        assert_eq!(fields[4].1, "3");
    }

    #[test]
    fn create_form_carries_session() {
        let req = CreateRequest {
            path: "/apps/demo/a.txt".into(),
            size: 4,
            upload_id: "N1-abc".into(),
            block_list: "[]".into(),
        };
        let fields = req.form_fields();
        assert!(fields.contains(&("uploadid", "N1-abc".to_string())));
        assert!(fields.contains(&("isdir", "0".to_string())));
        assert!(fields.contains(&("block_list", "[]".to_string())));
    }

    #[test]
    fn slice_query_pairs() {
        let params = SliceUploadParams {
            path: "/apps/demo/a.txt".into(),
            upload_id: "N1-abc".into(),
            partseq: 7,
        };
        let pairs = params.query_pairs();
        assert!(pairs.contains(&("partseq", "7".to_string())));
        assert!(pairs.contains(&("type", "tmpfile".to_string())));
    }

    #[test]
    fn precreate_rapid_outcome() {
        let json = r#"{"errno":0,"return_type":2,"info":{"fs_id":1,"path":"/apps/x","size":3}}"#;
        let resp: PrecreateResponse = serde_json::from_str(json).unwrap();
        match resp.into_outcome().unwrap() {
            Precreate::Rapid(file) => assert_eq!(file.path, "/apps/x"),
            other => panic!("expected rapid, got {other:?}"),
        }
    }

    #[test]
    fn precreate_session_outcome() {
        let json = r#"{"errno":0,"return_type":1,"uploadid":"P1-xyz","block_list":[0,2]}"#;
        let resp: PrecreateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_outcome().unwrap(),
            Precreate::Session {
                upload_id: "P1-xyz".into(),
                required: vec![0, 2],
            }
        );
    }

    #[test]
    fn precreate_rapid_without_info_is_rejected() {
        let resp = PrecreateResponse {
            return_type: RETURN_TYPE_RAPID,
            ..Default::default()
        };
        assert!(matches!(
            resp.into_outcome(),
            Err(ProtocolError::MissingFileInfo)
        ));
    }

    #[test]
    fn precreate_session_without_uploadid_is_rejected() {
        let resp = PrecreateResponse {
            return_type: 1,
            block_list: vec![0],
            ..Default::default()
        };
        assert!(matches!(
            resp.into_outcome(),
            Err(ProtocolError::MissingUploadId)
        ));
    }

    #[test]
    fn slice_response_codes() {
        let ok: SliceUploadResponse =
            serde_json::from_str(r#"{"md5":"abc","request_id":1}"#).unwrap();
        assert!(ok.is_success());

        let bad: SliceUploadResponse =
            serde_json::from_str(r#"{"error_code":31299,"error_msg":"fail"}"#).unwrap();
        assert!(!bad.is_success());

        let bad: SliceUploadResponse = serde_json::from_str(r#"{"errno":-6}"#).unwrap();
        assert!(!bad.is_success());
    }
}
