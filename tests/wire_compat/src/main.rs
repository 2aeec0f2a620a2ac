fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use netdisk_protocol::{Precreate, PrecreateResponse, RemoteFile, SliceUploadResponse};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  Rust: {reserialized}"
        );
        parsed
    }

    // --- precreate ---

    #[test]
    fn fixture_precreate_rapid() {
        let resp = roundtrip_test::<PrecreateResponse>("precreate_rapid.json");
        match resp.into_outcome().unwrap() {
            Precreate::Rapid(file) => {
                assert_eq!(file.path, "/apps/demo/report.pdf");
                assert_eq!(file.name(), "report.pdf");
                assert_eq!(file.size, 10_485_760);
                assert_eq!(file.server_mtime, 1_700_000_100);
            }
            other => panic!("expected rapid match, got {other:?}"),
        }
    }

    #[test]
    fn fixture_precreate_session() {
        let resp = roundtrip_test::<PrecreateResponse>("precreate_session.json");
        match resp.into_outcome().unwrap() {
            Precreate::Session {
                upload_id,
                required,
            } => {
                assert!(upload_id.starts_with("N1-"));
                assert_eq!(required, vec![0, 1, 2]);
            }
            other => panic!("expected session, got {other:?}"),
        }
    }

    #[test]
    fn precreate_session_without_block_list() {
        let json = r#"{"errno":0,"return_type":1,"uploadid":"N1-abc"}"#;
        let resp: PrecreateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_outcome().unwrap(),
            Precreate::Session {
                upload_id: "N1-abc".into(),
                required: Vec::new(),
            }
        );
    }

    #[test]
    fn precreate_ignores_unknown_fields() {
        let json = r#"{"errno":0,"return_type":1,"uploadid":"N1-x","block_list":[1],"request_id":889230}"#;
        let resp: PrecreateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.block_list, vec![1]);
    }

    // --- create ---

    #[test]
    fn fixture_create_response_uses_bare_times() {
        let json = load_fixture("create_response.json");
        let file: RemoteFile = serde_json::from_value(json).unwrap();
        assert_eq!(file.fs_id, 620_781_293_446_173);
        assert_eq!(file.path, "/apps/demo/report.pdf");
        assert_eq!(file.server_filename, "report.pdf");
        assert_eq!(file.server_ctime, 1_700_000_000);
        assert_eq!(file.server_mtime, 1_700_000_100);
        assert!(!file.is_dir());
        assert!(file.modified().is_some());
    }

    #[test]
    fn create_response_reserializes_with_server_times() {
        let json = load_fixture("create_response.json");
        let file: RemoteFile = serde_json::from_value(json).unwrap();
        let out = serde_json::to_value(&file).unwrap();
        assert_eq!(out["server_mtime"], 1_700_000_100);
        assert!(out.get("mtime").is_none());
        assert!(out.get("category").is_none());
    }

    // --- superfile ---

    #[test]
    fn fixture_superfile_ok() {
        let resp = roundtrip_test::<SliceUploadResponse>("superfile_ok.json");
        assert!(resp.is_success());
        assert_eq!(resp.md5, "2c8d3b1f0e4a5b6c7d8e9f0a1b2c3d4e");
    }

    #[test]
    fn fixture_superfile_error() {
        let resp = roundtrip_test::<SliceUploadResponse>("superfile_error.json");
        assert!(!resp.is_success());
        assert_eq!(resp.error_code, 31299);
    }

    #[test]
    fn superfile_errno_alone_is_failure() {
        let resp: SliceUploadResponse = serde_json::from_str(r#"{"errno":-6}"#).unwrap();
        assert!(!resp.is_success());
    }

    #[test]
    fn superfile_minimal_success() {
        let resp: SliceUploadResponse =
            serde_json::from_str(r#"{"md5":"abc","request_id":1234}"#).unwrap();
        assert!(resp.is_success());
    }
}
