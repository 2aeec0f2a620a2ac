use crate::TransferError;

/// Joins a remote directory and file name into an absolute remote path.
///
/// Rejects:
/// - Relative directories (the service addresses everything from `/`)
/// - `..` segments in the directory
/// - Empty names, names containing `/`, and the names `.` / `..`
pub fn join_remote_path(dir: &str, name: &str) -> Result<String, TransferError> {
    if !dir.starts_with('/') {
        return Err(TransferError::InvalidPath(format!(
            "remote directory must be absolute: {dir}"
        )));
    }
    if dir.split('/').any(|segment| segment == "..") {
        return Err(TransferError::InvalidPath(format!(
            "parent directory traversal not allowed: {dir}"
        )));
    }
    if name.is_empty() || name == "." || name == ".." {
        return Err(TransferError::InvalidPath(format!(
            "invalid file name: {name:?}"
        )));
    }
    if name.contains('/') {
        return Err(TransferError::InvalidPath(format!(
            "file name must not contain '/': {name}"
        )));
    }

    let dir = dir.trim_end_matches('/');
    Ok(format!("{dir}/{name}"))
}
