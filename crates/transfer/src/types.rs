/// A contiguous byte range of the staged stream, the unit of transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    /// Zero-based index, sent to the service as `partseq`.
    pub index: usize,
    /// Byte offset within the stream.
    pub offset: u64,
    /// Length of this slice in bytes.
    pub len: u64,
}

impl SliceSpec {
    /// Offset one past the last byte of this slice.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// The three digests computed over one staged stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBundle {
    /// Lowercase hex MD5 of the entire stream.
    pub content_md5: String,
    /// Lowercase hex MD5 of each slice, in slice order.
    pub slice_md5s: Vec<String>,
    /// Lowercase hex MD5 of the first `min(size, HEAD_WINDOW_SIZE)` bytes.
    pub head_md5: String,
}

impl HashBundle {
    /// Slice digests as the JSON array the service calls `block_list`.
    pub fn block_list_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.slice_md5s)
    }
}
