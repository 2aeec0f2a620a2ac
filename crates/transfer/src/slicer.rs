use crate::types::SliceSpec;

/// Ordered slice boundaries for a stream of known size.
///
/// There is always at least one slice: a zero-length stream maps to a
/// single zero-length slice, and an exact multiple of the slice size ends
/// with a full slice rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    size: u64,
    slice_size: u64,
    slices: Vec<SliceSpec>,
}

impl SlicePlan {
    /// Computes the plan for `size` bytes cut into `slice_size` pieces.
    ///
    /// A `slice_size` of 0 is treated as [`DEFAULT_SLICE_SIZE`](crate::DEFAULT_SLICE_SIZE).
    pub fn new(size: u64, slice_size: u64) -> Self {
        let slice_size = if slice_size == 0 {
            crate::DEFAULT_SLICE_SIZE
        } else {
            slice_size
        };

        let count = size.div_ceil(slice_size).max(1) as usize;
        let mut last_len = size % slice_size;
        if size > 0 && last_len == 0 {
            last_len = slice_size;
        }

        let slices = (0..count)
            .map(|index| SliceSpec {
                index,
                offset: index as u64 * slice_size,
                len: if index + 1 == count {
                    last_len
                } else {
                    slice_size
                },
            })
            .collect();

        Self {
            size,
            slice_size,
            slices,
        }
    }

    /// Total stream size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn slice_size(&self) -> u64 {
        self.slice_size
    }

    /// Number of slices (never 0).
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the plan has no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Returns the slice at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&SliceSpec> {
        self.slices.get(index)
    }

    pub fn slices(&self) -> &[SliceSpec] {
        &self.slices
    }
}
