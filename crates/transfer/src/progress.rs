use std::sync::atomic::{AtomicUsize, Ordering};

/// Callback invoked with an upload percentage in `0..=100`.
pub type ProgressFn<'a> = dyn Fn(u8) + Send + Sync + 'a;

/// Shared completed-slice counter for one transfer phase.
///
/// Concurrent slice tasks call [`record_success`](Self::record_success) once
/// each; the count only ever increases and reaches `total` exactly when
/// every slice has succeeded. The callback runs on whichever task finished
/// the slice, so callers must not rely on ordering across slices beyond the
/// monotonic count.
pub struct SliceProgress<'a> {
    completed: AtomicUsize,
    total: usize,
    callback: &'a ProgressFn<'a>,
}

impl<'a> SliceProgress<'a> {
    pub fn new(total: usize, callback: &'a ProgressFn<'a>) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            callback,
        }
    }

    /// Counts one finished slice, reports the new percentage and returns it.
    pub fn record_success(&self) -> u8 {
        let done = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        let pct = percent(done, self.total);
        (self.callback)(pct);
        pct
    }

    /// Reports completion without counting a slice (nothing left to send).
    pub fn report_done(&self) {
        (self.callback)(100);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}
