use bitable_model::Record;

/// Snapshot handed to a [`BatchSink`] after each page.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Every record accepted so far, in arrival order.
    pub records: &'a [Record],
    /// 1-based page counter.
    pub page: usize,
    /// True on the last batch of the session.
    pub is_complete: bool,
}

/// Receives the growing record batch while a session runs.
///
/// Each batch extends the previous one by appending; records are never
/// removed or reordered.
pub trait BatchSink {
    fn on_batch(&mut self, batch: Batch<'_>);
}

impl<F> BatchSink for F
where
    F: FnMut(Batch<'_>),
{
    fn on_batch(&mut self, batch: Batch<'_>) {
        self(batch);
    }
}

/// Sink that ignores every batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardBatches;

impl BatchSink for DiscardBatches {
    fn on_batch(&mut self, _batch: Batch<'_>) {}
}
