//! Progress checkpoints for bulk sweeps over corners and tiles.
//!
//! Sweeps are synchronous. A [`ProgressSink`] is called at fixed intervals so a
//! host can repaint or log between batches; the sink cannot cancel the sweep.

/// Default number of items processed between checkpoints.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

/// Which bulk pass is reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepStage {
    /// Checking every tile's stored edge count.
    TileShapes,
    /// Caching the three tiles around every corner.
    CornerTiles,
    /// Assigning every tile to a zone.
    ZoneAssignment,
}

/// A single checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepProgress {
    pub stage: SweepStage,
    pub processed: usize,
    pub total: usize,
}

impl SweepProgress {
    /// Completed fraction in `[0, 1]`. An empty sweep counts as complete.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f32 / self.total as f32
        }
    }
}

/// Receives sweep checkpoints.
pub trait ProgressSink {
    fn report(&mut self, progress: SweepProgress);
}

impl<F: FnMut(SweepProgress)> ProgressSink for F {
    fn report(&mut self, progress: SweepProgress) {
        self(progress)
    }
}

/// Sink that discards every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: SweepProgress) {}
}

/// Counts items and fires the sink every `interval` items and once at the end.
#[derive(Debug)]
pub struct ProgressTicker {
    stage: SweepStage,
    total: usize,
    interval: usize,
    processed: usize,
}

impl ProgressTicker {
    pub fn new(stage: SweepStage, total: usize, interval: usize) -> Self {
        Self {
            stage,
            total,
            interval: interval.max(1),
            processed: 0,
        }
    }

    /// Record one processed item.
    #[inline]
    pub fn tick(&mut self, sink: &mut dyn ProgressSink) {
        self.processed += 1;
        if self.processed % self.interval == 0 && self.processed != self.total {
            sink.report(self.snapshot());
        }
    }

    /// Report the final count.
    pub fn finish(self, sink: &mut dyn ProgressSink) {
        tracing::debug!(stage = ?self.stage, processed = self.processed, "sweep complete");
        sink.report(self.snapshot());
    }

    fn snapshot(&self) -> SweepProgress {
        SweepProgress {
            stage: self.stage,
            processed: self.processed,
            total: self.total,
        }
    }
}
