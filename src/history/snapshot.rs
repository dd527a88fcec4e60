use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};

use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::history::ring::EntryId;
use crate::render::frame::FrameRGBA;

/// Downscale factor applied to history thumbnails.
pub const SNAPSHOT_SCALE: f64 = 0.2;

/// Reduced-resolution raster of a rendered scene.
pub type Snapshot = FrameRGBA;

/// A finished capture, tagged with the history entry it was taken for.
pub type SnapshotResult = (EntryId, AbstraktResult<Snapshot>);

/// Background thumbnail capture.
///
/// Captures run on a dedicated rayon pool and report back over a channel, so the caller never
/// blocks on the downscale. Results arrive in completion order, not submission order.
pub struct SnapshotWorker {
    pool: rayon::ThreadPool,
    scale: f64,
    tx: Sender<SnapshotResult>,
    rx: Receiver<SnapshotResult>,
    pending: usize,
}

impl std::fmt::Debug for SnapshotWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotWorker")
            .field("scale", &self.scale)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl SnapshotWorker {
    pub fn new(scale: f64) -> AbstraktResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(AbstraktError::snapshot(format!(
                "snapshot scale must be finite and > 0, got {scale}"
            )));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .thread_name(|i| format!("abstrakt-snapshot-{i}"))
            .build()
            .map_err(|e| AbstraktError::snapshot(format!("failed to build snapshot pool: {e}")))?;
        let (tx, rx) = channel();
        Ok(Self {
            pool,
            scale,
            tx,
            rx,
            pending: 0,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Captures submitted but not yet collected.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Queue a downscale of `frame` for entry `id` and return immediately.
    #[tracing::instrument(level = "debug", skip_all, fields(id = %id, w = frame.width, h = frame.height))]
    pub fn capture(&mut self, id: EntryId, frame: FrameRGBA) {
        let tx = self.tx.clone();
        let scale = self.scale;
        self.pending += 1;
        self.pool.spawn(move || {
            let result = frame.downscale(scale);
            // The receiver lives as long as the worker; a failed send means it was dropped.
            let _ = tx.send((id, result));
        });
    }

    /// Collect every finished capture without blocking.
    pub fn drain(&mut self) -> Vec<SnapshotResult> {
        let mut out = Vec::new();
        while let Ok(done) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            out.push(done);
        }
        out
    }

    /// Block until every pending capture has finished or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<SnapshotResult> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::new();
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    self.pending -= 1;
                    out.push(done);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!(pending = self.pending, "snapshot wait timed out");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/snapshot.rs"]
mod tests;
