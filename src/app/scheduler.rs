//! Background fetches keyed by per-panel request tokens.
//!
//! Every request for a panel gets a token one higher than the last. Workers
//! check the panel's latest token before fetching and again before
//! reporting, so superseded work is dropped instead of overwriting newer
//! state. Results are delivered over an mpsc channel and drained by the UI
//! loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use tracing::{debug, warn};

use crate::app::pipeline::{PanelData, load_panel};
use crate::data::DataSource;
use crate::domain::{PanelKind, YearSelection};
use crate::error::AppError;

/// Monotonically increasing id of a panel request (0 = never requested).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A worker's result for one request.
#[derive(Debug)]
pub struct PanelUpdate {
    pub kind: PanelKind,
    pub token: RequestToken,
    pub outcome: Result<Option<PanelData>, AppError>,
}

pub struct Scheduler {
    source: Arc<dyn DataSource>,
    latest: [Arc<AtomicU64>; PanelKind::ALL.len()],
    tx: Sender<PanelUpdate>,
    rx: Receiver<PanelUpdate>,
}

impl Scheduler {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            latest: std::array::from_fn(|_| Arc::new(AtomicU64::new(0))),
            tx,
            rx,
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn latest(&self, kind: PanelKind) -> RequestToken {
        RequestToken(self.latest[kind.index()].load(Ordering::SeqCst))
    }

    /// Invalidate whatever is in flight for `kind` without starting new work.
    pub fn cancel(&self, kind: PanelKind) -> RequestToken {
        RequestToken(self.latest[kind.index()].fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Start a fetch for `kind` on a worker thread; returns its token.
    pub fn request(&self, kind: PanelKind, years: &YearSelection) -> RequestToken {
        let token = self.cancel(kind);
        let latest = Arc::clone(&self.latest[kind.index()]);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let years = years.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("fetch-{kind:?}").to_lowercase())
            .spawn(move || {
                let is_current = || latest.load(Ordering::SeqCst) == token.0;
                if !is_current() {
                    debug!(panel = ?kind, token = token.0, "request superseded before start");
                    return;
                }

                let outcome = load_panel(source.as_ref(), kind, &years);

                if !is_current() {
                    debug!(panel = ?kind, token = token.0, "dropping superseded response");
                    return;
                }
                // The receiver only goes away when the dashboard shuts down.
                let _ = tx.send(PanelUpdate { kind, token, outcome });
            });

        if let Err(e) = spawned {
            warn!(panel = ?kind, error = %e, "failed to spawn fetch worker");
            let _ = self.tx.send(PanelUpdate {
                kind,
                token,
                outcome: Err(AppError::new(4, format!("Failed to start fetch: {e}"))),
            });
        }

        token
    }

    /// Drain every update that has arrived so far.
    pub fn drain(&self) -> Vec<PanelUpdate> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next update.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PanelUpdate> {
        match self.rx.recv_timeout(timeout) {
            Ok(update) => Some(update),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
