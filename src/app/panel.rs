//! Per-panel display state.
//!
//! A panel only accepts the result of its most recent request. Failures are
//! soft: the previous content stays on screen and the error is shown on the
//! panel itself.

use chrono::{DateTime, Local};
use tracing::{debug, error};

use crate::app::pipeline::PanelData;
use crate::app::scheduler::{PanelUpdate, RequestToken};
use crate::domain::PanelKind;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    NoData,
    Ready(PanelData),
}

#[derive(Debug, Clone)]
pub struct Panel {
    kind: PanelKind,
    content: PanelContent,
    error: Option<String>,
    pending: bool,
    latest: RequestToken,
    updated_at: Option<DateTime<Local>>,
}

impl Panel {
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            content: PanelContent::Loading,
            error: None,
            pending: false,
            latest: RequestToken::default(),
            updated_at: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn data(&self) -> Option<&PanelData> {
        match &self.content {
            PanelContent::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest(&self) -> RequestToken {
        self.latest
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    /// A request with `token` is now in flight; anything older is stale.
    pub fn begin(&mut self, token: RequestToken) {
        self.latest = token;
        self.pending = true;
    }

    /// Nothing to fetch (e.g. empty year selection). Supersedes in-flight work.
    pub fn set_no_data(&mut self, token: RequestToken) {
        self.latest = token;
        self.pending = false;
        self.error = None;
        self.content = PanelContent::NoData;
        self.updated_at = Some(Local::now());
    }

    /// Apply a worker result; returns `false` when it was stale and dropped.
    pub fn apply(&mut self, update: PanelUpdate) -> bool {
        if update.kind != self.kind || update.token != self.latest {
            debug!(
                panel = ?self.kind,
                token = update.token.get(),
                latest = self.latest.get(),
                "discarding stale panel update"
            );
            return false;
        }

        self.pending = false;
        match update.outcome {
            Ok(Some(data)) => {
                self.content = PanelContent::Ready(data);
                self.error = None;
                self.updated_at = Some(Local::now());
            }
            Ok(None) => {
                self.content = PanelContent::NoData;
                self.error = None;
                self.updated_at = Some(Local::now());
            }
            Err(err) => {
                error!(panel = ?self.kind, error = %err, "panel fetch failed");
                if self.content == PanelContent::Loading {
                    self.content = PanelContent::NoData;
                }
                self.error = Some(err.message().to_string());
            }
        }
        true
    }
}
