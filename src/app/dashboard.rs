//! Dashboard controller: year selection, panel states, and request dispatch.
//!
//! The TUI drives this; it never talks to a [`DataSource`] directly.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::panel::Panel;
use crate::app::scheduler::{PanelUpdate, Scheduler};
use crate::data::DataSource;
use crate::domain::{PanelKind, YearSelection};
use crate::error::AppError;

pub struct Dashboard {
    scheduler: Scheduler,
    panels: [Panel; PanelKind::ALL.len()],
    available: Vec<i32>,
    selection: YearSelection,
}

impl Dashboard {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            scheduler: Scheduler::new(source),
            panels: PanelKind::ALL.map(Panel::new),
            available: Vec::new(),
            selection: YearSelection::default(),
        }
    }

    /// Load the list of years and select them (or `preferred ∩ available`
    /// when a preference was given), then request every panel.
    pub fn bootstrap(&mut self, preferred: &[i32]) -> Result<(), AppError> {
        let mut available = self.scheduler.source().available_years()?;
        available.sort_unstable();
        available.dedup();

        self.selection = if preferred.is_empty() {
            YearSelection::new(available.iter().copied())
        } else {
            let picked = YearSelection::new(preferred.iter().copied().filter(|y| available.contains(y)));
            if picked.len() < preferred.len() {
                warn!(?preferred, ?available, "some requested years are not available");
            }
            picked
        };
        self.available = available;

        info!(available = ?self.available, selected = %self.selection, "dashboard bootstrapped");
        self.refresh_all();
        Ok(())
    }

    pub fn available_years(&self) -> &[i32] {
        &self.available
    }

    pub fn selection(&self) -> &YearSelection {
        &self.selection
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, kind: PanelKind) -> &Panel {
        &self.panels[kind.index()]
    }

    pub fn refresh_all(&mut self) {
        for kind in PanelKind::ALL {
            self.refresh(kind);
        }
    }

    /// Re-request only the panels that depend on the year selection.
    pub fn refresh_year_panels(&mut self) {
        for kind in PanelKind::ALL.into_iter().filter(|k| k.depends_on_years()) {
            self.refresh(kind);
        }
    }

    fn refresh(&mut self, kind: PanelKind) {
        let panel = &mut self.panels[kind.index()];
        if kind.depends_on_years() && self.selection.is_empty() {
            panel.set_no_data(self.scheduler.cancel(kind));
        } else {
            panel.begin(self.scheduler.request(kind, &self.selection));
        }
    }

    /// Flip one year in or out of the selection; returns whether it changed.
    pub fn toggle_year(&mut self, year: i32) -> bool {
        if !self.available.contains(&year) {
            return false;
        }
        self.selection.toggle(year);
        info!(selected = %self.selection, "year selection changed");
        self.refresh_year_panels();
        true
    }

    pub fn select_all(&mut self) {
        let all = YearSelection::new(self.available.iter().copied());
        if all == self.selection {
            return;
        }
        self.selection = all;
        self.refresh_year_panels();
    }

    /// Apply every update that has arrived; returns how many were accepted.
    pub fn poll(&mut self) -> usize {
        let updates = self.scheduler.drain();
        updates.into_iter().map(|u| self.apply(u)).filter(|&ok| ok).count()
    }

    /// Block up to `timeout` for one update.
    #[cfg(test)]
    fn wait(&mut self, timeout: std::time::Duration) -> bool {
        match self.scheduler.recv_timeout(timeout) {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    fn apply(&mut self, update: PanelUpdate) -> bool {
        let index = update.kind.index();
        self.panels[index].apply(update)
    }

    pub fn is_loading(&self) -> bool {
        self.panels.iter().any(Panel::is_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::app::panel::PanelContent;
    use crate::app::pipeline::PanelData;
    use crate::app::pipeline::testing::RecordingSource;

    fn settle(dashboard: &mut Dashboard) {
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while dashboard.is_loading() && std::time::Instant::now() < deadline {
            dashboard.wait(Duration::from_millis(200));
        }
        assert!(!dashboard.is_loading(), "panels still loading");
    }

    #[test]
    fn bootstrap_selects_all_available_years() {
        let mut dashboard = Dashboard::new(Arc::new(RecordingSource::default()));
        dashboard.bootstrap(&[]).unwrap();
        assert_eq!(dashboard.selection().to_vec(), vec![2021, 2022, 2023]);
        settle(&mut dashboard);
        for panel in dashboard.panels() {
            assert!(matches!(panel.content(), PanelContent::Ready(_)), "{:?}", panel.kind());
        }
    }

    #[test]
    fn preferred_years_are_intersected_with_available() {
        let mut dashboard = Dashboard::new(Arc::new(RecordingSource::default()));
        dashboard.bootstrap(&[2022, 1999]).unwrap();
        assert_eq!(dashboard.selection().to_vec(), vec![2022]);
    }

    #[test]
    fn empty_selection_shows_no_data_without_requests() {
        let source = Arc::new(RecordingSource::default());
        let mut dashboard = Dashboard::new(source.clone());
        dashboard.bootstrap(&[2021]).unwrap();
        settle(&mut dashboard);
        let before = source.calls();

        assert!(dashboard.toggle_year(2021));
        assert!(dashboard.selection().is_empty());
        for kind in PanelKind::ALL.into_iter().filter(|k| k.depends_on_years()) {
            assert_eq!(dashboard.panel(kind).content(), &PanelContent::NoData);
        }
        assert_eq!(source.calls(), before);
        // Forecast keeps its data.
        assert!(matches!(
            dashboard.panel(PanelKind::Forecast).data(),
            Some(PanelData::Chart(_))
        ));
    }

    #[test]
    fn unavailable_years_cannot_be_toggled() {
        let mut dashboard = Dashboard::new(Arc::new(RecordingSource::default()));
        dashboard.bootstrap(&[]).unwrap();
        assert!(!dashboard.toggle_year(1990));
    }

    #[test]
    fn failures_surface_on_the_panel() {
        let mut dashboard = Dashboard::new(Arc::new(RecordingSource::default()));
        // A failing source cannot bootstrap, so seed the selection directly.
        dashboard.available = vec![2022];
        dashboard.selection = YearSelection::new([2022]);
        dashboard.scheduler = Scheduler::new(Arc::new(RecordingSource {
            fail: true,
            ..Default::default()
        }));
        dashboard.refresh_all();
        settle(&mut dashboard);
        for panel in dashboard.panels() {
            assert!(panel.error().is_some());
        }
    }
}
