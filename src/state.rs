use std::path::PathBuf;
use std::time::SystemTime;

use eframe::egui::Color32;

use crate::color::parse_hex_color;
use crate::config::DashboardConfig;
use crate::data::filter::{BatchFilter, FilterState};
use crate::data::loader::SourceSpec;
use crate::data::model::Dataset;
use crate::data::pipeline;
use crate::data::view::{DashboardView, build_view};

// ---------------------------------------------------------------------------
// Source stamp: cache key for the cleaned dataset
// ---------------------------------------------------------------------------

/// Identity of the files a dataset was built from. Two equal stamps mean
/// the sources have not changed on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStamp {
    files: Vec<(PathBuf, Option<SystemTime>, u64)>,
}

impl SourceStamp {
    pub fn of(spec: &SourceSpec) -> Self {
        let files = spec
            .paths()
            .iter()
            .map(|p| {
                let meta = std::fs::metadata(p).ok();
                let modified = meta.as_ref().and_then(|m| m.modified().ok());
                let len = meta.map(|m| m.len()).unwrap_or(0);
                (p.clone(), modified, len)
            })
            .collect();
        SourceStamp { files }
    }
}

// ---------------------------------------------------------------------------
// Tabs of the central panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Organizations,
    Histogram,
    Courses,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Sources currently shown (None until the user picks some).
    pub source: Option<SourceSpec>,

    /// Stamp of `source` when `dataset` was built.
    stamp: Option<SourceStamp>,

    /// Cleaned dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Current control values.
    pub filter: FilterState,

    /// Histogram fill. Presentation only.
    pub bin_color: Color32,

    /// Summaries for `filter`, with the filter they were built for.
    view: Option<(FilterState, DashboardView)>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let filter = FilterState::from_controls(&config.controls);
        let bin_color = parse_hex_color(&config.controls.bin_color).unwrap_or(Color32::LIGHT_BLUE);
        Self {
            config,
            source: None,
            stamp: None,
            dataset: None,
            filter,
            bin_color,
            view: None,
            tab: Tab::default(),
            status_message: None,
        }
    }

    /// Load `spec`, replacing the current dataset on success. On failure the
    /// previous dataset stays and the error is shown.
    pub fn open(&mut self, spec: SourceSpec) {
        let stamp = SourceStamp::of(&spec);
        match pipeline::load(&spec, &self.config) {
            Ok(dataset) => {
                self.set_dataset(spec, stamp, dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", spec.describe());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Reload the current sources if they changed on disk since the last
    /// successful load.
    pub fn reload(&mut self) {
        let Some(spec) = self.source.clone() else {
            return;
        };
        if self.stamp.as_ref() == Some(&SourceStamp::of(&spec)) {
            log::debug!("{} unchanged, keeping cached dataset", spec.describe());
            self.status_message = Some("Sources unchanged".to_string());
            return;
        }
        self.open(spec);
    }

    /// Ingest a newly loaded dataset and keep the control values valid for it.
    fn set_dataset(&mut self, spec: SourceSpec, stamp: SourceStamp, dataset: Dataset) {
        if let BatchFilter::Cohort(label) = &self.filter.batch {
            if !dataset.cohorts.contains(label) {
                self.filter.batch = BatchFilter::All;
            }
        }
        self.dataset = Some(dataset);
        self.source = Some(spec);
        self.stamp = Some(stamp);
        self.view = None;
        self.status_message = None;
    }

    /// Summaries for the current controls, rebuilt only when they changed.
    pub fn view(&mut self) -> Option<&DashboardView> {
        let dataset = self.dataset.as_ref()?;
        let stale = !matches!(&self.view, Some((f, _)) if *f == self.filter);
        if stale {
            log::debug!("Rebuilding view for {:?}", self.filter);
            self.view = Some((self.filter.clone(), build_view(dataset, &self.filter)));
        }
        self.view.as_ref().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: &str = "Internship marks\nDept\nAY\nReg,Name,Org,Course,Guide,Marks\n";

    fn write_pair(dir: &std::path::Path, y22_rows: &str) -> SourceSpec {
        let y21 = dir.join("y21.csv");
        let y22 = dir.join("y22.csv");
        std::fs::write(&y21, format!("{BANNER}1,Ann,A,X,g,50\n2,Bo,B,X,g,60\n")).unwrap();
        std::fs::write(&y22, format!("{BANNER}{y22_rows}")).unwrap();
        SourceSpec::Csv(vec![y21, y22])
    }

    #[test]
    fn open_builds_view_and_caches_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.open(write_pair(dir.path(), "3,Cy,A,Y,g,70\n"));
        assert!(state.status_message.is_none());

        let view = state.view().cloned().unwrap();
        assert_eq!(view.visible, 3);
        assert_eq!(view.organizations[0].label, "A");
        assert_eq!(view.histogram.len(), 7);

        state.filter.batch = BatchFilter::Cohort("Y22".into());
        assert_eq!(state.view().unwrap().visible, 1);
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.open(write_pair(dir.path(), "3,Cy,A,Y,g,70\n"));

        let missing = SourceSpec::Csv(vec![dir.path().join("nope.csv")]);
        state.open(missing);
        assert!(state.status_message.as_deref().unwrap().contains("nope.csv"));
        assert_eq!(state.dataset.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn reload_only_when_sources_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        let spec = write_pair(dir.path(), "3,Cy,A,Y,g,70\n");
        state.open(spec);

        state.reload();
        assert_eq!(state.status_message.as_deref(), Some("Sources unchanged"));

        // Different size is enough to change the stamp.
        write_pair(dir.path(), "3,Cy,A,Y,g,70\n4,Di,C,Z,g,80\n");
        state.reload();
        assert!(state.status_message.is_none());
        assert_eq!(state.dataset.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn unknown_batch_resets_on_new_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.filter.batch = BatchFilter::Cohort("Y30".into());
        state.open(write_pair(dir.path(), "3,Cy,A,Y,g,70\n"));
        assert_eq!(state.filter.batch, BatchFilter::All);
    }
}
