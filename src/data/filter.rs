use std::fmt;

use super::model::{Dataset, Record};
use crate::config::ControlsConfig;

// ---------------------------------------------------------------------------
// Batch selector
// ---------------------------------------------------------------------------

/// Which cohort the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BatchFilter {
    #[default]
    All,
    Cohort(String),
}

impl BatchFilter {
    /// Parse a selector value: `All` (any case) or a cohort label.
    pub fn parse(s: &str) -> BatchFilter {
        if s.eq_ignore_ascii_case("all") {
            BatchFilter::All
        } else {
            BatchFilter::Cohort(s.to_string())
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            BatchFilter::All => true,
            BatchFilter::Cohort(label) => record.cohort == *label,
        }
    }
}

impl fmt::Display for BatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchFilter::All => f.write_str("All"),
            BatchFilter::Cohort(label) => f.write_str(label),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state: everything the sidebar controls feed into the summaries
// ---------------------------------------------------------------------------

/// Current control values. Rebuilt from the widgets, never stored with the
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub batch: BatchFilter,
    pub top_organizations: usize,
    pub top_courses: usize,
    pub bins: usize,
}

impl FilterState {
    /// Initial control values from configuration.
    pub fn from_controls(controls: &ControlsConfig) -> Self {
        Self {
            batch: BatchFilter::All,
            top_organizations: controls.default_top_n,
            top_courses: controls.default_top_n,
            bins: controls.default_bins,
        }
    }
}

/// The subsequence of records whose cohort passes `batch`.
pub fn filter_records<'a>(dataset: &'a Dataset, batch: &BatchFilter) -> Vec<&'a Record> {
    dataset.records.iter().filter(|r| batch.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DropSummary;

    fn record(id: &str, cohort: &str) -> Record {
        Record {
            reg_no: id.to_string(),
            student_name: String::new(),
            organization: "Org".to_string(),
            course: "Course".to_string(),
            marks: 50.0,
            cohort: cohort.to_string(),
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            records: vec![
                record("1", "Y21"),
                record("2", "Y22"),
                record("3", "Y21"),
                record("4", "Y22"),
            ],
            cohorts: vec!["Y21".into(), "Y22".into()],
            drops: DropSummary::default(),
        }
    }

    #[test]
    fn cohort_filter_keeps_only_that_cohort() {
        let ds = dataset();
        let y22 = filter_records(&ds, &BatchFilter::Cohort("Y22".into()));
        let ids: Vec<&str> = y22.iter().map(|r| r.reg_no.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
        assert!(y22.iter().all(|r| r.cohort == "Y22"));
    }

    #[test]
    fn all_returns_everything_in_order() {
        let ds = dataset();
        let all = filter_records(&ds, &BatchFilter::All);
        assert_eq!(all.len(), 4);
        assert!(all.iter().zip(&ds.records).all(|(a, b)| *a == b));
        // The source collection is untouched.
        assert_eq!(ds, dataset());
    }

    #[test]
    fn unknown_cohort_yields_nothing() {
        let ds = dataset();
        assert!(filter_records(&ds, &BatchFilter::Cohort("Y30".into())).is_empty());
    }

    #[test]
    fn parse_selector_values() {
        assert_eq!(BatchFilter::parse("All"), BatchFilter::All);
        assert_eq!(BatchFilter::parse("all"), BatchFilter::All);
        assert_eq!(BatchFilter::parse("Y21"), BatchFilter::Cohort("Y21".into()));
        assert_eq!(BatchFilter::Cohort("Y22".into()).to_string(), "Y22");
    }

    #[test]
    fn initial_state_from_controls() {
        let state = FilterState::from_controls(&ControlsConfig::default());
        assert_eq!(state.batch, BatchFilter::All);
        assert_eq!(state.top_organizations, 5);
        assert_eq!(state.top_courses, 5);
        assert_eq!(state.bins, 7);
    }
}
