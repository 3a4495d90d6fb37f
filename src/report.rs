//! Plain-text rendering of a [`DashboardView`] for `--print`.

use std::fmt::Write;

use crate::data::aggregate::{CategoryCount, HistogramBin};
use crate::data::filter::FilterState;
use crate::data::model::Dataset;
use crate::data::view::DashboardView;

/// Render the three summaries as aligned text tables.
pub fn render(dataset: &Dataset, filter: &FilterState, view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Batch: {}  ({} of {} records, {})",
        filter.batch,
        view.visible,
        dataset.len(),
        dataset.drops
    );

    if view.is_empty() {
        out.push_str("\nNo records match the current filters.\n");
        return out;
    }

    write_categories(&mut out, "Top Organizations by Count", "Organization", &view.organizations);
    write_histogram(&mut out, &view.histogram);
    write_categories(&mut out, "Top Courses by Count", "Course", &view.courses);
    out
}

fn write_categories(out: &mut String, title: &str, column: &str, counts: &[CategoryCount]) {
    let total: usize = counts.iter().map(|c| c.count).sum();
    let width = counts
        .iter()
        .map(|c| c.label.chars().count())
        .chain(std::iter::once(column.len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{column:<width$}  {:>5}  {:>6}", "Count", "Share");
    for c in counts {
        let share = if total == 0 {
            0.0
        } else {
            c.count as f64 / total as f64 * 100.0
        };
        let _ = writeln!(out, "{:<width$}  {:>5}  {:>5.1}%", c.label, c.count, share);
    }
}

fn write_histogram(out: &mut String, bins: &[HistogramBin]) {
    let width = bins
        .iter()
        .map(|b| b.label.len())
        .chain(std::iter::once("Marks Range".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "\nMarks Distribution Histogram");
    let _ = writeln!(out, "{:<width$}  {:>8}  {:>10}", "Marks Range", "Students", "Percentage");
    for b in bins {
        let _ = writeln!(out, "{:<width$}  {:>8}  {:>9.1}%", b.label, b.count, b.percentage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::BatchFilter;
    use crate::data::model::{DropReason, DropSummary, Record};
    use crate::data::view::build_view;

    fn dataset() -> Dataset {
        let rec = |org: &str, course: &str, marks: f64| Record {
            reg_no: String::new(),
            student_name: String::new(),
            organization: org.into(),
            course: course.into(),
            marks,
            cohort: "Y21".into(),
        };
        let mut drops = DropSummary::default();
        drops.record(DropReason::NonNumericMarks);
        Dataset {
            records: vec![rec("Acme", "ML", 10.0), rec("Beta", "ML", 40.0)],
            cohorts: vec!["Y21".into()],
            drops,
        }
    }

    fn filter(batch: BatchFilter) -> FilterState {
        FilterState {
            batch,
            top_organizations: 3,
            top_courses: 3,
            bins: 5,
        }
    }

    #[test]
    fn renders_all_three_sections() {
        let ds = dataset();
        let f = filter(BatchFilter::All);
        let text = render(&ds, &f, &build_view(&ds, &f));

        assert!(text.starts_with("Batch: All  (2 of 2 records, 1 dropped (1 non-numeric marks))"));
        assert!(text.contains("Top Organizations by Count"));
        assert!(text.contains("Acme              1   50.0%"));
        assert!(text.contains("Marks Distribution Histogram"));
        assert!(text.contains("10-16"));
        assert!(text.contains("Top Courses by Count"));
        assert!(text.contains("ML          2  100.0%"));
    }

    #[test]
    fn empty_selection_says_so() {
        let ds = dataset();
        let f = filter(BatchFilter::Cohort("Y22".into()));
        let text = render(&ds, &f, &build_view(&ds, &f));
        assert!(text.contains("No records match the current filters."));
        assert!(!text.contains("Histogram"));
    }
}
