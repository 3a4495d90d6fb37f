use super::aggregate::{
    CategoryCount, CategoryField, HistogramBin, distinct_count, marks_histogram, top_categories,
};
use super::filter::{FilterState, filter_records};
use super::model::Dataset;

/// Everything the charts need for one set of control values.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Records passing the batch filter.
    pub visible: usize,
    pub organizations: Vec<CategoryCount>,
    pub histogram: Vec<HistogramBin>,
    pub courses: Vec<CategoryCount>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }
}

/// Compute all three summaries. Pure: same inputs, same view.
pub fn build_view(dataset: &Dataset, filter: &FilterState) -> DashboardView {
    let records = filter_records(dataset, &filter.batch);
    let rows = || records.iter().copied();

    DashboardView {
        visible: records.len(),
        organizations: top_categories(rows(), CategoryField::Organization, filter.top_organizations),
        histogram: marks_histogram(rows(), filter.bins),
        courses: top_categories(rows(), CategoryField::Course, filter.top_courses),
    }
}

/// Slider range for a top-N control: `[min, max(min, distinct)]`.
///
/// Distinct values are counted over the whole dataset, not the current
/// batch, so switching batches never moves the slider bounds.
pub fn top_n_bounds(dataset: &Dataset, field: CategoryField, min: usize) -> (usize, usize) {
    let distinct = distinct_count(&dataset.records, field);
    (min, distinct.max(min))
}
