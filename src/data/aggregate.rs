//! Summaries for the three charts: ranked category counts and the marks
//! histogram.

use std::collections::{HashMap, HashSet};

use super::model::Record;

/// Share of the marks range added to the last bin edge so the maximum
/// falls inside the last (right-open) bin.
const LAST_EDGE_PAD: f64 = 0.001;

/// Categorical field a ranking is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Organization,
    Course,
}

impl CategoryField {
    pub fn of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            CategoryField::Organization => &record.organization,
            CategoryField::Course => &record.course,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CategoryField::Organization => "Organization",
            CategoryField::Course => "Course",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub left: f64,
    /// Exclusive upper edge (the last bin also holds the maximum).
    pub right: f64,
    /// `"{left:.0}-{right:.0}"`.
    pub label: String,
    pub count: usize,
    /// Share of all binned records, rounded to one decimal.
    pub percentage: f64,
}

// ---------------------------------------------------------------------------
// Category ranking
// ---------------------------------------------------------------------------

/// Number of distinct values of `field`.
pub fn distinct_count<'a, I>(records: I, field: CategoryField) -> usize
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|r| field.of(r))
        .collect::<HashSet<_>>()
        .len()
}

/// The `n` most frequent values of `field`, most frequent first.
///
/// Ties keep first-seen order. `n` is clamped to the number of distinct
/// values.
pub fn top_categories<'a, I>(records: I, field: CategoryField, n: usize) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let label = field.of(record);
        match index.get(label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(CategoryCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

// ---------------------------------------------------------------------------
// Marks histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram of marks over the observed range.
///
/// Bins are left-inclusive and right-exclusive; the last edge is padded by
/// 0.1% of the range so the maximum lands in the last bin. All `bin_count`
/// bins are returned, empty ones included. When every mark is equal a
/// single bin holds all records. No records (or `bin_count == 0`) gives an
/// empty histogram.
pub fn marks_histogram<'a, I>(records: I, bin_count: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = &'a Record>,
{
    let marks: Vec<f64> = records.into_iter().map(|r| r.marks).collect();
    if marks.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = marks.iter().copied().fold(f64::INFINITY, f64::min);
    let max = marks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if span == 0.0 {
        return vec![make_bin(min, max, marks.len(), marks.len())];
    }

    let mut edges: Vec<f64> = (0..=bin_count)
        .map(|i| min + span * i as f64 / bin_count as f64)
        .collect();
    edges[bin_count] = max + span * LAST_EDGE_PAD;

    let mut counts = vec![0usize; bin_count];
    for &m in &marks {
        // Number of edges <= m, minus one, is the bin whose left edge is the
        // last one not above m.
        let i = edges.partition_point(|&e| e <= m).saturating_sub(1);
        counts[i.min(bin_count - 1)] += 1;
    }

    let total = marks.len();
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| make_bin(edges[i], edges[i + 1], count, total))
        .collect()
}

fn make_bin(left: f64, right: f64, count: usize, total: usize) -> HistogramBin {
    let percentage = if total == 0 {
        0.0
    } else {
        // Half-to-even at one decimal.
        (count as f64 / total as f64 * 100.0 * 10.0).round_ties_even() / 10.0
    };
    HistogramBin {
        left,
        right,
        label: format!("{left:.0}-{right:.0}"),
        count,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(org: &str, course: &str, marks: f64) -> Record {
        Record {
            reg_no: String::new(),
            student_name: String::new(),
            organization: org.to_string(),
            course: course.to_string(),
            marks,
            cohort: "Y21".to_string(),
        }
    }

    fn marks(values: &[f64]) -> Vec<Record> {
        values.iter().map(|&m| rec("A", "X", m)).collect()
    }

    fn summary(bins: &[HistogramBin]) -> Vec<(&str, usize)> {
        bins.iter().map(|b| (b.label.as_str(), b.count)).collect()
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let records = vec![rec("A", "X", 50.0), rec("B", "X", 70.0)];
        let top = top_categories(&records, CategoryField::Organization, 3);
        assert_eq!(
            top,
            vec![
                CategoryCount {
                    label: "A".into(),
                    count: 1
                },
                CategoryCount {
                    label: "B".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn ranks_by_count_and_truncates() {
        let records = vec![
            rec("C", "ML", 1.0),
            rec("A", "Web", 1.0),
            rec("B", "ML", 1.0),
            rec("A", "ML", 1.0),
            rec("B", "Web", 1.0),
            rec("A", "IoT", 1.0),
            rec("D", "IoT", 1.0),
        ];
        let orgs = top_categories(&records, CategoryField::Organization, 3);
        let labels: Vec<(&str, usize)> = orgs.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("A", 3), ("B", 2), ("C", 1)]);

        let courses = top_categories(&records, CategoryField::Course, 10);
        let labels: Vec<(&str, usize)> = courses.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("ML", 3), ("Web", 2), ("IoT", 2)]);

        assert_eq!(distinct_count(&records, CategoryField::Organization), 4);
        assert_eq!(distinct_count(&records, CategoryField::Course), 3);
    }

    #[test]
    fn ranking_is_non_increasing_and_bounded() {
        let records: Vec<Record> = (0..40)
            .map(|i| rec(&format!("org{}", i % 7 * (i % 3)), "X", 0.0))
            .collect();
        let distinct = distinct_count(&records, CategoryField::Organization);
        for n in 0..12 {
            let top = top_categories(&records, CategoryField::Organization, n);
            assert!(top.len() <= n && top.len() <= distinct);
            assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }

    #[test]
    fn two_bins_over_four_marks() {
        // edges: 10, 25, 40.03
        let bins = marks_histogram(&marks(&[10.0, 20.0, 30.0, 40.0]), 2);
        assert_eq!(summary(&bins), vec![("10-25", 2), ("25-40", 2)]);
        assert_eq!(bins[0].percentage, 50.0);
        assert_eq!(bins[1].percentage, 50.0);
        assert!((bins[1].right - 40.03).abs() < 1e-9);
    }

    #[test]
    fn value_on_an_edge_goes_right_and_max_stays_in_last_bin() {
        // edges: 0, 25, 50, 75, 100.1
        let bins = marks_histogram(&marks(&[0.0, 25.0, 49.9, 50.0, 99.0, 100.0]), 4);
        assert_eq!(
            summary(&bins),
            vec![("0-25", 1), ("25-50", 2), ("50-75", 1), ("75-100", 2)]
        );
        assert_eq!(bins[3].percentage, 33.3);
    }

    #[test]
    fn empty_bins_are_kept() {
        let bins = marks_histogram(&marks(&[0.0, 0.5, 100.0]), 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(
            bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![2, 0, 0, 0, 1]
        );
        assert_eq!(bins[1].percentage, 0.0);
    }

    #[test]
    fn bins_are_contiguous_and_counts_add_up() {
        let values: Vec<f64> = (0..97).map(|i| (i * 37 % 101) as f64 * 0.93 + 12.0).collect();
        let records = marks(&values);
        for k in [5, 7, 13, 50] {
            let bins = marks_histogram(&records, k);
            assert_eq!(bins.len(), k);
            assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
            assert!(bins.windows(2).all(|w| w[0].right == w[1].left && w[0].left < w[1].left));
            let pct: f64 = bins.iter().map(|b| b.percentage).sum();
            assert!((pct - 100.0).abs() <= 0.1 * k as f64, "k={k} pct={pct}");
        }
    }

    #[test]
    fn equal_marks_give_single_bin() {
        let bins = marks_histogram(&marks(&[72.0, 72.0, 72.0]), 7);
        assert_eq!(summary(&bins), vec![("72-72", 3)]);
        assert_eq!(bins[0].percentage, 100.0);
    }

    #[test]
    fn empty_input_gives_empty_summaries() {
        let none: Vec<Record> = Vec::new();
        assert!(marks_histogram(&none, 7).is_empty());
        assert!(top_categories(&none, CategoryField::Course, 5).is_empty());
        assert_eq!(distinct_count(&none, CategoryField::Course), 0);
    }

    #[test]
    fn labels_use_rounded_edges() {
        // edges: 40.6, 50.4, 60.2196
        let bins = marks_histogram(&marks(&[40.6, 45.0, 60.2]), 2);
        assert_eq!(bins[0].label, "41-50");
        assert_eq!(bins[1].label, "50-60");
        assert_eq!(bins[0].percentage, 66.7);
    }

    #[test]
    fn percentages_round_half_to_even() {
        let mut values = vec![0.0];
        values.extend(std::iter::repeat(100.0).take(15));
        let bins = marks_histogram(&marks(&values), 5);
        let pct: Vec<f64> = bins.iter().map(|b| b.percentage).collect();
        // 6.25 and 93.75 sit exactly on the half.
        assert_eq!(pct, vec![6.2, 0.0, 0.0, 0.0, 93.8]);
    }
}
