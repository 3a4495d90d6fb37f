use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell of a source sheet
// ---------------------------------------------------------------------------

/// A raw cell as read from a workbook sheet or CSV file, before any
/// schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Label text for a categorical column. `None` for empty cells.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(v) => Some(format_number(*v)),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    /// Numeric coercion of the marks column.
    pub fn coerce_marks(&self) -> MarksCell {
        match self {
            CellValue::Empty => MarksCell::Missing,
            CellValue::Number(v) if v.is_finite() => MarksCell::Valid(*v),
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => MarksCell::Valid(v),
                _ => MarksCell::Invalid,
            },
            CellValue::Number(_) | CellValue::Bool(_) => MarksCell::Invalid,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "<empty>"),
            other => write!(f, "{}", other.as_label().unwrap_or_default()),
        }
    }
}

/// Workbooks store registration numbers as floats; print `21.0` as `21`.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Outcome of coercing a marks cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarksCell {
    Valid(f64),
    Missing,
    Invalid,
}

// ---------------------------------------------------------------------------
// RawSource – one sheet (or CSV file) tagged with its cohort
// ---------------------------------------------------------------------------

/// All rows of one source, top to bottom, banner rows included.
#[derive(Debug, Clone)]
pub struct RawSource {
    /// Human readable origin, e.g. `marks.xlsx [Sheet1]`.
    pub name: String,
    /// Cohort tag attached to every record of this source.
    pub cohort: String,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// Record – one cleaned row
// ---------------------------------------------------------------------------

/// One student's internship entry after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Registration number; empty when the source cell was blank.
    pub reg_no: String,
    pub student_name: String,
    pub organization: String,
    pub course: String,
    pub marks: f64,
    /// Cohort tag of the source the row came from.
    pub cohort: String,
}

// ---------------------------------------------------------------------------
// Dropped rows
// ---------------------------------------------------------------------------

/// Why a source row was excluded from the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DropReason {
    NonNumericMarks,
    MissingMarks,
    MissingOrganization,
    MissingCourse,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::NonNumericMarks => "non-numeric marks",
            DropReason::MissingMarks => "missing marks",
            DropReason::MissingOrganization => "missing organization",
            DropReason::MissingCourse => "missing course",
        };
        f.write_str(text)
    }
}

/// Counts of rows excluded during cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropSummary {
    pub total: usize,
    pub by_reason: BTreeMap<DropReason, usize>,
}

impl DropSummary {
    pub fn record(&mut self, reason: DropReason) {
        self.total += 1;
        *self.by_reason.entry(reason).or_default() += 1;
    }

    #[cfg(test)]
    pub fn count(&self, reason: DropReason) -> usize {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }
}

impl fmt::Display for DropSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dropped", self.total)?;
        if !self.by_reason.is_empty() {
            let parts: Vec<String> = self
                .by_reason
                .iter()
                .map(|(reason, n)| format!("{n} {reason}"))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned collection
// ---------------------------------------------------------------------------

/// Cleaned records of all sources, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Cohort labels in source order.
    pub cohorts: Vec<String>,
    pub drops: DropSummary,
}

impl Dataset {
    /// Number of cleaned records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_coercion() {
        assert_eq!(CellValue::Number(70.0).coerce_marks(), MarksCell::Valid(70.0));
        assert_eq!(
            CellValue::Text(" 50 ".into()).coerce_marks(),
            MarksCell::Valid(50.0)
        );
        assert_eq!(CellValue::Text("abc".into()).coerce_marks(), MarksCell::Invalid);
        assert_eq!(CellValue::Text("NaN".into()).coerce_marks(), MarksCell::Invalid);
        assert_eq!(CellValue::Number(f64::NAN).coerce_marks(), MarksCell::Invalid);
        assert_eq!(CellValue::Bool(true).coerce_marks(), MarksCell::Invalid);
        assert_eq!(CellValue::Empty.coerce_marks(), MarksCell::Missing);
    }

    #[test]
    fn labels_from_numeric_cells() {
        assert_eq!(CellValue::Number(21.0).as_label().as_deref(), Some("21"));
        assert_eq!(CellValue::Number(2.5).as_label().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Empty.as_label(), None);
        assert_eq!(CellValue::Text(String::new()).as_label().as_deref(), Some(""));
    }

    #[test]
    fn drop_summary_counts_per_reason() {
        let mut drops = DropSummary::default();
        drops.record(DropReason::NonNumericMarks);
        drops.record(DropReason::MissingCourse);
        drops.record(DropReason::NonNumericMarks);
        assert_eq!(drops.total, 3);
        assert_eq!(drops.count(DropReason::NonNumericMarks), 2);
        assert_eq!(drops.count(DropReason::MissingMarks), 0);
        assert_eq!(
            drops.to_string(),
            "3 dropped (2 non-numeric marks, 1 missing course)"
        );
    }
}
