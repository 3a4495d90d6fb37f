//! Raw sources → cleaned [`Dataset`].
//!
//! Positional schema, cohort tag, concatenation in source order, marks
//! coercion and the null filter. Schema violations are fatal; bad rows are
//! only counted.

use super::error::LoadError;
use super::loader::{SourceSpec, load_sources};
use super::model::{CellValue, Dataset, DropReason, DropSummary, MarksCell, RawSource, Record};
use crate::config::{ColumnRole, DashboardConfig, SchemaConfig};

/// Read every cohort's source and clean the result into one dataset.
pub fn load(spec: &SourceSpec, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    let sources = load_sources(spec, &config.cohorts)?;
    let dataset = clean(sources, &config.schema)?;
    if dataset.drops.total > 0 {
        log::info!("{}: {} records, {}", spec.describe(), dataset.len(), dataset.drops);
    } else {
        log::info!("{}: {} records", spec.describe(), dataset.len());
    }
    Ok(dataset)
}

/// Positions of the roles a record is built from.
struct Layout {
    reg_no: usize,
    student_name: usize,
    organization: usize,
    course: usize,
    marks: usize,
}

impl Layout {
    fn from_schema(schema: &SchemaConfig) -> Layout {
        // Schemas are validated at config load; a missing role falls back to
        // an out-of-range index, which reads as an empty cell.
        let at = |role| schema.position(role).unwrap_or(usize::MAX);
        Layout {
            reg_no: at(ColumnRole::RegNo),
            student_name: at(ColumnRole::StudentName),
            organization: at(ColumnRole::Organization),
            course: at(ColumnRole::Course),
            marks: at(ColumnRole::Marks),
        }
    }
}

/// Clean and concatenate `sources` in the order given.
///
/// Every data row must have exactly `schema.column_count()` cells; the first
/// row that does not aborts the load. Fully blank rows are skipped without
/// being counted as drops.
pub fn clean(sources: Vec<RawSource>, schema: &SchemaConfig) -> Result<Dataset, LoadError> {
    let layout = Layout::from_schema(schema);
    let expected = schema.column_count();
    let skip = schema.leading_rows();

    let mut records = Vec::new();
    let mut drops = DropSummary::default();
    let mut cohorts = Vec::with_capacity(sources.len());

    for source in sources {
        let before = records.len();
        let dropped_before = drops.total;

        for (idx, row) in source.rows.iter().enumerate().skip(skip) {
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            if row.len() != expected {
                return Err(LoadError::SchemaMismatch {
                    name: source.name.clone(),
                    row: idx + 1,
                    expected,
                    found: row.len(),
                });
            }

            match build_record(row, &layout, &source.cohort) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    log::debug!("{} row {}: dropped ({reason})", source.name, idx + 1);
                    drops.record(reason);
                }
            }
        }

        log::info!(
            "{} [{}]: {} records kept, {} dropped",
            source.name,
            source.cohort,
            records.len() - before,
            drops.total - dropped_before
        );
        if !cohorts.contains(&source.cohort) {
            cohorts.push(source.cohort);
        }
    }

    Ok(Dataset {
        records,
        cohorts,
        drops,
    })
}

static EMPTY: CellValue = CellValue::Empty;

fn build_record(row: &[CellValue], layout: &Layout, cohort: &str) -> Result<Record, DropReason> {
    let cell = |i: usize| row.get(i).unwrap_or(&EMPTY);

    let marks = match cell(layout.marks).coerce_marks() {
        MarksCell::Valid(v) => v,
        MarksCell::Invalid => return Err(DropReason::NonNumericMarks),
        MarksCell::Missing => return Err(DropReason::MissingMarks),
    };
    let organization = cell(layout.organization)
        .as_label()
        .ok_or(DropReason::MissingOrganization)?;
    let course = cell(layout.course)
        .as_label()
        .ok_or(DropReason::MissingCourse)?;

    Ok(Record {
        reg_no: cell(layout.reg_no).as_label().unwrap_or_default(),
        student_name: cell(layout.student_name).as_label().unwrap_or_default(),
        organization,
        course,
        marks,
        cohort: cohort.to_string(),
    })
}
