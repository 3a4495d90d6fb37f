use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};

use super::error::LoadError;
use super::model::{CellValue, RawSource};
use crate::config::CohortConfig;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

// ---------------------------------------------------------------------------
// Source selection
// ---------------------------------------------------------------------------

/// Where the raw sources come from.
///
/// * `Workbook` – one spreadsheet, each cohort reads the sheet at its index
/// * `Csv`      – one CSV file per source, each cohort reads the file at its index
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    Workbook(PathBuf),
    Csv(Vec<PathBuf>),
}

impl SourceSpec {
    /// Classify user-picked files by extension: a single workbook, or a list
    /// of CSV files.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self, LoadError> {
        if let [single] = paths.as_slice() {
            if is_workbook(single) {
                return Ok(SourceSpec::Workbook(single.clone()));
            }
        }
        if let Some(bad) = paths.iter().find(|p| extension(p) != "csv") {
            return Err(LoadError::Unsupported { path: bad.clone() });
        }
        Ok(SourceSpec::Csv(paths))
    }

    /// Files backing this spec.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            SourceSpec::Workbook(p) => std::slice::from_ref(p),
            SourceSpec::Csv(ps) => ps,
        }
    }

    /// Short description for status messages.
    pub fn describe(&self) -> String {
        let names: Vec<String> = self
            .paths()
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect();
        names.join(", ")
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn is_workbook(path: &Path) -> bool {
    WORKBOOK_EXTENSIONS.contains(&extension(path).as_str())
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the source of every configured cohort, tagged with its label, in
/// cohort order. Rows are returned raw: banner and header rows included.
pub fn load_sources(spec: &SourceSpec, cohorts: &[CohortConfig]) -> Result<Vec<RawSource>, LoadError> {
    match spec {
        SourceSpec::Workbook(path) => load_workbook(path, cohorts),
        SourceSpec::Csv(paths) => load_csv_files(paths, cohorts),
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path, cohorts: &[CohortConfig]) -> Result<Vec<RawSource>, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|err| LoadError::Workbook {
        path: path.to_path_buf(),
        err,
    })?;
    let sheet_names = workbook.sheet_names();
    log::debug!("{} has sheets {:?}", path.display(), sheet_names);

    let mut sources = Vec::with_capacity(cohorts.len());
    for cohort in cohorts {
        let sheet = sheet_names
            .get(cohort.source)
            .ok_or_else(|| LoadError::MissingSource {
                cohort: cohort.label.clone(),
                index: cohort.source,
                available: sheet_names.len(),
                origin: path.display().to_string(),
            })?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|err| LoadError::Sheet {
                path: path.to_path_buf(),
                sheet: sheet.clone(),
                err,
            })?;

        sources.push(RawSource {
            name: format!("{} [{sheet}]", path.display()),
            cohort: cohort.label.clone(),
            rows: range_rows(&range),
        });
    }
    Ok(sources)
}

/// Flatten a sheet range into rows positioned relative to cell A1.
///
/// calamine trims a range to its used cells, so a sheet whose first used
/// cell is C2 yields a range starting there. Banner skipping and positional
/// columns both count from A1, so the offset is padded back in.
fn range_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }
    rows
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::Bool(b) => CellValue::Bool(*b),
        // Dates and durations are not numbers for our purposes.
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout mirrors one sheet: no header handling here, banner rows are
/// kept and may have any number of fields. Blank lines are skipped by the
/// CSV reader and do not count as rows.
fn load_csv_files(paths: &[PathBuf], cohorts: &[CohortConfig]) -> Result<Vec<RawSource>, LoadError> {
    cohorts
        .iter()
        .map(|cohort| {
            let path = paths
                .get(cohort.source)
                .ok_or_else(|| LoadError::MissingSource {
                    cohort: cohort.label.clone(),
                    index: cohort.source,
                    available: paths.len(),
                    origin: "CSV file list".to_string(),
                })?;
            Ok(RawSource {
                name: path.display().to_string(),
                cohort: cohort.label.clone(),
                rows: read_csv_rows(path)?,
            })
        })
        .collect()
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, LoadError> {
    let csv_err = |err: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        err,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    // Fields are decoded lossily: a stray Latin-1 byte is replaced, not fatal.
    let mut rows = Vec::new();
    for result in reader.byte_records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(cell_from_bytes).collect());
    }
    Ok(rows)
}

fn cell_from_bytes(field: &[u8]) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(String::from_utf8_lossy(field).into_owned())
    }
}
