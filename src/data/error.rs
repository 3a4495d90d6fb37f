use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors while reading or shaping the sources. Any of these aborts
/// the whole load: no partial dataset is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open workbook {}: {err}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        err: calamine::Error,
    },

    #[error("cannot read sheet '{sheet}' of {}: {err}", .path.display())]
    Sheet {
        path: PathBuf,
        sheet: String,
        #[source]
        err: calamine::Error,
    },

    #[error("cannot read CSV source {}: {err}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        err: csv::Error,
    },

    #[error("cohort '{cohort}' needs source #{index} but only {available} source(s) were supplied ({origin})")]
    MissingSource {
        cohort: String,
        index: usize,
        available: usize,
        origin: String,
    },

    #[error("unsupported source file {} (expected .xlsx, .xlsm, .xls, .xlsb, .ods or .csv)", .path.display())]
    Unsupported { path: PathBuf },

    #[error("{name} row {row}: expected {expected} columns, found {found}")]
    SchemaMismatch {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },
}
