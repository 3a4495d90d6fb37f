//! Command-line interface argument parsing.

use std::path::PathBuf;

use anyhow::{Result, bail, ensure};
use clap::Parser;

use crate::config::DashboardConfig;
use crate::data::filter::{BatchFilter, FilterState};
use crate::data::loader::SourceSpec;

/// Internship Dashboard - summarise student internship marks
///
/// Loads the cohort sheets of a marks workbook (or one CSV file per cohort),
/// drops rows without an organization, course or numeric marks, and shows
/// the top organizations, the marks histogram and the top courses.
///
/// Examples:
///   internship-dashboard marksexcel.xlsx
///   internship-dashboard --csv y21.csv --csv y22.csv
///   internship-dashboard marksexcel.xlsx --print --batch Y22 --bins 10
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Marks workbook (.xlsx, .xlsm, .xls, .xlsb, .ods)
    #[arg(value_name = "WORKBOOK", conflicts_with = "csv")]
    pub workbook: Option<PathBuf>,

    /// CSV source, one per cohort in cohort order (repeatable)
    #[arg(long, value_name = "FILE")]
    pub csv: Vec<PathBuf>,

    /// TOML file overriding the schema, cohorts and control bounds
    #[arg(short, long, value_name = "FILE", env = "INTERNSHIP_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the three summaries to stdout instead of opening the window
    #[arg(long)]
    pub print: bool,

    /// Batch to summarise: All or a cohort label
    #[arg(long, default_value = "All", value_name = "BATCH")]
    pub batch: String,

    /// Number of organizations to rank (default from config)
    #[arg(long, value_name = "N")]
    pub top_orgs: Option<usize>,

    /// Number of courses to rank (default from config)
    #[arg(long, value_name = "N")]
    pub top_courses: Option<usize>,

    /// Histogram bin count (default from config)
    #[arg(long, value_name = "N")]
    pub bins: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The sources named on the command line, if any.
    pub fn source_spec(&self) -> Result<Option<SourceSpec>> {
        if let Some(wb) = &self.workbook {
            return Ok(Some(SourceSpec::from_paths(vec![wb.clone()])?));
        }
        if self.csv.is_empty() {
            return Ok(None);
        }
        Ok(Some(SourceSpec::from_paths(self.csv.clone())?))
    }

    /// Control values for `--print`, defaults and bounds taken from `config`.
    pub fn filter_state(&self, config: &DashboardConfig) -> Result<FilterState> {
        let controls = &config.controls;
        let top_organizations = self.top_orgs.unwrap_or(controls.default_top_n);
        let top_courses = self.top_courses.unwrap_or(controls.default_top_n);
        let bins = self.bins.unwrap_or(controls.default_bins);

        ensure!(
            top_organizations >= controls.min_top_n && top_courses >= controls.min_top_n,
            "top-N values must be at least {}",
            controls.min_top_n
        );
        ensure!(
            (controls.min_bins..=controls.max_bins).contains(&bins),
            "--bins must be between {} and {}",
            controls.min_bins,
            controls.max_bins
        );

        let batch = BatchFilter::parse(&self.batch);
        if let BatchFilter::Cohort(label) = &batch {
            let labels = config.cohort_labels();
            if !labels.contains(label) {
                bail!("unknown batch '{label}' (expected All or one of: {})", labels.join(", "));
            }
        }

        Ok(FilterState {
            batch,
            top_organizations,
            top_courses,
            bins,
        })
    }
}
