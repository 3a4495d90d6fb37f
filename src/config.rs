//! Dashboard configuration.
//!
//! Positional source layout, sheet → cohort mapping and the bounds of the
//! sidebar controls. Every field defaults to the layout of the marks
//! workbook, so an absent config file means "use the standard layout".

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::color::parse_hex_color;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Positional layout shared by every source.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Cohort label attached to each source.
    #[serde(default = "default_cohorts")]
    pub cohorts: Vec<CohortConfig>,

    /// Bounds and defaults of the sidebar controls.
    #[serde(default)]
    pub controls: ControlsConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            schema: SchemaConfig::default(),
            cohorts: default_cohorts(),
            controls: ControlsConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// What a positional column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    RegNo,
    StudentName,
    Organization,
    Course,
    Marks,
    /// Present in the source, discarded on load.
    Unused,
}

impl ColumnRole {
    const REQUIRED: [ColumnRole; 5] = [
        ColumnRole::RegNo,
        ColumnRole::StudentName,
        ColumnRole::Organization,
        ColumnRole::Course,
        ColumnRole::Marks,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Banner rows dropped from the top of every source.
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,

    /// Whether the first row after the banner is a header line. Its names
    /// are ignored: columns are mapped by position only.
    #[serde(default = "default_header_row")]
    pub header_row: bool,

    /// Column roles in source order.
    #[serde(default = "default_columns")]
    pub columns: Vec<ColumnRole>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            skip_rows: default_skip_rows(),
            header_row: default_header_row(),
            columns: default_columns(),
        }
    }
}

impl SchemaConfig {
    /// Number of columns every data row must carry.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of `role`. Only meaningful on a validated schema.
    pub fn position(&self, role: ColumnRole) -> Option<usize> {
        self.columns.iter().position(|r| *r == role)
    }

    /// Rows at the top of a source that never hold data.
    pub fn leading_rows(&self) -> usize {
        self.skip_rows + usize::from(self.header_row)
    }

    fn validate(&self) -> Result<()> {
        for role in ColumnRole::REQUIRED {
            let n = self.columns.iter().filter(|r| **r == role).count();
            ensure!(n == 1, "schema.columns must contain {role:?} exactly once (found {n})");
        }
        Ok(())
    }
}

fn default_skip_rows() -> usize {
    3
}

fn default_header_row() -> bool {
    true
}

fn default_columns() -> Vec<ColumnRole> {
    vec![
        ColumnRole::RegNo,
        ColumnRole::StudentName,
        ColumnRole::Organization,
        ColumnRole::Course,
        ColumnRole::Unused,
        ColumnRole::Marks,
    ]
}

// ---------------------------------------------------------------------------
// Cohorts
// ---------------------------------------------------------------------------

/// Maps one source (sheet index or CSV position) to a cohort label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortConfig {
    pub label: String,
    pub source: usize,
}

fn default_cohorts() -> Vec<CohortConfig> {
    vec![
        CohortConfig {
            label: "Y21".to_string(),
            source: 0,
        },
        CohortConfig {
            label: "Y22".to_string(),
            source: 1,
        },
    ]
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "default_min_top_n")]
    pub min_top_n: usize,

    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    #[serde(default = "default_min_bins")]
    pub min_bins: usize,

    #[serde(default = "default_max_bins")]
    pub max_bins: usize,

    #[serde(default = "default_bins")]
    pub default_bins: usize,

    /// Initial histogram fill, `#rrggbb`.
    #[serde(default = "default_bin_color")]
    pub bin_color: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            min_top_n: default_min_top_n(),
            default_top_n: default_top_n(),
            min_bins: default_min_bins(),
            max_bins: default_max_bins(),
            default_bins: default_bins(),
            bin_color: default_bin_color(),
        }
    }
}

fn default_min_top_n() -> usize {
    3
}

fn default_top_n() -> usize {
    5
}

fn default_min_bins() -> usize {
    5
}

fn default_max_bins() -> usize {
    50
}

fn default_bins() -> usize {
    7
}

fn default_bin_color() -> String {
    "#1f77b4".to_string()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl DashboardConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, otherwise fall back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.schema.validate()?;

        if self.cohorts.is_empty() {
            bail!("at least one cohort must be configured");
        }
        let mut labels = BTreeSet::new();
        for cohort in &self.cohorts {
            ensure!(
                !cohort.label.is_empty(),
                "cohort for source {} has an empty label",
                cohort.source
            );
            ensure!(
                labels.insert(cohort.label.as_str()),
                "cohort label '{}' is configured twice",
                cohort.label
            );
        }

        let c = &self.controls;
        ensure!(c.min_top_n >= 1, "controls.min_top_n must be at least 1");
        ensure!(c.min_bins >= 1, "controls.min_bins must be at least 1");
        ensure!(
            c.min_bins <= c.default_bins && c.default_bins <= c.max_bins,
            "controls: expected min_bins <= default_bins <= max_bins, got {} / {} / {}",
            c.min_bins,
            c.default_bins,
            c.max_bins
        );
        if parse_hex_color(&c.bin_color).is_none() {
            bail!("controls.bin_color '{}' is not a #rrggbb colour", c.bin_color);
        }
        Ok(())
    }

    /// Cohort labels in configured order.
    pub fn cohort_labels(&self) -> Vec<String> {
        self.cohorts.iter().map(|c| c.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_marks_workbook_layout() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schema.column_count(), 6);
        assert_eq!(config.schema.leading_rows(), 4);
        assert_eq!(config.schema.position(ColumnRole::Marks), Some(5));
        assert_eq!(config.schema.position(ColumnRole::Unused), Some(4));
        assert_eq!(config.cohort_labels(), vec!["Y21", "Y22"]);
        assert_eq!(config.controls.default_bins, 7);
    }

    #[test]
    fn no_config_file_reads_both_cohort_sheets() {
        let config = DashboardConfig::load_or_default(None).unwrap();
        assert_eq!(config.cohort_labels(), vec!["Y21", "Y22"]);
        assert_eq!(config.cohorts[0].source, 0);
        assert_eq!(config.cohorts[1].source, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_equals_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[schema]
skip_rows = 1

[[cohorts]]
label = "Y23"
source = 2

[controls]
default_top_n = 8
"#
        )
        .unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.schema.skip_rows, 1);
        assert!(config.schema.header_row);
        assert_eq!(config.schema.columns, default_columns());
        assert_eq!(config.cohorts.len(), 1);
        assert_eq!(config.cohorts[0].source, 2);
        assert_eq!(config.controls.default_top_n, 8);
        assert_eq!(config.controls.max_bins, 50);
    }

    #[test]
    fn rejects_duplicate_marks_column() {
        let mut config = DashboardConfig::default();
        config.schema.columns[4] = ColumnRole::Marks;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Marks"), "{err}");
    }

    #[test]
    fn rejects_duplicate_cohort_labels() {
        let mut config = DashboardConfig::default();
        config.cohorts[1].label = "Y21".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_bin_bounds_and_colour() {
        let mut config = DashboardConfig::default();
        config.controls.default_bins = 60;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.controls.bin_color = "blue".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
