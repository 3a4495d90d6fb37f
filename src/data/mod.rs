/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read each cohort's sheet → RawSource (raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  positional schema, cohort tag, coercion → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  batch selector → visible records
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  top-N counts, marks histogram → DashboardView (view)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod view;
