/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first sheet, columns A–U, ≤100 rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, slide column names (scanned once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Semester ∧ Major ∧ Grade membership → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  KPIs, grouped means, slide means, counts → Summary
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
