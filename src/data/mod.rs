/// Data layer: raw loading, one-shot cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  threshold, sentinel, types, completeness → GameTable (once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  genres × ratings × year range → FilteredSubset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  count, (year, platform) series, scatter points
///   └───────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
