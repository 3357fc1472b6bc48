/// Data layer: core types, loading, filtering, and sorting.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  Vec<DatasetRecord>, facet index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply facet predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   sort    │  order by sort key + tie-break → display order
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sort;
