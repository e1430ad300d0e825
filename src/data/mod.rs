/// Data layer: core types, loading, and hour-range filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TransactionDataset (hour derived here)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ TransactionDataset  │  Vec<TransactionRecord>, V* column names
///   └────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply hour-range predicate → FilteredSubset
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
