// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the raw delimited file to the numeric
// train/test matrices the trainer consumes.
//
// The pipeline flows in this order:
//
//   Dataset.csv
//       │
//       ▼
//   CsvLoader       → validates the header, decodes cells
//       │
//       ▼
//   Preprocessor    → median / "No" / "Unknown" fills
//       │
//       ▼
//   FeatureMatrix   → feature rows + target vector
//       │
//       ▼
//   Partition       → seeded 80/20 train/test split
//
// Each module is responsible for exactly one step.

/// Reads delimited files into a raw Dataset
pub mod loader;

/// Imputes missing cells and partitions rows
pub mod preprocessor;

/// Numeric feature matrix and target vector
pub mod dataset;

/// Seeded train/test partitioning
pub mod splitter;

/// Median, quantiles and per-feature summaries
pub mod stats;
