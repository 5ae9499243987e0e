// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File output that does not belong to any one pipeline stage:
//
//   checkpoint.rs - saves / loads the trained model and the run
//                   configuration as JSON so `predict` and
//                   `impact` can reuse a finished run
//
//   report.rs     - renders the text report and writes
//                   results.txt and feature_importance.csv

/// Model and run-config persistence
pub mod checkpoint;

/// Text report and feature-importance CSV
pub mod report;
