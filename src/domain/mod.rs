// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types that name the concepts of the pipeline:
// the schema a file must match, the records it holds, the
// configuration of a run, the error taxonomy and the traits
// other layers implement.
//
// Rules for this layer:
//   - NO linear algebra here
//   - NO file parsing here (config JSON aside)
//   - Only structs, enums and traits

/// Run configuration (seed, split, solver limit, schema)
pub mod config;

/// Error taxonomy shared by every library layer
pub mod error;

/// Cells, records and the in-memory dataset
pub mod record;

/// Ordered, typed column definitions
pub mod schema;

/// DatasetSource and Predictor abstractions
pub mod traits;
