// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user-facing goal per use case.
//
// Rules for this layer:
//   - No regression math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination and error context

// Load → impute → split → fit → evaluate → persist
pub mod train_use_case;

// Reload a saved run, predict new rows, feature impact
pub mod predict_use_case;

// Column statistics of a raw file
pub mod describe_use_case;
