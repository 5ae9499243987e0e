// ============================================================
// Layer 3 - Schema
// ============================================================
// An ordered list of named, typed columns. The loader checks
// the file header against it once, after which every column is
// addressed by position instead of by name.
//
// Column kinds:
//   numeric - float value, missing → column median
//   code    - integer category code used as a numeric feature
//   binary  - "Yes"/"No" flag, encoded 1/0
//   text    - free text, missing → "Unknown"
//
// Column roles:
//   feature     - goes into the design matrix (schema order)
//   target      - the value being predicted (exactly one)
//   passthrough - kept on the record, never modelled

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Code,
    Binary,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Feature,
    Target,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub role: ColumnRole,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, role: ColumnRole) -> Self {
        Self { name: name.into(), kind, role }
    }

    pub fn feature(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self::new(name, kind, ColumnRole::Feature)
    }

    pub fn target(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Numeric, ColumnRole::Target)
    }

    pub fn passthrough(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self::new(name, kind, ColumnRole::Passthrough)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    /// The restaurant dataset used by the rating task.
    ///
    /// Feature order: numeric fields first, then the country code
    /// and the two service flags.
    pub fn restaurant() -> Self {
        use ColumnKind::*;
        Self {
            columns: vec![
                Column::passthrough("Restaurant Name", Text),
                Column::passthrough("City", Text),
                Column::passthrough("Cuisines", Text),
                Column::feature("Average Cost for two", Numeric),
                Column::feature("Price range", Numeric),
                Column::feature("Votes", Numeric),
                Column::feature("Country Code", Code),
                Column::feature("Has Table booking", Binary),
                Column::feature("Has Online delivery", Binary),
                Column::target("Aggregate rating"),
            ],
        }
    }

    /// Structural checks: unique names, one numeric target,
    /// at least one feature, no text features.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(PipelineError::InvalidSchema("no columns".into()));
        }

        for (i, col) in self.columns.iter().enumerate() {
            if col.name.trim().is_empty() {
                return Err(PipelineError::InvalidSchema(format!(
                    "column {i} has an empty name"
                )));
            }
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(PipelineError::InvalidSchema(format!(
                    "duplicate column '{}'",
                    col.name
                )));
            }
            if col.role == ColumnRole::Feature && col.kind == ColumnKind::Text {
                return Err(PipelineError::InvalidSchema(format!(
                    "text column '{}' cannot be a feature",
                    col.name
                )));
            }
        }

        let targets: Vec<&Column> = self
            .columns
            .iter()
            .filter(|c| c.role == ColumnRole::Target)
            .collect();
        match targets.as_slice() {
            [t] if t.kind == ColumnKind::Numeric => {}
            [t] => {
                return Err(PipelineError::InvalidSchema(format!(
                    "target '{}' must be numeric",
                    t.name
                )))
            }
            other => {
                return Err(PipelineError::InvalidSchema(format!(
                    "expected exactly one target column, found {}",
                    other.len()
                )))
            }
        }

        if self.feature_indices().is_empty() {
            return Err(PipelineError::InvalidSchema("no feature columns".into()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Positions of feature columns, in model order
    pub fn feature_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role == ColumnRole::Feature)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.feature_indices()
            .into_iter()
            .map(|i| self.columns[i].name.clone())
            .collect()
    }

    /// Position of the single target column
    pub fn target_index(&self) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.role == ColumnRole::Target)
            .ok_or_else(|| PipelineError::InvalidSchema("no target column".into()))
    }

    /// The same columns minus the target, for loading rows that
    /// are to be predicted. validate() rejects the result.
    pub fn without_target(&self) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|c| c.role != ColumnRole::Target)
                .cloned()
                .collect(),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::restaurant()
    }
}
