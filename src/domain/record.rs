// ============================================================
// Layer 3 - Record and Dataset
// ============================================================
// A Record is one row of the source table, one Cell per schema
// column in schema order. A Dataset owns its rows together with
// the Schema they were validated against.
//
// Missing values are a Cell variant, not an Option around every
// field, so a cleaned dataset can be checked for completeness
// by scanning for Cell::Missing.

use serde::{Deserialize, Serialize};

use crate::domain::schema::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Flag(bool),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric view of a cell: numbers as-is, flags as 1/0
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Flag(true) => Some(1.0),
            Cell::Flag(false) => Some(0.0),
            Cell::Text(_) | Cell::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub cells: Vec<Cell>,
}

impl Record {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Iterate the cells of one column, top to bottom
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.records.iter().map(move |r| &r.cells[index])
    }

    /// Count of missing cells across the whole table
    pub fn missing_count(&self) -> usize {
        self.records
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| c.is_missing())
            .count()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_read_as_numbers() {
        assert_eq!(Cell::Flag(true).as_f64(), Some(1.0));
        assert_eq!(Cell::Flag(false).as_f64(), Some(0.0));
        assert_eq!(Cell::Text("x".into()).as_f64(), None);
        assert_eq!(Cell::Missing.as_f64(), None);
    }

    #[test]
    fn test_missing_count() {
        let ds = Dataset::new(
            Schema::restaurant(),
            vec![
                Record::new(vec![Cell::Missing, Cell::Number(1.0)]),
                Record::new(vec![Cell::Missing, Cell::Missing]),
            ],
        );
        assert_eq!(ds.missing_count(), 3);
        assert_eq!(ds.column(1).filter(|c| c.is_missing()).count(), 1);
    }
}
