//! The vendor table: full worksheet content at a point in time.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{COLUMNS, VendorRecord, VendorRow};

/// Ordered sequence of vendor rows.
///
/// There is no partial-update granularity: a table is read whole and
/// written whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorTable {
    rows: Vec<VendorRow>,
}

impl VendorTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows, dropping blank ones.
    pub fn from_rows(rows: Vec<VendorRow>) -> Self {
        Self {
            rows: rows.into_iter().filter(|r| !r.is_blank()).collect(),
        }
    }

    /// Build a table from a raw cell grid whose first row is the header.
    ///
    /// Only the first six columns are considered. Columns are located by
    /// header name, falling back to position when a header is missing.
    /// Fully-empty rows are dropped.
    pub fn from_grid(grid: &[Vec<String>]) -> Self {
        let Some((header, data)) = grid.split_first() else {
            return Self::new();
        };

        let header: Vec<&str> = header
            .iter()
            .take(COLUMNS.len())
            .map(|h| h.trim())
            .collect();
        let positions: Vec<usize> = COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| header.iter().position(|h| h == col).unwrap_or(i))
            .collect();

        let rows = data
            .iter()
            .map(|cells| {
                let ordered: Vec<&str> = positions
                    .iter()
                    .map(|&p| cells.get(p).map(String::as_str).unwrap_or(""))
                    .collect();
                VendorRow::from_cells(ordered.as_slice())
            })
            .collect();

        Self::from_rows(rows)
    }

    /// Header row followed by every data row.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        std::iter::once(COLUMNS.iter().map(|c| c.to_string()).collect())
            .chain(self.rows.iter().map(VendorRow::to_cells))
            .collect()
    }

    /// Rows in storage order.
    pub fn rows(&self) -> &[VendorRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, VendorRow> {
        self.rows.iter()
    }

    /// The first stored company name that contains `name` (case-sensitive).
    pub fn company_containing(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .map(|r| r.company_name.as_str())
            .find(|existing| existing.contains(name))
    }

    /// A copy of this table with `record` appended last.
    pub fn appended(&self, record: &VendorRecord) -> Self {
        let mut rows = self.rows.clone();
        rows.push(record.to_row());
        Self { rows }
    }

    /// Decode every row into a typed record.
    pub fn records(&self) -> Result<Vec<VendorRecord>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_record(i))
            .collect()
    }
}

impl<'a> IntoIterator for &'a VendorTable {
    type Item = &'a VendorRow;
    type IntoIter = std::slice::Iter<'a, VendorRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
