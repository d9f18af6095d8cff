// Row-store contract and the adapters that back it.
//
// The pipeline only ever asks a store one question: "give me all rows of
// (state, month, pop_group, avg)", optionally restricted to a set of raw
// category labels. Results come back untyped, as strings plus column
// names; typing and cleaning happen in the loader.
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::ReportError;

/// Column names the loader expects to find in every store result.
pub const EXPECTED_COLUMNS: [&str; 4] = ["state", "month", "pop_group", "avg"];

/// Fully materialized query result: column names plus untyped row tuples.
/// Missing cells are `None`; there is no pagination.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A source of raw metric rows.
///
/// `categories`, when given, filters on the store's raw `pop_group`
/// labels verbatim; normalization is the loader's job, not the store's.
pub trait RowStore {
    fn fetch_rows(&self, categories: Option<&[&str]>) -> Result<RowSet, ReportError>;
}

/// Appends externally sourced rows into a store's row-level schema.
///
/// Bulk ingestion does no validation beyond normalizing column headers;
/// the rows land verbatim and are cleaned on the way out by the loader.
pub trait BulkLoader {
    fn append_rows(&mut self, incoming: &RowSet) -> Result<usize, ReportError>;
}

/// Normalize a raw column header to the store's snake_case convention.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_").replace('-', "_")
}

fn row_matches(row: &[Option<String>], group_idx: Option<usize>, filter: &[&str]) -> bool {
    match group_idx {
        Some(idx) => row
            .get(idx)
            .and_then(|c| c.as_deref())
            .map_or(false, |label| filter.contains(&label)),
        // Without a pop_group column there is nothing to filter on; the
        // loader will reject the schema either way.
        None => true,
    }
}

/// CSV-file-backed store. One file stands in for the `master_data` table:
/// the header row supplies the column names, every record is one row.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RowStore for CsvStore {
    fn fetch_rows(&self, categories: Option<&[&str]>) -> Result<RowSet, ReportError> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ReportError::DataAccess(e.to_string()))?;
        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| ReportError::DataAccess(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let group_idx = columns.iter().position(|c| c == "pop_group");

        let mut rows = Vec::new();
        for result in rdr.deserialize::<Vec<Option<String>>>() {
            let row = result.map_err(|e| ReportError::DataAccess(e.to_string()))?;
            if let Some(filter) = categories {
                if !row_matches(&row, group_idx, filter) {
                    continue;
                }
            }
            rows.push(row);
        }
        Ok(RowSet { columns, rows })
    }
}

/// In-memory store, used by tests and as the landing target for bulk
/// ingestion.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rowset: RowSet,
}

impl MemoryStore {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            rowset: RowSet { columns, rows },
        }
    }
}

impl RowStore for MemoryStore {
    fn fetch_rows(&self, categories: Option<&[&str]>) -> Result<RowSet, ReportError> {
        let group_idx = self.rowset.column_index("pop_group");
        let rows = self
            .rowset
            .rows
            .iter()
            .filter(|row| match categories {
                Some(filter) => row_matches(row, group_idx, filter),
                None => true,
            })
            .cloned()
            .collect();
        Ok(RowSet {
            columns: self.rowset.columns.clone(),
            rows,
        })
    }
}

impl BulkLoader for MemoryStore {
    fn append_rows(&mut self, incoming: &RowSet) -> Result<usize, ReportError> {
        if self.rowset.columns.is_empty() {
            self.rowset.columns = incoming.columns.iter().map(|c| normalize_header(c)).collect();
        }
        self.rowset.rows.extend(incoming.rows.iter().cloned());
        Ok(incoming.rows.len())
    }
}
