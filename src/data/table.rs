//! Raw CSV table ingestion and column resolution
//!
//! Column names in the source tables are free-form strings; resolution tries
//! exact candidates first, then case-insensitive substring containment.

use crate::Result;
use std::io::Read;
use std::path::Path;

/// An untyped table: header row plus string cells.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a table from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Read a table from any reader (used heavily by tests).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
            // Short rows from the flexible reader pad out to the header width
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// Parse a cell as a number; empty and unparsable cells are `None`.
    pub fn numeric(&self, row: usize, col: usize) -> Option<f64> {
        let cell = self.cell(row, col)?;
        if cell.is_empty() {
            return None;
        }
        cell.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Resolve a column from a candidate list: exact (case-insensitive) name
    /// match wins, then substring containment, also case-insensitive.
    pub fn resolve(&self, candidates: &[&str]) -> Option<usize> {
        resolve_column(&self.columns, candidates)
    }
}

/// Column resolution over any header slice.
pub fn resolve_column(columns: &[String], candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        let wanted = candidate.to_lowercase();
        if let Some(idx) = columns.iter().position(|c| c.to_lowercase() == wanted) {
            return Some(idx);
        }
    }
    for candidate in candidates {
        let wanted = candidate.to_lowercase();
        if let Some(idx) = columns
            .iter()
            .position(|c| c.to_lowercase().contains(&wanted))
        {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let csv = "Teams,Conference,FG_PERC,Points\n\
                   Duke,ACC,0.48,81.2\n\
                   Kansas,Big 12,,75.0\n";
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn reads_headers_and_rows() {
        let table = sample();
        assert_eq!(table.columns(), &["Teams", "Conference", "FG_PERC", "Points"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), Some("Duke"));
    }

    #[test]
    fn numeric_handles_blanks() {
        let table = sample();
        assert_eq!(table.numeric(0, 2), Some(0.48));
        assert_eq!(table.numeric(1, 2), None);
        assert_eq!(table.numeric(0, 1), None);
    }

    #[test]
    fn exact_resolution_beats_substring() {
        let columns: Vec<String> = vec!["Opp Points".into(), "Points".into()];
        // "Points" is a substring of "Opp Points", but the exact match wins
        assert_eq!(resolve_column(&columns, &["Points"]), Some(1));
    }

    #[test]
    fn substring_resolution_is_case_insensitive() {
        let columns: Vec<String> = vec!["Teams".into(), "OPP_PPG_RANK".into()];
        assert_eq!(resolve_column(&columns, &["opp_ppg"]), Some(1));
        assert_eq!(resolve_column(&columns, &["Assists"]), None);
    }

    #[test]
    fn first_candidate_wins() {
        let columns: Vec<String> = vec!["Home".into(), "Away".into()];
        assert_eq!(resolve_column(&columns, &["Team", "Home"]), Some(0));
    }

    #[test]
    fn short_rows_are_padded() {
        let csv = "A,B,C\n1,2\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.cell(0, 2), Some(""));
    }
}
