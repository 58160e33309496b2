//! Typed reference-data access over the per-team statistics table
//!
//! Validates the raw table once at ingestion: the team column must exist,
//! percent-like columns are canonicalized to fraction-of-one, and every
//! numeric statistic lands in a dense, column-ordered matrix. Downstream code
//! never re-resolves or re-guesses representations.

use crate::data::table::{resolve_column, Table};
use crate::{MetricsError, Result};
use log::warn;
use std::collections::HashMap;

const TEAM_CANDIDATES: &[&str] = &["Teams", "Team"];
const CONFERENCE_CANDIDATES: &[&str] = &["Conference", "Conf"];

/// Candidates for the precomputed average-ranking statistic used by the
/// predictor's fallback heuristic.
pub const AVG_RANK_CANDIDATES: &[&str] =
    &["Avg_Rank", "AVG_RANK", "Average Ranking", "Avg Rank", "Overall_Rank"];

/// Validated per-team reference data.
///
/// Statistic values are a dense matrix aligned with `stat_columns`; missing
/// cells are `f64::NAN` and surfaced as `None` through [`TeamTable::stat`].
#[derive(Debug, Clone)]
pub struct TeamTable {
    names: Vec<String>,
    conferences: Vec<String>,
    stat_columns: Vec<String>,
    values: Vec<Vec<f64>>,
    by_name: HashMap<String, usize>,
}

impl TeamTable {
    /// Build the typed layer from a raw table.
    ///
    /// The only unrecoverable shape problem is a missing team column; every
    /// other irregularity degrades with a warning.
    pub fn from_table(table: &Table) -> Result<Self> {
        let team_col = table.resolve(TEAM_CANDIDATES).ok_or_else(|| {
            MetricsError::Schema("statistics table has no 'Teams' or 'Team' column".to_string())
        })?;
        let conf_col = table.resolve(CONFERENCE_CANDIDATES);
        if conf_col.is_none() {
            warn!("statistics table has no conference column; treating all teams as one conference");
        }

        let stat_cols: Vec<usize> = (0..table.columns().len())
            .filter(|&c| c != team_col && Some(c) != conf_col)
            .filter(|&c| (0..table.row_count()).any(|r| table.numeric(r, c).is_some()))
            .collect();
        let stat_columns: Vec<String> =
            stat_cols.iter().map(|&c| table.columns()[c].clone()).collect();

        let mut names = Vec::new();
        let mut conferences = Vec::new();
        let mut values: Vec<Vec<f64>> = Vec::new();
        let mut by_name = HashMap::new();

        for row in 0..table.row_count() {
            let name = match table.cell(row, team_col) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            if by_name.contains_key(&name.to_lowercase()) {
                warn!("duplicate team row '{}' ignored", name);
                continue;
            }
            let conference = conf_col
                .and_then(|c| table.cell(row, c))
                .filter(|c| !c.is_empty())
                .unwrap_or("Independent")
                .to_string();

            let row_values: Vec<f64> = stat_cols
                .iter()
                .map(|&c| table.numeric(row, c).unwrap_or(f64::NAN))
                .collect();

            by_name.insert(name.to_lowercase(), names.len());
            names.push(name);
            conferences.push(conference);
            values.push(row_values);
        }

        let mut teams = TeamTable {
            names,
            conferences,
            stat_columns,
            values,
            by_name,
        };
        teams.canonicalize_percents();
        Ok(teams)
    }

    /// Convert percent-named columns to fraction-of-one, decided once per
    /// column: if the column's finite maximum exceeds 1.5 it is stored as
    /// 0-100 and the whole column is divided by 100.
    fn canonicalize_percents(&mut self) {
        for (col, name) in self.stat_columns.iter().enumerate() {
            let upper = name.to_uppercase();
            if !upper.contains("PERC") && !name.contains('%') {
                continue;
            }
            // Rank columns over percent stats (FG_PERC_Rank etc.) hold rank
            // values, not percentages
            if upper.contains("RANK") {
                continue;
            }
            let max = self
                .values
                .iter()
                .map(|row| row[col])
                .filter(|v| v.is_finite())
                .fold(f64::NEG_INFINITY, f64::max);
            if max > 1.5 {
                for row in &mut self.values {
                    row[col] /= 100.0;
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn stat_columns(&self) -> &[String] {
        &self.stat_columns
    }

    /// Look up a team by name, case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn name(&self, team: usize) -> &str {
        &self.names[team]
    }

    pub fn conference(&self, team: usize) -> &str {
        &self.conferences[team]
    }

    /// Distinct conference labels in first-appearance order.
    pub fn conferences(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for conf in &self.conferences {
            if !seen.iter().any(|s| s == &conf.as_str()) {
                seen.push(conf.as_str());
            }
        }
        seen
    }

    pub fn teams_in_conference(&self, conference: &str) -> Vec<usize> {
        (0..self.len())
            .filter(|&t| self.conferences[t] == conference)
            .collect()
    }

    /// A statistic cell; `None` for missing values.
    pub fn stat(&self, team: usize, col: usize) -> Option<f64> {
        let v = *self.values.get(team)?.get(col)?;
        v.is_finite().then_some(v)
    }

    /// All values of one statistic column, team-ordered (NaN for missing).
    pub fn column_values(&self, col: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[col]).collect()
    }

    /// Resolve a statistic column through the shared fuzzy rules.
    pub fn resolve_stat(&self, candidates: &[&str]) -> Option<usize> {
        resolve_column(&self.stat_columns, candidates)
    }

    /// Exact-name resolution for the view configs, whose candidate lists
    /// already enumerate the known spelling variants.
    pub fn resolve_stat_exact(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|c| self.stat_columns.iter().position(|col| col == c))
    }

    /// The precomputed average-ranking statistic, if the table carries one.
    pub fn average_rank(&self, team: usize) -> Option<f64> {
        let col = self.resolve_stat(AVG_RANK_CANDIDATES)?;
        self.stat(team, col)
    }

    /// Roster as (name, conference) pairs in table order, for the generator.
    pub fn roster(&self) -> Vec<(String, String)> {
        self.names
            .iter()
            .cloned()
            .zip(self.conferences.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    fn sample() -> TeamTable {
        let csv = "Teams,Conference,FG_PERC,FT_PERC,Points,Avg_Rank\n\
                   Duke,ACC,48.2,0.71,81.2,12\n\
                   Kansas,Big 12,46.0,0.69,75.0,20\n\
                   Gonzaga,WCC,50.1,0.75,84.9,\n";
        TeamTable::from_table(&table(csv)).unwrap()
    }

    #[test]
    fn missing_team_column_is_fatal() {
        let raw = table("Name,Points\nDuke,80\n");
        // "Name" does not match Teams/Team even by substring
        assert!(TeamTable::from_table(&raw).is_err());
    }

    #[test]
    fn percent_columns_become_fractions() {
        let teams = sample();
        let fg = teams.resolve_stat(&["FG_PERC"]).unwrap();
        let ft = teams.resolve_stat(&["FT_PERC"]).unwrap();
        let duke = teams.index_of("duke").unwrap();
        // FG_PERC was stored 0-100, FT_PERC already fractional; both land on
        // fraction-of-one without double-scaling
        assert_relative_eq!(teams.stat(duke, fg).unwrap(), 0.482, epsilon = 1e-9);
        assert_relative_eq!(teams.stat(duke, ft).unwrap(), 0.71, epsilon = 1e-9);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let teams = sample();
        assert_eq!(teams.index_of("KANSAS"), teams.index_of("Kansas"));
        assert_eq!(teams.index_of("UCLA"), None);
    }

    #[test]
    fn missing_cells_are_none() {
        let teams = sample();
        let gonzaga = teams.index_of("Gonzaga").unwrap();
        assert_eq!(teams.average_rank(gonzaga), None);
        let duke = teams.index_of("Duke").unwrap();
        assert_eq!(teams.average_rank(duke), Some(12.0));
    }

    #[test]
    fn conference_grouping() {
        let teams = sample();
        assert_eq!(teams.conferences(), vec!["ACC", "Big 12", "WCC"]);
        assert_eq!(teams.teams_in_conference("ACC").len(), 1);
    }

    #[test]
    fn missing_conference_defaults() {
        let raw = table("Teams,Points\nDuke,80\n");
        let teams = TeamTable::from_table(&raw).unwrap();
        assert_eq!(teams.conference(0), "Independent");
    }
}
