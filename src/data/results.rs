//! Historical game-results ingestion
//!
//! Locates home/away/score columns by the shared fuzzy rules. A results table
//! that cannot be matched is not an error: the predictor runs in fallback
//! mode instead, so this loader reports `None` and logs the reason.

use crate::data::table::Table;
use crate::GameRecord;
use log::warn;

const HOME_CANDIDATES: &[&str] = &["Team", "Home", "Home_Team", "HomeTeam"];
const AWAY_CANDIDATES: &[&str] = &["Opponent", "Away", "Away_Team", "AwayTeam"];
const HOME_SCORE_CANDIDATES: &[&str] = &["Points", "Home_Points", "Home Score", "PTS"];
const AWAY_SCORE_CANDIDATES: &[&str] =
    &["Opp Points", "Opponent Points", "Away_Points", "Away Score", "OPP_PTS"];

/// Extract game records, or `None` when the required columns cannot be found.
///
/// Rows with a missing team name or unparsable score are dropped.
pub fn load_results(table: &Table) -> Option<Vec<GameRecord>> {
    let home_col = table.resolve(HOME_CANDIDATES);
    let away_col = table.resolve(AWAY_CANDIDATES);
    let home_score_col = table.resolve(HOME_SCORE_CANDIDATES);
    let away_score_col = table.resolve(AWAY_SCORE_CANDIDATES);

    let (home_col, away_col, home_score_col, away_score_col) =
        match (home_col, away_col, home_score_col, away_score_col) {
            (Some(h), Some(a), Some(hs), Some(asc)) => (h, a, hs, asc),
            _ => {
                warn!("results table is missing team or score columns; no training data");
                return None;
            }
        };

    let mut records = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let home = match table.cell(row, home_col) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let away = match table.cell(row, away_col) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let (home_score, away_score) =
            match (table.numeric(row, home_score_col), table.numeric(row, away_score_col)) {
                (Some(hs), Some(asc)) => (hs, asc),
                _ => continue,
            };
        records.push(GameRecord {
            home,
            away,
            home_score,
            away_score,
        });
    }

    Some(records)
}
