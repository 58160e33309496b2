//! Training-example assembly
//!
//! Merges each historical game with both participants' statistic vectors and
//! labels it with the home-win outcome. Examples are ephemeral: they exist
//! only long enough to fit the model.

use crate::data::TeamTable;
use crate::GameRecord;
use log::debug;

/// Statistic columns the model trains on, each as a fuzzy candidate list.
/// Columns that resolve nowhere in the table are skipped.
pub const FEATURE_CANDIDATES: &[&[&str]] = &[
    &["FG_PERC"],
    &["FG3_PERC"],
    &["FT_PERC"],
    &["OReb"],
    &["DReb"],
    &["Rebounds"],
    &["AST"],
    &["TO"],
    &["STL"],
    &["Off_eff", "Off_efficiency"],
    &["Def_efficiency hybrid", "Def_eff_hybrid", "Def_eff"],
];

/// The merged, labeled training matrix plus the exact feature ordering used.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<bool>,
    /// Resolved statistic column indices into the team table, home-then-away
    pub stat_indices: Vec<usize>,
    /// Concatenated feature names (`Home_*` then `Away_*`), order-stable
    pub feature_names: Vec<String>,
}

/// Resolve the model's statistic columns against the team table.
pub fn resolve_features(teams: &TeamTable) -> Vec<usize> {
    let mut resolved = Vec::new();
    for candidates in FEATURE_CANDIDATES {
        match teams.resolve_stat(candidates) {
            Some(idx) if !resolved.contains(&idx) => resolved.push(idx),
            Some(_) => {}
            None => debug!("no statistic column for {:?}; skipped", candidates[0]),
        }
    }
    resolved
}

/// Build one concatenated feature row for a (home, away) pair.
/// Missing cells contribute 0, matching the source data's fill rule.
pub fn feature_row(
    teams: &TeamTable,
    stat_indices: &[usize],
    home: usize,
    away: usize,
) -> Vec<f64> {
    let mut row = Vec::with_capacity(stat_indices.len() * 2);
    for &team in &[home, away] {
        for &col in stat_indices {
            row.push(teams.stat(team, col).unwrap_or(0.0));
        }
    }
    row
}

/// Merge history with team statistics. Games whose home or away side is
/// absent from the table are dropped.
pub fn assemble(teams: &TeamTable, history: &[GameRecord], stat_indices: &[usize]) -> TrainingSet {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    let mut dropped = 0usize;

    for game in history {
        let (Some(home), Some(away)) = (teams.index_of(&game.home), teams.index_of(&game.away))
        else {
            dropped += 1;
            continue;
        };
        rows.push(feature_row(teams, stat_indices, home, away));
        labels.push(game.home_win());
    }
    if dropped > 0 {
        debug!("{} historical game(s) had no statistics match", dropped);
    }

    let mut feature_names = Vec::with_capacity(stat_indices.len() * 2);
    for prefix in ["Home", "Away"] {
        for &col in stat_indices {
            feature_names.push(format!("{}_{}", prefix, teams.stat_columns()[col]));
        }
    }

    TrainingSet {
        rows,
        labels,
        stat_indices: stat_indices.to_vec(),
        feature_names,
    }
}
