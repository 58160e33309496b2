//! Consolidated team views
//!
//! One parameterized implementation per concern (breakdown, comparison,
//! clutch, players), all driven by the declarative configs in
//! [`crate::stats::groups`]. Views emit rows and summaries; rendering is the
//! caller's business.

use crate::data::TeamTable;
use crate::stats::groups::{self, StatGroup};
use crate::stats::normalize::{finite_mean, robust_normalize};
use crate::{MetricsError, Result};
use log::warn;
use serde::Serialize;

/// One displayed statistic row.
#[derive(Debug, Clone, Serialize)]
pub struct StatLine {
    pub label: String,
    pub value: Option<f64>,
    pub value_display: String,
    pub rank_display: String,
}

/// A titled breakdown section with its normalized profile.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub title: String,
    pub lines: Vec<StatLine>,
    /// Labels of configured stats whose value column is absent
    pub skipped: Vec<String>,
    /// Labels of the stats behind the profile vectors
    pub profile_labels: Vec<String>,
    /// Team / conference-mean / league-mean positions in [0,1] per stat
    pub team_profile: Vec<Option<f64>>,
    pub conference_profile: Vec<Option<f64>>,
    pub league_profile: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamBreakdown {
    pub team: String,
    pub conference: String,
    pub sections: Vec<SectionView>,
}

/// Format a value for display. Percent columns hold canonical fractions and
/// render as 0-100 percentages; integral values drop the decimals.
pub fn format_value(column: &str, value: Option<f64>) -> String {
    let Some(v) = value else {
        return "N/A".to_string();
    };
    if column.to_uppercase().contains("PERC") || column.contains('%') {
        return format!("{:.1}%", v * 100.0);
    }
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

/// Format the rank column of a row.
pub fn format_rank(rank_col_present: bool, value: Option<f64>) -> String {
    if !rank_col_present {
        return "No rank mapping defined".to_string();
    }
    match value {
        Some(v) => format!("{}", v as i64),
        None => "Not enough games played for ranking".to_string(),
    }
}

/// The full four-section breakdown for one team.
pub fn team_breakdown(teams: &TeamTable, name: &str) -> Result<TeamBreakdown> {
    let team = teams
        .index_of(name)
        .ok_or_else(|| MetricsError::UnknownTeam(name.to_string()))?;

    let sections = groups::breakdown_groups()
        .iter()
        .map(|group| build_section(teams, team, group))
        .collect();

    Ok(TeamBreakdown {
        team: teams.name(team).to_string(),
        conference: teams.conference(team).to_string(),
        sections,
    })
}

fn build_section(teams: &TeamTable, team: usize, group: &StatGroup) -> SectionView {
    let mut lines = Vec::new();
    let mut skipped = Vec::new();
    let mut used_cols = Vec::new();
    let mut profile_labels = Vec::new();

    for def in group.defs {
        let value_col = teams.resolve_stat_exact(def.value);
        let rank_col = teams.resolve_stat_exact(def.rank);

        let Some(value_col) = value_col else {
            skipped.push(def.label.to_string());
            continue;
        };
        let value = teams.stat(team, value_col);
        let rank = rank_col.and_then(|c| teams.stat(team, c));
        lines.push(StatLine {
            label: def.label.to_string(),
            value,
            value_display: format_value(&teams.stat_columns()[value_col], value),
            rank_display: format_rank(rank_col.is_some(), rank),
        });
        used_cols.push(value_col);
        profile_labels.push(def.label.to_string());
    }

    if !skipped.is_empty() {
        warn!(
            "{}: missing stat columns for {:?}; skipped",
            group.title, skipped
        );
    }

    let conference = teams.conference(team).to_string();
    let conference_teams = teams.teams_in_conference(&conference);

    let mut team_profile = Vec::new();
    let mut conference_profile = Vec::new();
    let mut league_profile = Vec::new();
    for &col in &used_cols {
        let normalized = robust_normalize(&teams.column_values(col));
        team_profile.push(to_option(normalized[team]));
        let conf_values: Vec<f64> = conference_teams.iter().map(|&t| normalized[t]).collect();
        conference_profile.push(finite_mean(&conf_values));
        league_profile.push(finite_mean(&normalized));
    }

    SectionView {
        title: group.title.to_string(),
        lines,
        skipped,
        profile_labels,
        team_profile,
        conference_profile,
        league_profile,
    }
}

fn to_option(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Category-level average ranks for two teams plus the league.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRanks {
    pub category: String,
    pub first: Option<f64>,
    pub second: Option<f64>,
    pub league: Option<f64>,
}

/// One rank column inside a category.
#[derive(Debug, Clone, Serialize)]
pub struct StatRankLine {
    pub category: String,
    pub column: String,
    pub first: Option<f64>,
    pub second: Option<f64>,
    pub league: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub first_team: String,
    pub second_team: String,
    pub categories: Vec<CategoryRanks>,
    pub per_stat: Vec<StatRankLine>,
}

/// Compare two teams by category-averaged rank columns (lower is better).
pub fn compare(teams: &TeamTable, first: &str, second: &str) -> Result<ComparisonView> {
    if first.to_lowercase() == second.to_lowercase() {
        return Err(MetricsError::InvalidSelection(
            "select two different teams to compare".to_string(),
        ));
    }
    let a = teams
        .index_of(first)
        .ok_or_else(|| MetricsError::UnknownTeam(first.to_string()))?;
    let b = teams
        .index_of(second)
        .ok_or_else(|| MetricsError::UnknownTeam(second.to_string()))?;

    let mut categories = Vec::new();
    let mut per_stat = Vec::new();

    for &(category, columns) in groups::rank_categories() {
        let resolved: Vec<usize> = columns
            .iter()
            .filter_map(|&c| teams.resolve_stat_exact(&[c]))
            .collect();
        // Categories with no backing columns are dropped, not zeroed
        if resolved.is_empty() {
            continue;
        }

        categories.push(CategoryRanks {
            category: category.to_string(),
            first: category_avg_rank(teams, a, &resolved),
            second: category_avg_rank(teams, b, &resolved),
            league: league_category_avg_rank(teams, &resolved),
        });

        for &col in &resolved {
            let column_values = teams.column_values(col);
            per_stat.push(StatRankLine {
                category: category.to_string(),
                column: teams.stat_columns()[col].clone(),
                first: teams.stat(a, col),
                second: teams.stat(b, col),
                league: finite_mean(&column_values),
            });
        }
    }

    if categories.is_empty() {
        return Err(MetricsError::Schema(
            "no ranking columns found for any comparison category".to_string(),
        ));
    }

    Ok(ComparisonView {
        first_team: teams.name(a).to_string(),
        second_team: teams.name(b).to_string(),
        categories,
        per_stat,
    })
}

fn category_avg_rank(teams: &TeamTable, team: usize, cols: &[usize]) -> Option<f64> {
    let values: Vec<f64> = cols
        .iter()
        .map(|&c| teams.stat(team, c).unwrap_or(f64::NAN))
        .collect();
    finite_mean(&values)
}

fn league_category_avg_rank(teams: &TeamTable, cols: &[usize]) -> Option<f64> {
    let per_team: Vec<f64> = (0..teams.len())
        .map(|t| category_avg_rank(teams, t, cols).unwrap_or(f64::NAN))
        .collect();
    finite_mean(&per_team)
}

#[derive(Debug, Clone, Serialize)]
pub struct ClutchLine {
    pub stat: String,
    pub first: Option<f64>,
    pub second: Option<f64>,
}

/// Season-vs-clutch shooting percentages (0-100) for both teams.
#[derive(Debug, Clone, Serialize)]
pub struct ShootingRow {
    pub label: String,
    pub season_first: Option<f64>,
    pub clutch_first: Option<f64>,
    pub season_second: Option<f64>,
    pub clutch_second: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClutchView {
    pub first_team: String,
    pub second_team: String,
    pub summary: Vec<ClutchLine>,
    pub shooting: Vec<ShootingRow>,
}

/// Side-by-side clutch performance for two teams. Columns absent from the
/// table appear with empty values rather than being dropped.
pub fn clutch_summary(teams: &TeamTable, first: &str, second: &str) -> Result<ClutchView> {
    let a = teams
        .index_of(first)
        .ok_or_else(|| MetricsError::UnknownTeam(first.to_string()))?;
    let b = teams
        .index_of(second)
        .ok_or_else(|| MetricsError::UnknownTeam(second.to_string()))?;

    let summary = groups::clutch_columns()
        .iter()
        .map(|&stat| {
            let col = teams.resolve_stat_exact(&[stat]);
            ClutchLine {
                stat: stat.to_string(),
                first: col.and_then(|c| teams.stat(a, c)),
                second: col.and_then(|c| teams.stat(b, c)),
            }
        })
        .collect();

    let percent = |team: usize, column: &str| -> Option<f64> {
        let col = teams.resolve_stat_exact(&[column])?;
        teams.stat(team, col).map(|v| v * 100.0)
    };
    let shooting = groups::shooting_splits()
        .iter()
        .map(|&(label, season, clutch)| ShootingRow {
            label: label.to_string(),
            season_first: percent(a, season),
            clutch_first: percent(a, clutch),
            season_second: percent(b, season),
            clutch_second: percent(b, clutch),
        })
        .collect();

    Ok(ClutchView {
        first_team: teams.name(a).to_string(),
        second_team: teams.name(b).to_string(),
        summary,
        shooting,
    })
}

/// A top-7 percentage-share column against the conference mean.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerShareRow {
    pub column: String,
    pub team: Option<f64>,
    pub conference: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayersView {
    pub team: String,
    /// False when the team has no full top-7 rotation in the data
    pub rotation_complete: bool,
    pub lines: Vec<StatLine>,
    pub shares: Vec<PlayerShareRow>,
}

/// Top-7 rotation contribution for one team.
pub fn players_view(teams: &TeamTable, name: &str) -> Result<PlayersView> {
    let team = teams
        .index_of(name)
        .ok_or_else(|| MetricsError::UnknownTeam(name.to_string()))?;

    let rotation_complete = teams
        .resolve_stat_exact(&["FGM_TOP7"])
        .and_then(|c| teams.stat(team, c))
        .is_some();
    if !rotation_complete {
        return Ok(PlayersView {
            team: teams.name(team).to_string(),
            rotation_complete: false,
            lines: Vec::new(),
            shares: Vec::new(),
        });
    }

    let lines = groups::top7_stats()
        .iter()
        .filter_map(|&(label, value_col, rank_col)| {
            let value_col = teams.resolve_stat_exact(&[value_col])?;
            let rank_idx = teams.resolve_stat_exact(&[rank_col]);
            let value = teams.stat(team, value_col);
            Some(StatLine {
                label: label.to_string(),
                value,
                value_display: format_value(&teams.stat_columns()[value_col], value),
                rank_display: format_rank(
                    rank_idx.is_some(),
                    rank_idx.and_then(|c| teams.stat(team, c)),
                ),
            })
        })
        .collect();

    let conference = teams.conference(team).to_string();
    let conference_teams = teams.teams_in_conference(&conference);
    let shares = teams
        .stat_columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains(groups::TOP7_SHARE_MARKER))
        .map(|(col, name)| {
            let conf_values: Vec<f64> = conference_teams
                .iter()
                .map(|&t| teams.stat(t, col).unwrap_or(f64::NAN))
                .collect();
            PlayerShareRow {
                column: name.clone(),
                team: teams.stat(team, col),
                conference: finite_mean(&conf_values),
            }
        })
        .collect();

    Ok(PlayersView {
        team: teams.name(team).to_string(),
        rotation_complete: true,
        lines,
        shares,
    })
}
