//! College basketball analytics core
//!
//! Schedule generation, match outcome prediction and consolidated team views
//! over a flat per-team statistics table.

pub mod data;
pub mod predict;
pub mod schedule;
pub mod stats;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single generated game in the season slate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledGame {
    /// Season day in `[1, season_length]`
    pub day: u32,
    pub home: String,
    pub away: String,
    pub conference_game: bool,
}

impl fmt::Display for ScheduledGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {:>3}: {} vs {}{}",
            self.day,
            self.home,
            self.away,
            if self.conference_game { " (conf)" } else { "" }
        )
    }
}

/// A scheduled game annotated with the predictor's output.
///
/// Replaced wholesale when the schedule or the model changes, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedGame {
    pub game: ScheduledGame,
    /// Probability in [0, 1] that the home team wins
    pub home_win_prob: f64,
    pub predicted_winner: String,
}

impl PredictedGame {
    pub fn new(game: ScheduledGame, home_win_prob: f64) -> Self {
        let predicted_winner = if home_win_prob >= 0.5 {
            game.home.clone()
        } else {
            game.away.clone()
        };
        PredictedGame {
            game,
            home_win_prob,
            predicted_winner,
        }
    }
}

/// One historical game result used for model training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub home: String,
    pub away: String,
    pub home_score: f64,
    pub away_score: f64,
}

impl GameRecord {
    /// Binary training label: did the home team win outright?
    pub fn home_win(&self) -> bool {
        self.home_score > self.away_score
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Table schema error: {0}")]
    Schema(String),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, MetricsError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schedule: ScheduleConfig,
    pub predictor: PredictorConfig,
    pub data: DataConfig,
}

/// Constants for the schedule generator. All targets except the hard caps
/// (`max_games_per_day`, `max_games_per_team`) are best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Number of season days games may be placed on
    pub season_length: u32,
    /// Hard cap on games scheduled on any single day
    pub max_games_per_day: u32,
    /// Hard cap on games per team
    pub max_games_per_team: u32,
    /// Soft minimum of home games per team, chased by the repair pass
    pub min_home_games: u32,
    /// Soft per-team conference-game target
    pub conference_games_per_team: u32,
    /// Per-team non-conference target is drawn uniformly from this range
    pub nonconference_min: u32,
    pub nonconference_max: u32,
    /// Fraction of the season reserved (from day 1) for non-conference games
    pub nonconference_window_frac: f64,
    /// Attempt ceiling for each pairing pass
    pub max_pair_attempts: u32,
    /// Home/away flip tries per team in the repair pass
    pub max_flip_attempts: u32,
    /// Random day draws per game before the ordered fallback scan
    pub max_day_attempts: u32,
    pub seed: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            season_length: 160,
            max_games_per_day: 50,
            max_games_per_team: 40,
            min_home_games: 15,
            conference_games_per_team: 20,
            nonconference_min: 8,
            nonconference_max: 12,
            nonconference_window_frac: 0.25,
            max_pair_attempts: 10_000,
            max_flip_attempts: 25,
            max_day_attempts: 30,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    pub max_depth: usize,
    /// Below this many merged training rows the predictor stays in fallback mode
    pub min_training_rows: usize,
    /// Fraction of training rows held out for the accuracy report
    pub holdout_frac: f64,
    /// Temperature (in rank points) of the fallback logistic
    pub rank_temperature: f64,
    pub seed: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig {
            n_trees: 200,
            max_depth: 10,
            min_training_rows: 50,
            holdout_frac: 0.2,
            rank_temperature: 25.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub stats_path: String,
    pub results_path: String,
    pub export_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            stats_path: "data/all_stats.csv".to_string(),
            results_path: "data/game_results.csv".to_string(),
            export_path: "data/predicted_schedule.csv".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schedule: ScheduleConfig::default(),
            predictor: PredictorConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MetricsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| MetricsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MetricsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicted_winner_follows_probability() {
        let game = ScheduledGame {
            day: 1,
            home: "Duke".to_string(),
            away: "UNC".to_string(),
            conference_game: true,
        };
        assert_eq!(PredictedGame::new(game.clone(), 0.5).predicted_winner, "Duke");
        assert_eq!(PredictedGame::new(game.clone(), 0.72).predicted_winner, "Duke");
        assert_eq!(PredictedGame::new(game, 0.49).predicted_winner, "UNC");
    }

    #[test]
    fn home_win_is_strict() {
        let record = GameRecord {
            home: "A".to_string(),
            away: "B".to_string(),
            home_score: 70.0,
            away_score: 70.0,
        };
        assert!(!record.home_win());
    }

    #[test]
    fn config_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.schedule.season_length, 160);
        assert_eq!(back.predictor.n_trees, 200);
    }
}
