//! Outcome prediction
//!
//! A predictor is either Trained (fitted ensemble plus the scaler and exact
//! feature ordering it was fitted with) or in Fallback mode, where matchups
//! are scored from the precomputed average-ranking statistic, or neutrally
//! when no information exists. Missing inputs degrade, they never abort.

use crate::data::teams::AVG_RANK_CANDIDATES;
use crate::data::TeamTable;
use crate::predict::forest::RandomForest;
use crate::predict::scaler::StandardScaler;
use crate::predict::training::{self, TrainingSet};
use crate::{GameRecord, PredictedGame, PredictorConfig, Result, ScheduledGame};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;

#[derive(Debug)]
pub struct OutcomePredictor {
    mode: Mode,
    rank_temperature: f64,
}

#[derive(Debug)]
enum Mode {
    Trained(TrainedModel),
    Fallback,
}

#[derive(Debug)]
struct TrainedModel {
    forest: RandomForest,
    scaler: StandardScaler,
    stat_indices: Vec<usize>,
    feature_names: Vec<String>,
    holdout_accuracy: f64,
}

impl OutcomePredictor {
    /// Fit from history if the training preconditions hold, otherwise come up
    /// in fallback mode. Never fails: degraded mode is a documented state.
    pub fn fit(
        teams: &TeamTable,
        history: Option<&[GameRecord]>,
        cfg: &PredictorConfig,
    ) -> Self {
        let fallback = |reason: &str| {
            warn!("predictor running in fallback mode: {}", reason);
            OutcomePredictor {
                mode: Mode::Fallback,
                rank_temperature: cfg.rank_temperature,
            }
        };

        let Some(history) = history else {
            return fallback("no usable results table");
        };
        let stat_indices = training::resolve_features(teams);
        if stat_indices.is_empty() {
            return fallback("no model statistic columns in the team table");
        }
        let set = training::assemble(teams, history, &stat_indices);
        if set.rows.len() < cfg.min_training_rows {
            return fallback(&format!(
                "{} merged rows, need {}",
                set.rows.len(),
                cfg.min_training_rows
            ));
        }

        let model = Self::train(set, cfg);
        info!(
            "predictor trained: {} trees, holdout accuracy {:.1}%",
            model.forest.n_trees(),
            model.holdout_accuracy * 100.0
        );
        OutcomePredictor {
            mode: Mode::Trained(model),
            rank_temperature: cfg.rank_temperature,
        }
    }

    fn train(set: TrainingSet, cfg: &PredictorConfig) -> TrainedModel {
        // Deterministic shuffled holdout split
        let mut order: Vec<usize> = (0..set.rows.len()).collect();
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        order.shuffle(&mut rng);

        let holdout_len = ((set.rows.len() as f64) * cfg.holdout_frac).round() as usize;
        let holdout_len = holdout_len.min(set.rows.len().saturating_sub(1));
        let (test_idx, train_idx) = order.split_at(holdout_len);

        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| set.rows[i].clone()).collect();
        let train_labels: Vec<bool> = train_idx.iter().map(|&i| set.labels[i]).collect();

        let scaler = StandardScaler::fit(&train_rows);
        let scaled = scaler.transform_all(&train_rows);
        let forest = RandomForest::fit(&scaled, &train_labels, cfg.n_trees, cfg.max_depth, cfg.seed);

        let holdout_accuracy = if test_idx.is_empty() {
            let correct = scaled
                .iter()
                .zip(&train_labels)
                .filter(|(row, &label)| forest.predict(row.as_slice()) == label)
                .count();
            correct as f64 / train_labels.len().max(1) as f64
        } else {
            let correct = test_idx
                .iter()
                .filter(|&&i| forest.predict(&scaler.transform(&set.rows[i])) == set.labels[i])
                .count();
            correct as f64 / test_idx.len() as f64
        };

        TrainedModel {
            forest,
            scaler,
            stat_indices: set.stat_indices,
            feature_names: set.feature_names,
            holdout_accuracy,
        }
    }

    /// Home-win probability for a single matchup.
    ///
    /// A team missing from the statistics table yields a neutral 0.5 without
    /// aborting the batch.
    pub fn score(&self, teams: &TeamTable, home: &str, away: &str) -> f64 {
        let (home_idx, away_idx) = match (teams.index_of(home), teams.index_of(away)) {
            (Some(h), Some(a)) => (h, a),
            _ => {
                debug!("no statistics for {} or {}; neutral probability", home, away);
                return 0.5;
            }
        };

        match &self.mode {
            Mode::Trained(model) => {
                let row =
                    training::feature_row(teams, &model.stat_indices, home_idx, away_idx);
                model.forest.predict_proba(&model.scaler.transform(&row))
            }
            Mode::Fallback => self.rank_probability(teams, home_idx, away_idx),
        }
    }

    /// Logistic transform of the average-rank gap; lower rank is better. Both
    /// ranks missing, or either one, means no information: 0.5.
    fn rank_probability(&self, teams: &TeamTable, home: usize, away: usize) -> f64 {
        let (Some(home_rank), Some(away_rank)) =
            (teams.average_rank(home), teams.average_rank(away))
        else {
            return 0.5;
        };
        if home_rank == away_rank {
            return 0.5;
        }
        1.0 / (1.0 + ((home_rank - away_rank) / self.rank_temperature).exp())
    }

    /// Annotate a whole slate. Output replaces any previous prediction set.
    pub fn predict_schedule(
        &self,
        teams: &TeamTable,
        schedule: &[ScheduledGame],
    ) -> Vec<PredictedGame> {
        schedule
            .iter()
            .map(|game| {
                let prob = self.score(teams, &game.home, &game.away);
                PredictedGame::new(game.clone(), prob)
            })
            .collect()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.mode, Mode::Fallback)
    }

    /// Holdout accuracy of the trained model, if one was fitted.
    pub fn accuracy(&self) -> Option<f64> {
        match &self.mode {
            Mode::Trained(model) => Some(model.holdout_accuracy),
            Mode::Fallback => None,
        }
    }

    /// The exact feature ordering the model was fitted with.
    pub fn feature_names(&self) -> Option<&[String]> {
        match &self.mode {
            Mode::Trained(model) => Some(&model.feature_names),
            Mode::Fallback => None,
        }
    }

    /// Whether the table carries the statistic the fallback heuristic needs.
    pub fn has_rank_information(teams: &TeamTable) -> bool {
        teams.resolve_stat(AVG_RANK_CANDIDATES).is_some()
    }
}

/// Write the predicted slate as the downloadable flat export artifact.
pub fn export_csv<P: AsRef<Path>>(games: &[PredictedGame], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record([
        "Day",
        "Home",
        "Away",
        "Conference_Game",
        "Home_Win_Prob",
        "Predicted_Winner",
    ])?;
    for p in games {
        writer.write_record([
            p.game.day.to_string(),
            p.game.home.clone(),
            p.game.away.clone(),
            p.game.conference_game.to_string(),
            format!("{:.4}", p.home_win_prob),
            p.predicted_winner.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Table;

    fn ranked_teams() -> TeamTable {
        let csv = "Teams,Conference,Avg_Rank\n\
                   Duke,ACC,10\n\
                   UNC,ACC,40\n\
                   Elon,CAA,40\n";
        TeamTable::from_table(&Table::from_reader(csv.as_bytes()).unwrap()).unwrap()
    }

    /// Six teams whose shooting stats strictly order them; the better shooter
    /// always wins, giving a separable training history.
    fn stat_teams() -> TeamTable {
        let mut csv = String::from("Teams,Conference,FG_PERC,AST,TO\n");
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            csv.push_str(&format!(
                "{},X,{:.2},{},{}\n",
                name,
                0.40 + i as f64 * 0.02,
                10 + i,
                16 - i
            ));
        }
        TeamTable::from_table(&Table::from_reader(csv.as_bytes()).unwrap()).unwrap()
    }

    fn separable_history(teams: &TeamTable) -> Vec<GameRecord> {
        let fg = teams.resolve_stat(&["FG_PERC"]).unwrap();
        let mut games = Vec::new();
        for _ in 0..2 {
            for h in 0..teams.len() {
                for a in 0..teams.len() {
                    if h == a {
                        continue;
                    }
                    let (hs, asc) = if teams.stat(h, fg) > teams.stat(a, fg) {
                        (80.0, 70.0)
                    } else {
                        (70.0, 80.0)
                    };
                    games.push(GameRecord {
                        home: teams.name(h).to_string(),
                        away: teams.name(a).to_string(),
                        home_score: hs,
                        away_score: asc,
                    });
                }
            }
        }
        games
    }

    #[test]
    fn below_threshold_stays_in_fallback() {
        let teams = stat_teams();
        let history = separable_history(&teams)
            .into_iter()
            .take(10)
            .collect::<Vec<_>>();
        let predictor =
            OutcomePredictor::fit(&teams, Some(history.as_slice()), &PredictorConfig::default());
        assert!(predictor.is_fallback());
        assert_eq!(predictor.accuracy(), None);
    }

    #[test]
    fn missing_history_stays_in_fallback() {
        let teams = ranked_teams();
        let predictor = OutcomePredictor::fit(&teams, None, &PredictorConfig::default());
        assert!(predictor.is_fallback());
    }

    #[test]
    fn fallback_favors_better_ranked_home() {
        let teams = ranked_teams();
        let predictor = OutcomePredictor::fit(&teams, None, &PredictorConfig::default());
        let p = predictor.score(&teams, "Duke", "UNC");
        assert!(p > 0.5, "better-ranked home team got {}", p);
        assert!(predictor.score(&teams, "UNC", "Duke") < 0.5);
    }

    #[test]
    fn fallback_equal_ranks_are_even() {
        let teams = ranked_teams();
        let predictor = OutcomePredictor::fit(&teams, None, &PredictorConfig::default());
        assert_eq!(predictor.score(&teams, "UNC", "Elon"), 0.5);
    }

    #[test]
    fn fallback_without_rank_column_is_neutral() {
        let teams = stat_teams();
        let predictor = OutcomePredictor::fit(&teams, None, &PredictorConfig::default());
        assert_eq!(predictor.score(&teams, "A", "B"), 0.5);
    }

    #[test]
    fn unknown_team_is_neutral() {
        let teams = ranked_teams();
        let predictor = OutcomePredictor::fit(&teams, None, &PredictorConfig::default());
        assert_eq!(predictor.score(&teams, "Duke", "Nowhere State"), 0.5);
    }

    fn trained_predictor(teams: &TeamTable) -> OutcomePredictor {
        let history = separable_history(teams);
        let cfg = PredictorConfig {
            n_trees: 30,
            min_training_rows: 20,
            ..PredictorConfig::default()
        };
        OutcomePredictor::fit(teams, Some(history.as_slice()), &cfg)
    }

    #[test]
    fn trains_on_sufficient_history() {
        let teams = stat_teams();
        let predictor = trained_predictor(&teams);
        assert!(!predictor.is_fallback());
        let accuracy = predictor.accuracy().unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
        assert_eq!(predictor.feature_names().unwrap()[0], "Home_FG_PERC");
    }

    #[test]
    fn trained_model_orders_teams() {
        let teams = stat_teams();
        let predictor = trained_predictor(&teams);
        assert!(predictor.score(&teams, "F", "A") > 0.5);
        assert!(predictor.score(&teams, "A", "F") < 0.5);
    }

    #[test]
    fn trained_scoring_is_stable() {
        let teams = stat_teams();
        let predictor = trained_predictor(&teams);
        let first = predictor.score(&teams, "C", "D");
        let second = predictor.score(&teams, "C", "D");
        assert_eq!(first, second);
    }

    #[test]
    fn schedule_prediction_picks_winners() {
        let teams = ranked_teams();
        let predictor = OutcomePredictor::fit(&teams, None, &PredictorConfig::default());
        let schedule = vec![ScheduledGame {
            day: 3,
            home: "UNC".to_string(),
            away: "Duke".to_string(),
            conference_game: true,
        }];
        let predicted = predictor.predict_schedule(&teams, &schedule);
        assert_eq!(predicted.len(), 1);
        assert_eq!(predicted[0].predicted_winner, "Duke");
    }

    #[test]
    fn export_writes_header_and_rows() {
        let game = ScheduledGame {
            day: 5,
            home: "Duke".to_string(),
            away: "UNC".to_string(),
            conference_game: true,
        };
        let predicted = vec![PredictedGame::new(game, 0.8123)];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        export_csv(&predicted, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Day,Home,Away,Conference_Game,Home_Win_Prob,Predicted_Winner"
        );
        assert_eq!(lines.next().unwrap(), "5,Duke,UNC,true,0.8123,Duke");
    }
}
