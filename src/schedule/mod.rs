//! Season schedule generation
//!
//! The randomized slate generator plus a result cache so that re-running with
//! identical inputs is idempotent and skips recomputation.

pub mod generator;

pub use generator::generate;

use crate::{ScheduleConfig, ScheduledGame};
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key: every generator input that can change the output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScheduleKey {
    seed: u64,
    season_length: u32,
    max_games_per_day: u32,
    max_games_per_team: u32,
    min_home_games: u32,
    conference_games_per_team: u32,
    nonconference_min: u32,
    nonconference_max: u32,
    window_frac_bits: u64,
    max_pair_attempts: u32,
    max_flip_attempts: u32,
    max_day_attempts: u32,
    roster: Vec<(String, String)>,
}

impl ScheduleKey {
    fn new(roster: &[(String, String)], cfg: &ScheduleConfig) -> Self {
        ScheduleKey {
            seed: cfg.seed,
            season_length: cfg.season_length,
            max_games_per_day: cfg.max_games_per_day,
            max_games_per_team: cfg.max_games_per_team,
            min_home_games: cfg.min_home_games,
            conference_games_per_team: cfg.conference_games_per_team,
            nonconference_min: cfg.nonconference_min,
            nonconference_max: cfg.nonconference_max,
            window_frac_bits: cfg.nonconference_window_frac.to_bits(),
            max_pair_attempts: cfg.max_pair_attempts,
            max_flip_attempts: cfg.max_flip_attempts,
            max_day_attempts: cfg.max_day_attempts,
            roster: roster.to_vec(),
        }
    }
}

/// Memoizes generated slates per full input set.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<ScheduleKey, Arc<Vec<ScheduledGame>>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        ScheduleCache::default()
    }

    /// Return the cached slate for these inputs, generating it on first use.
    pub fn get_or_generate(
        &mut self,
        roster: &[(String, String)],
        cfg: &ScheduleConfig,
    ) -> Arc<Vec<ScheduledGame>> {
        let key = ScheduleKey::new(roster, cfg);
        Arc::clone(
            self.entries
                .entry(key)
                .or_insert_with(|| Arc::new(generator::generate(roster, cfg))),
        )
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
