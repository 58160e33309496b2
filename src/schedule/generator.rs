//! Randomized season slate generation
//!
//! Five passes over the roster: conference pairing, non-conference pairing,
//! shortfall fill, home-balance repair, day assignment. Every pass is a
//! bounded greedy loop; targets that cannot be met inside the attempt budget
//! are accepted as shortfalls. Only the hard caps are guaranteed: no team
//! plays itself, no team plays twice on one day, and the per-day and per-team
//! maximums are never exceeded.

use crate::{ScheduleConfig, ScheduledGame};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

/// A paired game before day assignment.
#[derive(Debug, Clone, Copy)]
struct Matchup {
    home: usize,
    away: usize,
    conference_game: bool,
}

/// Generate a full season slate for the given roster of
/// (team name, conference) pairs. Deterministic for a fixed seed and roster.
pub fn generate(roster: &[(String, String)], cfg: &ScheduleConfig) -> Vec<ScheduledGame> {
    if roster.len() < 2 {
        warn!("roster has {} team(s); nothing to schedule", roster.len());
        return Vec::new();
    }
    let mut builder = SlateBuilder::new(roster, cfg);
    builder.conference_pass();
    builder.nonconference_pass();
    builder.shortfall_pass();
    builder.home_repair_pass();
    builder.assign_days()
}

struct SlateBuilder<'a> {
    cfg: &'a ScheduleConfig,
    names: Vec<&'a str>,
    conferences: Vec<&'a str>,
    /// Conference labels in first-appearance order
    conference_order: Vec<&'a str>,
    rng: StdRng,
    matchups: Vec<Matchup>,
    total: Vec<u32>,
    home: Vec<u32>,
    conf_count: Vec<u32>,
    nonconf_count: Vec<u32>,
    nonconf_target: Vec<u32>,
}

impl<'a> SlateBuilder<'a> {
    fn new(roster: &'a [(String, String)], cfg: &'a ScheduleConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let names: Vec<&str> = roster.iter().map(|(n, _)| n.as_str()).collect();
        let conferences: Vec<&str> = roster.iter().map(|(_, c)| c.as_str()).collect();

        let mut conference_order: Vec<&str> = Vec::new();
        for conf in &conferences {
            if !conference_order.contains(conf) {
                conference_order.push(conf);
            }
        }

        let lo = cfg.nonconference_min.min(cfg.nonconference_max);
        let hi = cfg.nonconference_min.max(cfg.nonconference_max);
        let nonconf_target: Vec<u32> = (0..roster.len())
            .map(|_| rng.gen_range(lo..=hi))
            .collect();

        let n = roster.len();
        SlateBuilder {
            cfg,
            names,
            conferences,
            conference_order,
            rng,
            matchups: Vec::new(),
            total: vec![0; n],
            home: vec![0; n],
            conf_count: vec![0; n],
            nonconf_count: vec![0; n],
            nonconf_target,
        }
    }

    /// Record a game between `a` and `b`; the side further from the home-game
    /// minimum hosts.
    fn add_game(&mut self, a: usize, b: usize, conference_game: bool) {
        debug_assert_ne!(a, b);
        let deficit_a = self.cfg.min_home_games.saturating_sub(self.home[a]);
        let deficit_b = self.cfg.min_home_games.saturating_sub(self.home[b]);
        let (home, away) = if deficit_b > deficit_a { (b, a) } else { (a, b) };

        self.matchups.push(Matchup {
            home,
            away,
            conference_game,
        });
        self.home[home] += 1;
        for team in [a, b] {
            self.total[team] += 1;
            if conference_game {
                self.conf_count[team] += 1;
            } else {
                self.nonconf_count[team] += 1;
            }
        }
    }

    fn under_cap(&self, team: usize) -> bool {
        self.total[team] < self.cfg.max_games_per_team
    }

    /// Pass 1: pair same-conference teams toward the conference target.
    fn conference_pass(&mut self) {
        let target = self.cfg.conference_games_per_team;
        for conf in self.conference_order.clone() {
            let group: Vec<usize> = (0..self.names.len())
                .filter(|&t| self.conferences[t] == conf)
                .collect();
            if group.len() < 2 {
                continue;
            }

            let mut attempts = 0;
            while attempts < self.cfg.max_pair_attempts {
                attempts += 1;
                let short: Vec<usize> = group
                    .iter()
                    .copied()
                    .filter(|&t| self.conf_count[t] < target && self.under_cap(t))
                    .collect();
                let Some(&a) = short.choose(&mut self.rng) else {
                    break;
                };

                let mut partners: Vec<usize> = group
                    .iter()
                    .copied()
                    .filter(|&t| t != a && self.conf_count[t] < target && self.under_cap(t))
                    .collect();
                if partners.is_empty() {
                    // Relax to any conference mate under the hard cap
                    partners = group
                        .iter()
                        .copied()
                        .filter(|&t| t != a && self.under_cap(t))
                        .collect();
                }
                let Some(&b) = partners.choose(&mut self.rng) else {
                    continue;
                };
                self.add_game(a, b, true);
            }
        }
    }

    /// Pass 2: pair cross-conference teams toward each team's drawn target.
    fn nonconference_pass(&mut self) {
        let mut attempts = 0;
        while attempts < self.cfg.max_pair_attempts {
            attempts += 1;
            let short: Vec<usize> = (0..self.names.len())
                .filter(|&t| self.nonconf_count[t] < self.nonconf_target[t] && self.under_cap(t))
                .collect();
            let Some(&a) = short.choose(&mut self.rng) else {
                break;
            };

            let mut partners: Vec<usize> = (0..self.names.len())
                .filter(|&t| {
                    t != a
                        && self.conferences[t] != self.conferences[a]
                        && self.nonconf_count[t] < self.nonconf_target[t]
                        && self.under_cap(t)
                })
                .collect();
            if partners.is_empty() {
                partners = (0..self.names.len())
                    .filter(|&t| {
                        t != a && self.conferences[t] != self.conferences[a] && self.under_cap(t)
                    })
                    .collect();
            }
            let Some(&b) = partners.choose(&mut self.rng) else {
                continue;
            };
            self.add_game(a, b, false);
        }
    }

    /// Pass 3: top up any team still under its combined target against any
    /// opponent with spare capacity; conference-ness follows the pairing.
    fn shortfall_pass(&mut self) {
        for a in 0..self.names.len() {
            let combined = self.cfg.conference_games_per_team + self.nonconf_target[a];
            let mut attempts = 0;
            while self.total[a] < combined && self.under_cap(a) && attempts < self.cfg.max_pair_attempts
            {
                attempts += 1;
                let partners: Vec<usize> = (0..self.names.len())
                    .filter(|&t| t != a && self.under_cap(t))
                    .collect();
                let Some(&b) = partners.choose(&mut self.rng) else {
                    break;
                };
                let shared = self.conferences[a] == self.conferences[b];
                self.add_game(a, b, shared);
            }
            if self.total[a] < combined {
                debug!(
                    "{} fell short of its combined target ({} of {})",
                    self.names[a], self.total[a], combined
                );
            }
        }
    }

    /// Pass 4: flip home/away on single games to pull teams up toward the
    /// home-game minimum, borrowing only from opponents with a surplus.
    fn home_repair_pass(&mut self) {
        let min_home = self.cfg.min_home_games;
        for a in 0..self.names.len() {
            let mut tries = 0;
            while self.home[a] < min_home && tries < self.cfg.max_flip_attempts {
                tries += 1;
                let candidate = self
                    .matchups
                    .iter()
                    .position(|m| m.away == a && self.home[m.home] > min_home);
                let Some(idx) = candidate else {
                    break;
                };
                let old_home = self.matchups[idx].home;
                self.matchups[idx].home = a;
                self.matchups[idx].away = old_home;
                self.home[old_home] -= 1;
                self.home[a] += 1;
            }
            if self.home[a] < min_home {
                debug!(
                    "{} ends repair below the home minimum ({} of {})",
                    self.names[a], self.home[a], min_home
                );
            }
        }
    }

    /// Pass 5: place each game on a day in its eligible window, dropping the
    /// ones that fit nowhere.
    fn assign_days(&mut self) -> Vec<ScheduledGame> {
        let (nonconf_window, conf_window) = day_windows(self.cfg);
        let mut day_load: HashMap<u32, u32> = HashMap::new();
        let mut busy: HashSet<(u32, usize)> = HashSet::new();
        let mut seen: HashSet<(u32, usize, usize)> = HashSet::new();
        let mut scheduled = Vec::with_capacity(self.matchups.len());
        let mut dropped = 0usize;

        let mut matchups = self.matchups.clone();
        matchups.shuffle(&mut self.rng);

        let day_cap = self.cfg.max_games_per_day;
        for m in matchups {
            let (start, end) = if m.conference_game {
                conf_window
            } else {
                nonconf_window
            };

            let fits = move |day: u32, day_load: &HashMap<u32, u32>, busy: &HashSet<(u32, usize)>| {
                *day_load.get(&day).unwrap_or(&0) < day_cap
                    && !busy.contains(&(day, m.home))
                    && !busy.contains(&(day, m.away))
            };

            let mut placed = None;
            for _ in 0..self.cfg.max_day_attempts {
                let day = self.rng.gen_range(start..=end);
                if fits(day, &day_load, &busy) {
                    placed = Some(day);
                    break;
                }
            }
            if placed.is_none() {
                placed = (start..=end).find(|&day| fits(day, &day_load, &busy));
            }

            let Some(day) = placed else {
                dropped += 1;
                continue;
            };
            if !seen.insert((day, m.home, m.away)) {
                continue;
            }
            *day_load.entry(day).or_insert(0) += 1;
            busy.insert((day, m.home));
            busy.insert((day, m.away));
            scheduled.push(ScheduledGame {
                day,
                home: self.names[m.home].to_string(),
                away: self.names[m.away].to_string(),
                conference_game: m.conference_game,
            });
        }

        if dropped > 0 {
            debug!("{} game(s) could not be placed on any day", dropped);
        }

        scheduled.sort_by(|a, b| {
            (a.day, &a.home, &a.away).cmp(&(b.day, &b.home, &b.away))
        });
        scheduled
    }
}

/// Split the season into the early non-conference window and the remaining
/// conference window. Degenerate configurations collapse to the full season.
fn day_windows(cfg: &ScheduleConfig) -> ((u32, u32), (u32, u32)) {
    let season = cfg.season_length.max(1);
    let split = ((season as f64) * cfg.nonconference_window_frac).round() as u32;
    let split = split.clamp(1, season);
    if split >= season {
        ((1, season), (1, season))
    } else {
        ((1, split), (split + 1, season))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn eight_team_roster() -> Vec<(String, String)> {
        let mut roster = Vec::new();
        for i in 0..4 {
            roster.push((format!("East {}", i), "East".to_string()));
        }
        for i in 0..4 {
            roster.push((format!("West {}", i), "West".to_string()));
        }
        roster
    }

    fn small_config() -> ScheduleConfig {
        ScheduleConfig {
            season_length: 40,
            max_games_per_day: 4,
            max_games_per_team: 10,
            min_home_games: 3,
            conference_games_per_team: 6,
            nonconference_min: 2,
            nonconference_max: 3,
            ..ScheduleConfig::default()
        }
    }

    fn assert_hard_caps(games: &[ScheduledGame], cfg: &ScheduleConfig) {
        let mut per_day: HashMap<u32, u32> = HashMap::new();
        let mut per_team: HashMap<&str, u32> = HashMap::new();
        let mut team_days: std::collections::HashSet<(u32, &str)> = Default::default();

        for g in games {
            assert_ne!(g.home, g.away, "team scheduled against itself");
            assert!(g.day >= 1 && g.day <= cfg.season_length);
            *per_day.entry(g.day).or_insert(0) += 1;
            for team in [g.home.as_str(), g.away.as_str()] {
                *per_team.entry(team).or_insert(0) += 1;
                assert!(
                    team_days.insert((g.day, team)),
                    "{} plays twice on day {}",
                    team,
                    g.day
                );
            }
        }
        for (&day, &count) in &per_day {
            assert!(count <= cfg.max_games_per_day, "day {} over cap", day);
        }
        for (&team, &count) in &per_team {
            assert!(count <= cfg.max_games_per_team, "{} over game cap", team);
        }
    }

    #[test]
    fn small_universe_meets_hard_caps() {
        let cfg = small_config();
        let games = generate(&eight_team_roster(), &cfg);
        assert!(!games.is_empty());
        assert_hard_caps(&games, &cfg);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let cfg = small_config();
        let roster = eight_team_roster();
        let a = generate(&roster, &cfg);
        let b = generate(&roster, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let cfg = small_config();
        let other = ScheduleConfig {
            seed: 1234,
            ..small_config()
        };
        let roster = eight_team_roster();
        assert_ne!(generate(&roster, &cfg), generate(&roster, &other));
    }

    #[test]
    fn windows_partition_conference_days() {
        let cfg = small_config();
        let ((_, nonconf_end), (conf_start, _)) = day_windows(&cfg);
        let games = generate(&eight_team_roster(), &cfg);
        for g in &games {
            if g.conference_game {
                assert!(g.day >= conf_start, "conference game on day {}", g.day);
            } else {
                assert!(g.day <= nonconf_end, "non-conference game on day {}", g.day);
            }
        }
    }

    #[test]
    fn combined_targets_are_reachable_in_closed_universe() {
        // 6 conference + at most 3 non-conference <= 10-game cap; with 40
        // days and plenty of slots every team should land on target.
        let cfg = small_config();
        let games = generate(&eight_team_roster(), &cfg);
        let mut per_team: HashMap<&str, u32> = HashMap::new();
        for g in &games {
            *per_team.entry(g.home.as_str()).or_insert(0) += 1;
            *per_team.entry(g.away.as_str()).or_insert(0) += 1;
        }
        for (team, count) in per_team {
            assert!(
                count >= cfg.conference_games_per_team + cfg.nonconference_min,
                "{} played only {} games",
                team,
                count
            );
        }
    }

    #[test]
    fn home_repair_never_reduces_home_counts() {
        let cfg = small_config();
        let roster = eight_team_roster();

        let mut builder = SlateBuilder::new(&roster, &cfg);
        builder.conference_pass();
        builder.nonconference_pass();
        builder.shortfall_pass();
        let before = builder.home.clone();
        let below: Vec<usize> = (0..roster.len())
            .filter(|&t| before[t] < cfg.min_home_games)
            .collect();
        builder.home_repair_pass();
        for t in below {
            assert!(builder.home[t] >= before[t]);
        }
        // Donors keep at least the minimum
        for t in 0..roster.len() {
            if before[t] > cfg.min_home_games {
                assert!(builder.home[t] >= cfg.min_home_games);
            }
        }
    }

    #[test]
    fn no_duplicate_day_pairings() {
        let cfg = small_config();
        let games = generate(&eight_team_roster(), &cfg);
        let mut seen = std::collections::HashSet::new();
        for g in &games {
            assert!(seen.insert((g.day, g.home.clone(), g.away.clone())));
        }
    }

    #[test]
    fn tiny_roster_yields_empty_slate() {
        let cfg = small_config();
        let roster = vec![("Lone".to_string(), "Solo".to_string())];
        assert!(generate(&roster, &cfg).is_empty());
    }

    #[test]
    fn default_config_handles_realistic_league() {
        let mut roster = Vec::new();
        for conf in ["ACC", "SEC", "Big Ten", "Big 12"] {
            for i in 0..8 {
                roster.push((format!("{} {}", conf, i), conf.to_string()));
            }
        }
        let cfg = ScheduleConfig::default();
        let games = generate(&roster, &cfg);
        assert!(!games.is_empty());
        assert_hard_caps(&games, &cfg);
    }
}
