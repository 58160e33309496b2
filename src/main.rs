//! March Metrics CLI
//!
//! Schedule generation, outcome prediction and team views over a flat
//! statistics table.

use clap::{Parser, Subcommand};
use march_metrics::{Config, Result};

#[derive(Parser)]
#[command(name = "march-metrics")]
#[command(about = "College basketball schedule generation and outcome prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Generate the randomized season schedule
    Schedule {
        /// Override the generator seed
        #[arg(long)]
        seed: Option<u64>,
        /// Only show games on this day
        #[arg(long)]
        day: Option<u32>,
        /// Only show games involving this team
        #[arg(long)]
        team: Option<String>,
    },
    /// Generate the schedule and predict every matchup
    Predict {
        /// Override the generator seed
        #[arg(long)]
        seed: Option<u64>,
        /// Only show games on this day
        #[arg(long)]
        day: Option<u32>,
        /// Only show games involving this team
        #[arg(long)]
        team: Option<String>,
        /// Only show games involving this conference
        #[arg(long)]
        conference: Option<String>,
        /// Write the predicted schedule to the configured export path
        #[arg(long)]
        export: bool,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Show the full stat breakdown for one team
    Team {
        name: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Compare two teams by category-averaged ranks
    Compare {
        first: String,
        second: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Side-by-side clutch performance for two teams
    Clutch {
        first: String,
        second: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Top-7 rotation contribution for one team
    Players {
        team: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Show table status
    Status,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Schedule { seed, day, team } => commands::schedule(&config, seed, day, team),
        Commands::Predict {
            seed,
            day,
            team,
            conference,
            export,
            format,
        } => commands::predict(&config, seed, day, team, conference, export, format),
        Commands::Team { name, format } => commands::team(&config, &name, format),
        Commands::Compare {
            first,
            second,
            format,
        } => commands::compare(&config, &first, &second, format),
        Commands::Clutch {
            first,
            second,
            format,
        } => commands::clutch(&config, &first, &second, format),
        Commands::Players { team, format } => commands::players(&config, &team, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::OutputFormat;
    use march_metrics::data::{results, Table, TableCache, TeamTable};
    use march_metrics::predict::{export_csv, OutcomePredictor};
    use march_metrics::schedule::ScheduleCache;
    use march_metrics::stats;
    use march_metrics::{
        Config, GameRecord, MetricsError, PredictedGame, Result, ScheduledGame,
    };
    use std::sync::Arc;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Place the team statistics table at {}", config.data.stats_path);
        println!("  3. Run 'march-metrics schedule' to generate a season");
        println!("  4. Run 'march-metrics predict' to score every matchup");

        Ok(())
    }

    fn load_teams(config: &Config) -> Result<Arc<TeamTable>> {
        let mut cache = TableCache::new();
        cache.load(&config.data.stats_path)
    }

    fn load_history(config: &Config) -> Option<Vec<GameRecord>> {
        let table = match Table::from_path(&config.data.results_path) {
            Ok(t) => t,
            Err(e) => {
                log::warn!(
                    "could not read results table {}: {}",
                    config.data.results_path,
                    e
                );
                return None;
            }
        };
        results::load_results(&table)
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let teams = load_teams(config)?;
        let history = load_history(config);

        println!("Data Status");
        println!("───────────────────────────────");
        println!("  Stats table:   {}", config.data.stats_path);
        println!("  Teams:         {}", teams.len());
        println!("  Conferences:   {}", teams.conferences().len());
        println!("  Stat columns:  {}", teams.stat_columns().len());
        match history {
            Some(games) => println!("  Game results:  {}", games.len()),
            None => println!("  Game results:  unavailable"),
        }

        Ok(())
    }

    pub fn schedule(
        config: &Config,
        seed: Option<u64>,
        day: Option<u32>,
        team: Option<String>,
    ) -> Result<()> {
        let teams = load_teams(config)?;
        let mut schedule_config = config.schedule.clone();
        if let Some(seed) = seed {
            schedule_config.seed = seed;
        }

        let mut cache = ScheduleCache::new();
        let games = cache.get_or_generate(&teams.roster(), &schedule_config);
        let shown: Vec<&ScheduledGame> = games
            .iter()
            .filter(|g| day.map_or(true, |d| g.day == d))
            .filter(|g| {
                team.as_deref().map_or(true, |t| {
                    g.home.eq_ignore_ascii_case(t) || g.away.eq_ignore_ascii_case(t)
                })
            })
            .collect();

        for game in &shown {
            println!("{}", game);
        }
        println!("\n{} of {} scheduled games shown", shown.len(), games.len());

        Ok(())
    }

    pub fn predict(
        config: &Config,
        seed: Option<u64>,
        day: Option<u32>,
        team: Option<String>,
        conference: Option<String>,
        export: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let teams = load_teams(config)?;
        let mut schedule_config = config.schedule.clone();
        if let Some(seed) = seed {
            schedule_config.seed = seed;
        }

        let mut cache = ScheduleCache::new();
        let games = cache.get_or_generate(&teams.roster(), &schedule_config);

        let history = load_history(config);
        let predictor = OutcomePredictor::fit(&teams, history.as_deref(), &config.predictor);
        if predictor.is_fallback() {
            if OutcomePredictor::has_rank_information(&teams) {
                println!("Predictor is in fallback mode (ranking heuristic)");
            } else {
                println!("Predictor is in fallback mode (neutral probabilities)");
            }
        } else if let Some(accuracy) = predictor.accuracy() {
            println!("Model accuracy on held-out games: {:.1}%", accuracy * 100.0);
        }

        let predicted = predictor.predict_schedule(&teams, &games);
        let in_conference = |name: &str, wanted: &str| {
            teams
                .index_of(name)
                .map_or(false, |t| teams.conference(t).eq_ignore_ascii_case(wanted))
        };
        let shown: Vec<&PredictedGame> = predicted
            .iter()
            .filter(|p| day.map_or(true, |d| p.game.day == d))
            .filter(|p| {
                team.as_deref().map_or(true, |t| {
                    p.game.home.eq_ignore_ascii_case(t) || p.game.away.eq_ignore_ascii_case(t)
                })
            })
            .filter(|p| {
                conference.as_deref().map_or(true, |c| {
                    in_conference(&p.game.home, c) || in_conference(&p.game.away, c)
                })
            })
            .collect();

        match format {
            OutputFormat::Table => {
                println!(
                    "{:>4} {:<24} {:<24} {:>5} {:>8}  {}",
                    "Day", "Home", "Away", "Conf", "P(home)", "Winner"
                );
                for p in &shown {
                    println!(
                        "{:>4} {:<24} {:<24} {:>5} {:>7.1}%  {}",
                        p.game.day,
                        p.game.home,
                        p.game.away,
                        if p.game.conference_game { "yes" } else { "no" },
                        p.home_win_prob * 100.0,
                        p.predicted_winner
                    );
                }
                println!("\n{} of {} games shown", shown.len(), predicted.len());
            }
            OutputFormat::Json => print_json(&shown)?,
        }

        if export {
            export_csv(&predicted, &config.data.export_path)?;
            println!("Predicted schedule written to {}", config.data.export_path);
        }

        Ok(())
    }

    pub fn team(config: &Config, name: &str, format: OutputFormat) -> Result<()> {
        let teams = load_teams(config)?;
        let view = stats::team_breakdown(&teams, name)?;

        match format {
            OutputFormat::Json => print_json(&view)?,
            OutputFormat::Table => {
                println!("{} ({})", view.team, view.conference);
                for section in &view.sections {
                    println!("\n{}", section.title);
                    println!("───────────────────────────────");
                    for line in &section.lines {
                        println!(
                            "  {:<36} {:>10}   {}",
                            line.label, line.value_display, line.rank_display
                        );
                    }
                    if !section.skipped.is_empty() {
                        println!("  (missing: {})", section.skipped.join(", "));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn compare(config: &Config, first: &str, second: &str, format: OutputFormat) -> Result<()> {
        let teams = load_teams(config)?;
        let view = stats::compare(&teams, first, second)?;

        match format {
            OutputFormat::Json => print_json(&view)?,
            OutputFormat::Table => {
                println!(
                    "{:<16} {:>12} {:>12} {:>12}",
                    "Category", view.first_team, view.second_team, "League"
                );
                println!("{}", "-".repeat(56));
                for c in &view.categories {
                    println!(
                        "{:<16} {:>12} {:>12} {:>12}",
                        c.category,
                        avg_rank_display(c.first),
                        avg_rank_display(c.second),
                        avg_rank_display(c.league)
                    );
                }
                println!("\nLower rank is better.");
            }
        }

        Ok(())
    }

    fn avg_rank_display(value: Option<f64>) -> String {
        value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
    }

    pub fn clutch(config: &Config, first: &str, second: &str, format: OutputFormat) -> Result<()> {
        let teams = load_teams(config)?;
        let view = stats::clutch_summary(&teams, first, second)?;

        match format {
            OutputFormat::Json => print_json(&view)?,
            OutputFormat::Table => {
                println!(
                    "{:<24} {:>12} {:>12}",
                    "Stat", view.first_team, view.second_team
                );
                println!("{}", "-".repeat(50));
                for line in &view.summary {
                    println!(
                        "{:<24} {:>12} {:>12}",
                        line.stat,
                        cell_display(line.first),
                        cell_display(line.second)
                    );
                }
                println!("\nShooting: season vs clutch (%)");
                for row in &view.shooting {
                    println!(
                        "  {:<6} {}: {} -> {}   {}: {} -> {}",
                        row.label,
                        view.first_team,
                        cell_display(row.season_first),
                        cell_display(row.clutch_first),
                        view.second_team,
                        cell_display(row.season_second),
                        cell_display(row.clutch_second)
                    );
                }
            }
        }

        Ok(())
    }

    fn cell_display(value: Option<f64>) -> String {
        value.map_or_else(|| "N/A".to_string(), |v| format!("{:.1}", v))
    }

    pub fn players(config: &Config, team: &str, format: OutputFormat) -> Result<()> {
        let teams = load_teams(config)?;
        let view = stats::players_view(&teams, team)?;

        match format {
            OutputFormat::Json => print_json(&view)?,
            OutputFormat::Table => {
                println!("Top 7 Players: {}", view.team);
                if !view.rotation_complete {
                    println!("This team does not have a full top 7 rotation");
                    return Ok(());
                }
                println!("{:<12} {:>10}   {}", "Stat", "Value", "Rank");
                println!("{}", "-".repeat(40));
                for line in &view.lines {
                    println!(
                        "{:<12} {:>10}   {}",
                        line.label, line.value_display, line.rank_display
                    );
                }
                if !view.shares.is_empty() {
                    println!("\nContribution vs conference average");
                    for share in &view.shares {
                        println!(
                            "  {:<32} {:>8} {:>8}",
                            share.column,
                            cell_display(share.team.map(|v| v * 100.0)),
                            cell_display(share.conference.map(|v| v * 100.0))
                        );
                    }
                }
            }
        }

        Ok(())
    }

    fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| MetricsError::Parse(e.to_string()))?;
        println!("{}", text);
        Ok(())
    }
}
