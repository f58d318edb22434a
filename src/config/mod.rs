pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::roster::{CsvRoster, StaticRoster};
#[cfg(feature = "cli")]
use crate::core::{RosterSource, TeamOptions};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::validate_required_field;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::BalancerConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "team-balancer")]
#[command(about = "Split a roster into teams while avoiding recent pairings")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Participants, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub participants: Vec<String>,

    /// CSV roster with `name` and optional `is_bot` columns
    #[arg(long)]
    pub roster_file: Option<String>,

    /// Number of teams (round-robin)
    #[arg(long)]
    pub team_count: Option<usize>,

    /// Players per team (the last team may be smaller)
    #[arg(long)]
    pub team_size: Option<usize>,

    #[arg(long)]
    pub history_path: Option<String>,

    #[arg(long)]
    pub history_limit: Option<usize>,

    #[arg(long)]
    pub attempts: Option<usize>,

    /// Fixed RNG seed for reproducible results
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub observer_marker: Option<String>,

    /// Search without writing the result to history
    #[arg(long)]
    pub dry_run: bool,

    /// Print the stored history and exit
    #[arg(long)]
    pub show_history: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 設定檔為底，再套用命令列覆蓋
    pub fn settings(&self) -> Result<BalancerConfig> {
        let mut config = match &self.config {
            Some(path) => BalancerConfig::from_file(path)?,
            None => BalancerConfig::default(),
        };

        if let Some(path) = &self.history_path {
            config.history.path = path.clone();
        }
        if let Some(limit) = self.history_limit {
            config.history.limit = limit;
        }
        if let Some(attempts) = self.attempts {
            config.search.attempts = attempts;
        }
        if let Some(seed) = self.seed {
            config.search.seed = Some(seed);
        }
        if let Some(marker) = &self.observer_marker {
            config.roster.observer_marker = marker.clone();
        }

        Ok(config)
    }

    /// `--participants` 優先；兩者都沒給時視為缺少設定
    pub fn roster_source(&self) -> Result<Box<dyn RosterSource>> {
        if !self.participants.is_empty() {
            return Ok(Box::new(StaticRoster::from_names(
                self.participants.iter().cloned(),
            )));
        }

        let path = validate_required_field("participants or roster_file", &self.roster_file)?;
        Ok(Box::new(CsvRoster::new(path)))
    }

    pub fn team_options(&self) -> TeamOptions {
        TeamOptions {
            team_count: self.team_count,
            team_size: self.team_size,
        }
    }
}
