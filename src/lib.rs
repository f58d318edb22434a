pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::BalancerConfig};
pub use core::{
    balancer::{BalanceOutcome, TeamBalancer},
    generator::{SearchOutcome, TeamGenerator},
    history::HistoryStore,
    scorer::PairScorer,
    shuffle::ShuffleEngine,
};
pub use domain::model::{Grouping, HistoryEntry, HistoryLog, Participant, TeamOptions};
pub use utils::error::{BalancerError, Result};
