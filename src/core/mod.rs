pub mod balancer;
pub mod generator;
pub mod history;
pub mod report;
pub mod roster;
pub mod scorer;
pub mod shuffle;

pub use crate::domain::model::{
    Group, Grouping, HistoryEntry, HistoryLog, PairKey, PairScoreMap, Participant, Partitioning,
    RosterEntry, TeamOptions,
};
pub use crate::domain::ports::{ConfigProvider, RosterSource, Storage};
pub use crate::utils::error::Result;
