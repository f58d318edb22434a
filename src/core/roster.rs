use crate::core::{Participant, RosterEntry, RosterSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// 預設觀戰標記
pub const DEFAULT_OBSERVER_MARKER: &str = "📺";

/// Drops bots and names carrying the observer marker; keeps order and duplicates.
pub fn eligible_participants(entries: &[RosterEntry], observer_marker: &str) -> Vec<Participant> {
    entries
        .iter()
        .filter(|entry| !entry.is_bot)
        .filter(|entry| !is_observer(&entry.name, observer_marker))
        .map(|entry| Participant::new(entry.name.clone()))
        .collect()
}

pub fn is_observer(name: &str, observer_marker: &str) -> bool {
    !observer_marker.is_empty() && name.starts_with(observer_marker)
}

pub fn mark_observer(name: &str, observer_marker: &str) -> String {
    if is_observer(name, observer_marker) {
        return name.to_string();
    }
    format!("{} {}", observer_marker, name)
}

pub fn unmark_observer(name: &str, observer_marker: &str) -> String {
    if !is_observer(name, observer_marker) {
        return name.to_string();
    }
    name.replacen(observer_marker, "", 1).trim().to_string()
}

/// Roster handed over in memory, e.g. from the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    entries: Vec<RosterEntry>,
}

impl StaticRoster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        // 與 CsvRoster 一致：去掉前後空白，略過空名稱
        Self::new(
            names
                .into_iter()
                .map(|name| name.into().trim().to_string())
                .filter(|name| !name.is_empty())
                .map(RosterEntry::member)
                .collect(),
        )
    }
}

#[async_trait]
impl RosterSource for StaticRoster {
    async fn fetch(&self) -> Result<Vec<RosterEntry>> {
        Ok(self.entries.clone())
    }
}

/// Roster read from a CSV file with a `name` column and an optional `is_bot` column.
#[derive(Debug, Clone)]
pub struct CsvRoster {
    path: PathBuf,
}

impl CsvRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(data: &[u8]) -> Result<Vec<RosterEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let entry: RosterEntry = record?;
            if !entry.name.is_empty() {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl RosterSource for CsvRoster {
    async fn fetch(&self) -> Result<Vec<RosterEntry>> {
        let data = tokio::fs::read(&self.path).await?;
        let entries = Self::parse(&data)?;
        tracing::debug!("Read {} roster rows from {}", entries.len(), self.path.display());
        Ok(entries)
    }
}
