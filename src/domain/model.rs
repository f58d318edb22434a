use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 參與者的穩定識別字串，核心不追蹤其他屬性
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Participant {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Participant {
    fn from(id: String) -> Self {
        Self(id)
    }
}

pub type Group = Vec<Participant>;

/// One round's partition of the roster, in group order.
pub type Grouping = Vec<Group>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub teams: Grouping,
}

impl HistoryEntry {
    pub fn new(teams: Grouping) -> Self {
        Self::at(Utc::now(), teams)
    }

    pub fn at(timestamp: DateTime<Utc>, teams: Grouping) -> Self {
        Self { timestamp, teams }
    }
}

/// Past groupings, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 新紀錄放最前面，超出上限的舊紀錄直接丟棄
    pub fn prepend(&mut self, entry: HistoryEntry, limit: usize) {
        self.entries.insert(0, entry);
        self.truncate(limit);
    }

    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
    }
}

/// Unordered pair of participants, stored in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    low: Participant,
    high: Participant,
}

impl PairKey {
    pub fn new(a: &Participant, b: &Participant) -> Self {
        if a <= b {
            Self {
                low: a.clone(),
                high: b.clone(),
            }
        } else {
            Self {
                low: b.clone(),
                high: a.clone(),
            }
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// 成對熟悉度分數；不在表中的組合視為 0
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairScoreMap {
    scores: HashMap<PairKey, u64>,
}

impl PairScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, a: &Participant, b: &Participant, weight: u64) {
        *self.scores.entry(PairKey::new(a, b)).or_insert(0) += weight;
    }

    pub fn get(&self, a: &Participant, b: &Participant) -> u64 {
        self.scores.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Sum of the weights of every unordered pair inside `group`.
    pub fn group_score(&self, group: &[Participant]) -> u64 {
        let mut total = 0;
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                total += self.get(&group[i], &group[j]);
            }
        }
        total
    }

    pub fn grouping_score(&self, grouping: &[Group]) -> u64 {
        grouping.iter().map(|group| self.group_score(group)).sum()
    }
}

/// Raw team-shape request as it arrives from the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamOptions {
    pub team_count: Option<usize>,
    pub team_size: Option<usize>,
}

impl TeamOptions {
    pub fn by_count(count: usize) -> Self {
        Self {
            team_count: Some(count),
            team_size: None,
        }
    }

    pub fn by_size(size: usize) -> Self {
        Self {
            team_count: None,
            team_size: Some(size),
        }
    }
}

/// Validated partitioning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partitioning {
    /// Round-robin into `k` groups.
    ByCount(usize),
    /// Consecutive chunks of `s`; the last may be short.
    BySize(usize),
}

/// One member as reported by the roster collaborator, before eligibility filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub is_bot: bool,
}

impl RosterEntry {
    pub fn member(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_bot: false,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_bot: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> Participant {
        Participant::from(id)
    }

    #[test]
    fn test_pair_key_is_canonical() {
        assert_eq!(PairKey::new(&p("bob"), &p("alice")), PairKey::new(&p("alice"), &p("bob")));
        assert_eq!(PairKey::new(&p("bob"), &p("alice")).to_string(), "alice-bob");
    }

    #[test]
    fn test_pair_score_map_defaults_to_zero() {
        let mut scores = PairScoreMap::new();
        scores.add(&p("a"), &p("b"), 12);
        scores.add(&p("b"), &p("a"), 10);

        assert_eq!(scores.get(&p("a"), &p("b")), 22);
        assert_eq!(scores.get(&p("a"), &p("c")), 0);
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_grouping_score_sums_pairs_within_groups_only() {
        let mut scores = PairScoreMap::new();
        scores.add(&p("a"), &p("b"), 12);
        scores.add(&p("c"), &p("d"), 4);
        scores.add(&p("a"), &p("c"), 100);

        let grouping = vec![vec![p("a"), p("b")], vec![p("c"), p("d")]];
        assert_eq!(scores.grouping_score(&grouping), 16);
    }

    #[test]
    fn test_history_log_prepend_keeps_newest_first_within_limit() {
        let mut log = HistoryLog::new();
        for round in 0..7 {
            log.prepend(HistoryEntry::new(vec![vec![p(&format!("r{}", round))]]), 5);
        }

        assert_eq!(log.len(), 5);
        assert_eq!(log.entries()[0].teams[0][0], p("r6"));
        assert_eq!(log.entries()[4].teams[0][0], p("r2"));
    }

    #[test]
    fn test_history_log_json_layout() {
        let timestamp = "2025-01-02T03:04:05Z".parse::<DateTime<Utc>>().unwrap();
        let log = HistoryLog::from_entries(vec![HistoryEntry::at(
            timestamp,
            vec![vec![p("a"), p("b")], vec![p("c")]],
        )]);

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"timestamp": "2025-01-02T03:04:05Z", "teams": [["a", "b"], ["c"]]}
            ])
        );
    }

    #[test]
    fn test_history_entry_without_teams_parses() {
        let log: HistoryLog =
            serde_json::from_str(r#"[{"timestamp": "2025-01-02T03:04:05.123Z"}]"#).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log.entries()[0].teams.is_empty());
    }
}
