use crate::core::{HistoryLog, PairScoreMap};

/// Builds pair familiarity scores from the history log.
///
/// The entry at recency index `i` (0 = newest) weighs `(limit + 1 - i) * 2`,
/// so a pair that shared a group last round costs far more than one that
/// shared a group `limit - 1` rounds ago. Entries at index `limit` or later
/// contribute nothing.
#[derive(Debug, Clone, Copy)]
pub struct PairScorer {
    limit: usize,
}

impl PairScorer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn weight(&self, index: usize) -> u64 {
        if index >= self.limit {
            return 0;
        }
        ((self.limit + 1 - index) * 2) as u64
    }

    pub fn score(&self, history: &HistoryLog) -> PairScoreMap {
        let mut scores = PairScoreMap::new();

        for (index, entry) in history.entries().iter().take(self.limit).enumerate() {
            let weight = self.weight(index);
            for team in &entry.teams {
                for i in 0..team.len() {
                    for j in (i + 1)..team.len() {
                        scores.add(&team[i], &team[j], weight);
                    }
                }
            }
        }

        tracing::debug!(
            "Scored {} pairs from {} history entries",
            scores.len(),
            history.len().min(self.limit)
        );
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HistoryEntry, Participant};

    fn p(id: &str) -> Participant {
        Participant::from(id)
    }

    fn entry(teams: &[&[&str]]) -> HistoryEntry {
        HistoryEntry::new(
            teams
                .iter()
                .map(|team| team.iter().map(|id| p(id)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_weights_decay_linearly() {
        let scorer = PairScorer::new(5);
        let weights: Vec<u64> = (0..6).map(|i| scorer.weight(i)).collect();
        assert_eq!(weights, vec![12, 10, 8, 6, 4, 0]);
    }

    #[test]
    fn test_single_entry_scores_only_its_pair() {
        let history = HistoryLog::from_entries(vec![entry(&[&["A", "B"]])]);
        let scores = PairScorer::new(5).score(&history);

        assert_eq!(scores.get(&p("A"), &p("B")), 12);
        assert_eq!(scores.get(&p("B"), &p("A")), 12);
        for (a, b) in [("A", "C"), ("A", "D"), ("B", "C"), ("B", "D"), ("C", "D")] {
            assert_eq!(scores.get(&p(a), &p(b)), 0);
        }
    }

    #[test]
    fn test_scores_accumulate_across_rounds() {
        let history = HistoryLog::from_entries(vec![
            entry(&[&["A", "B", "C"], &["D"]]),
            entry(&[&["B", "A"], &["C", "D"]]),
            entry(&[&["A", "D"], &["B", "C"]]),
        ]);
        let scores = PairScorer::new(5).score(&history);

        assert_eq!(scores.get(&p("A"), &p("B")), 12 + 10);
        assert_eq!(scores.get(&p("B"), &p("C")), 12 + 8);
        assert_eq!(scores.get(&p("C"), &p("D")), 10);
        assert_eq!(scores.get(&p("A"), &p("D")), 8);
        assert_eq!(scores.get(&p("A"), &p("C")), 12);
        assert_eq!(scores.get(&p("B"), &p("D")), 0);
    }

    #[test]
    fn test_scores_are_symmetric() {
        let history = HistoryLog::from_entries(vec![
            entry(&[&["zed", "amy", "kim"]]),
            entry(&[&["kim", "zed"], &["amy"]]),
        ]);
        let scores = PairScorer::new(5).score(&history);

        let ids = ["zed", "amy", "kim"];
        for a in ids {
            for b in ids {
                assert_eq!(scores.get(&p(a), &p(b)), scores.get(&p(b), &p(a)));
            }
        }
    }

    #[test]
    fn test_entries_past_limit_are_ignored() {
        let history = HistoryLog::from_entries(vec![
            entry(&[&["A"]]),
            entry(&[&["A"]]),
            entry(&[&["A", "B"]]),
        ]);
        let scores = PairScorer::new(2).score(&history);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let history = HistoryLog::from_entries(vec![
            entry(&[&["A", "B"], &["C", "D"]]),
            entry(&[&["A", "C"], &["B", "D"]]),
        ]);
        let snapshot = history.clone();
        let scorer = PairScorer::new(5);

        assert_eq!(scorer.score(&history), scorer.score(&history));
        assert_eq!(history, snapshot);
    }
}
