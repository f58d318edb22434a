use crate::core::scorer::PairScorer;
use crate::core::shuffle::ShuffleEngine;
use crate::core::{Grouping, HistoryLog, PairScoreMap, Participant, Partitioning, TeamOptions};
use crate::utils::error::{BalancerError, Result};
use crate::utils::validation::{validate_positive_number, Validate};
use rand::Rng;

/// 預設嘗試次數
pub const DEFAULT_ATTEMPTS: usize = 10;

impl TeamOptions {
    /// 恰好指定 team_count 或 team_size 其中之一，且值至少為 1
    pub fn partitioning(&self) -> Result<Partitioning> {
        match (self.team_count, self.team_size) {
            (Some(count), None) => {
                validate_positive_number("team_count", count, 1)?;
                Ok(Partitioning::ByCount(count))
            }
            (None, Some(size)) => {
                validate_positive_number("team_size", size, 1)?;
                Ok(Partitioning::BySize(size))
            }
            (None, None) => Err(BalancerError::ConfigValidationError {
                field: "team_count/team_size".to_string(),
                message: "one of team_count or team_size must be set".to_string(),
            }),
            (Some(_), Some(_)) => Err(BalancerError::ConfigValidationError {
                field: "team_count/team_size".to_string(),
                message: "team_count and team_size cannot both be set".to_string(),
            }),
        }
    }
}

impl Validate for TeamOptions {
    fn validate(&self) -> Result<()> {
        self.partitioning().map(|_| ())
    }
}

impl Partitioning {
    pub fn split(&self, players: &[Participant]) -> Grouping {
        match *self {
            Partitioning::ByCount(count) => {
                let mut teams: Grouping = vec![Vec::new(); count];
                for (idx, player) in players.iter().enumerate() {
                    teams[idx % count].push(player.clone());
                }
                teams
            }
            Partitioning::BySize(size) => players.chunks(size).map(|chunk| chunk.to_vec()).collect(),
        }
    }
}

/// Result of one search, including the bookkeeping the caller may want to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub grouping: Grouping,
    pub score: u64,
    pub trials: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TeamGenerator {
    attempts: usize,
    scorer: PairScorer,
}

impl TeamGenerator {
    pub fn new(attempts: usize, scorer: PairScorer) -> Self {
        Self { attempts, scorer }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn scorer(&self) -> &PairScorer {
        &self.scorer
    }

    pub fn generate<R: Rng>(
        &self,
        participants: &[Participant],
        options: &TeamOptions,
        history: &HistoryLog,
        shuffler: &mut ShuffleEngine<R>,
    ) -> Result<Grouping> {
        self.search(participants, options, history, shuffler)
            .map(|outcome| outcome.grouping)
    }

    pub fn search<R: Rng>(
        &self,
        participants: &[Participant],
        options: &TeamOptions,
        history: &HistoryLog,
        shuffler: &mut ShuffleEngine<R>,
    ) -> Result<SearchOutcome> {
        // 先驗證設定，避免白算分數
        options.partitioning()?;
        let scores = self.scorer.score(history);
        self.search_scored(participants, options, &scores, shuffler)
    }

    /// Runs up to `attempts` shuffle-and-split trials and keeps the lowest
    /// scoring grouping. Ties go to the earliest trial; a zero score stops
    /// the search immediately.
    ///
    /// `participants` must be non-empty.
    pub fn search_scored<R: Rng>(
        &self,
        participants: &[Participant],
        options: &TeamOptions,
        scores: &PairScoreMap,
        shuffler: &mut ShuffleEngine<R>,
    ) -> Result<SearchOutcome> {
        let partitioning = options.partitioning()?;
        validate_positive_number("attempts", self.attempts, 1)?;
        if participants.is_empty() {
            return Err(BalancerError::EmptyRosterError);
        }

        let mut best: Option<(Grouping, u64)> = None;
        let mut trials = 0;

        for trial in 0..self.attempts {
            trials = trial + 1;
            let candidate = partitioning.split(&shuffler.shuffle(participants));
            let score = scores.grouping_score(&candidate);
            tracing::debug!("Trial {}: score {}", trials, score);

            let improved = match &best {
                Some((_, best_score)) => score < *best_score,
                None => true,
            };
            if improved {
                best = Some((candidate, score));
            }

            if score == 0 {
                break;
            }
        }

        // attempts >= 1 已驗證，best 必定有值
        let (grouping, score) = best.ok_or_else(|| BalancerError::config("no trials were run"))?;
        tracing::debug!("Selected grouping with score {} after {} trials", score, trials);

        Ok(SearchOutcome {
            grouping,
            score,
            trials,
        })
    }
}

impl Default for TeamGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, PairScorer::new(crate::core::history::DEFAULT_HISTORY_LIMIT))
    }
}
