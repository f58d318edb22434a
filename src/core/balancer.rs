use crate::core::generator::TeamGenerator;
use crate::core::history::HistoryStore;
use crate::core::roster::eligible_participants;
use crate::core::scorer::PairScorer;
use crate::core::shuffle::ShuffleEngine;
use crate::core::{
    ConfigProvider, Grouping, HistoryEntry, HistoryLog, Participant, RosterSource, Storage,
    TeamOptions,
};
use crate::utils::error::{BalancerError, Result};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceOutcome {
    pub grouping: Grouping,
    pub score: u64,
    pub trials: usize,
    /// History length after the commit, or the current length for a preview.
    pub history_len: usize,
    pub committed: bool,
}

/// Runs one balancing round end to end: load history, score, search, commit.
///
/// The history lock is held for the whole round, so two rounds started at the
/// same time each see the other's result instead of overwriting it, even when
/// they run on different balancers pointed at the same history file.
pub struct TeamBalancer<S: Storage, R = StdRng> {
    history: HistoryStore<S>,
    generator: TeamGenerator,
    shuffler: Mutex<ShuffleEngine<R>>,
    observer_marker: String,
}

impl<S: Storage> TeamBalancer<S, StdRng> {
    pub fn new<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::with_shuffler(storage, config, ShuffleEngine::from_entropy())
    }
}

impl<S: Storage, R: Rng + Send> TeamBalancer<S, R> {
    pub fn with_shuffler<C: ConfigProvider>(
        storage: S,
        config: &C,
        shuffler: ShuffleEngine<R>,
    ) -> Self {
        let scorer = PairScorer::new(config.history_limit());
        Self {
            history: HistoryStore::from_config(storage, config),
            generator: TeamGenerator::new(config.attempts(), scorer),
            shuffler: Mutex::new(shuffler),
            observer_marker: config.observer_marker().to_string(),
        }
    }

    pub async fn history(&self) -> HistoryLog {
        self.history.load().await
    }

    /// Balances `participants` and appends the result to the history.
    pub async fn run(
        &self,
        participants: &[Participant],
        options: &TeamOptions,
    ) -> Result<BalanceOutcome> {
        self.balance(participants, options, true).await
    }

    /// Same search as [`run`](Self::run) without touching the history.
    pub async fn preview(
        &self,
        participants: &[Participant],
        options: &TeamOptions,
    ) -> Result<BalanceOutcome> {
        self.balance(participants, options, false).await
    }

    /// 從名單來源取得成員，過濾機器人與觀戰者後再分組
    pub async fn run_roster<RS: RosterSource + ?Sized>(
        &self,
        source: &RS,
        options: &TeamOptions,
        commit: bool,
    ) -> Result<BalanceOutcome> {
        let entries = source.fetch().await?;
        let participants = eligible_participants(&entries, &self.observer_marker);
        tracing::info!(
            "👥 {} of {} roster entries are eligible",
            participants.len(),
            entries.len()
        );
        self.balance(&participants, options, commit).await
    }

    async fn balance(
        &self,
        participants: &[Participant],
        options: &TeamOptions,
        commit: bool,
    ) -> Result<BalanceOutcome> {
        // 設定錯誤或空名單時不做任何計算
        options.partitioning()?;
        if participants.is_empty() {
            return Err(BalancerError::EmptyRosterError);
        }

        let guard = self.history.lock().await;
        let history = guard.load().await;

        let outcome = {
            let mut shuffler = self.shuffler.lock().await;
            self.generator
                .search(participants, options, &history, &mut *shuffler)?
        };
        tracing::info!(
            "🎲 Picked {} teams for {} players (score {}, {} trials)",
            outcome.grouping.len(),
            participants.len(),
            outcome.score,
            outcome.trials
        );

        let history_len = if commit {
            let log = guard
                .append(HistoryEntry::new(outcome.grouping.clone()))
                .await?;
            tracing::info!(
                "📝 History {} updated ({} entries)",
                self.history.path(),
                log.len()
            );
            log.len()
        } else {
            history.len()
        };

        Ok(BalanceOutcome {
            grouping: outcome.grouping,
            score: outcome.score,
            trials: outcome.trials,
            history_len,
            committed: commit,
        })
    }
}
